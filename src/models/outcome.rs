use std::fmt;

/// Classification of a single pair's analysis run.
///
/// `NoConflict` and `Conflict` come from the model checker's own log
/// markers. `StagingError` means the build/extraction step rejected the
/// pair and the checker was never invoked. `Unknown` means the log matched
/// neither marker and needs manual inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultLabel {
    NoConflict,
    Conflict,
    StagingError,
    Unknown,
}

impl ResultLabel {
    /// The label text written to the log-list summary artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultLabel::NoConflict => "no conflict",
            ResultLabel::Conflict => "conflict",
            ResultLabel::StagingError => "staging error",
            ResultLabel::Unknown => "other errors--PLEASE CHECK!",
        }
    }
}

impl fmt::Display for ResultLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the batch-wide log-list summary. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub log_name: String,
    pub label: ResultLabel,
}

impl ResultRecord {
    pub fn new(log_name: impl Into<String>, label: ResultLabel) -> Self {
        Self {
            log_name: log_name.into(),
            label,
        }
    }

    /// Render the tab-separated summary line (without trailing newline).
    pub fn summary_line(&self) -> String {
        format!("{}\t\t{}", self.log_name, self.label)
    }
}
