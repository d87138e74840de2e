use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;

/// An ordered list of app identifiers read from a text file.
///
/// One identifier per line. Lines containing `#` are comments and are
/// skipped, as are blank lines. Order is preserved because it determines
/// the pair enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppList {
    entries: Vec<String>,
}

impl AppList {
    /// Read an app list from a file.
    pub fn from_file<P: AsRef<Utf8Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read app list: {}", path))?;
        Ok(Self::from_text(&contents))
    }

    /// Parse an app list from raw text.
    pub fn from_text(text: &str) -> Self {
        let entries = text
            .lines()
            .filter(|line| !line.contains('#'))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An ordered pair of two distinct app identifiers selected for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPair {
    pub first: String,
    pub second: String,
}

impl AppPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Canonical pair name, used for the ledger and log file naming.
    pub fn name(&self) -> String {
        format!("{}--{}", self.first, self.second)
    }

    /// Name of the per-pair log artifact.
    pub fn log_name(&self) -> String {
        format!("{}--{}.log", self.first, self.second)
    }
}

/// Enumerate the app pairs to analyze.
///
/// With a single list, this produces every unordered combination of two
/// distinct entries, i.e. (i, j) with i < j by position. With a second
/// list, it produces the full cross product of the two lists, skipping
/// any pair whose identifiers are textually identical (the lists may
/// overlap).
pub fn enumerate_pairs(first: &AppList, second: Option<&AppList>) -> Vec<AppPair> {
    let mut pairs = Vec::new();

    match second {
        None => {
            let apps = first.entries();
            for i in 0..apps.len() {
                for j in (i + 1)..apps.len() {
                    pairs.push(AppPair::new(&apps[i], &apps[j]));
                }
            }
        }
        Some(second) => {
            for a in first.entries() {
                for b in second.entries() {
                    if a == b {
                        continue;
                    }
                    pairs.push(AppPair::new(a, b));
                }
            }
        }
    }

    pairs
}
