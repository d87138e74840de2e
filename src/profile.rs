// Run-profile management
//
// The model checker reads its run configuration from a flat key=value
// profile file. The historical driver rewrote that file in place with
// chained literal substring replacements, which made every step depend on
// the previous pair's mutations still being present. This module replaces
// that scheme with a structured model: the pristine profile is loaded once
// as a template, and the full profile text is re-rendered from an immutable
// [`RunConfiguration`] before every invocation.

use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;
use std::fs;

/// Fully-qualified class name of the conflict-tracking listener.
pub const CONFLICT_LISTENER: &str = "gov.nasa.jpf.listener.ConflictTracker";

/// Fully-qualified class name of the partial-order-reduction listener.
pub const REDUCTION_LISTENER: &str = "gov.nasa.jpf.listener.DPORStateReducerWithSummary";

const LISTENERS_HEADER: &str = "# These are JPF listeners";
const CONFLICT_LISTENER_COMMENT: &str =
    "# This is the listener that can detect variable write-after-write conflicts";
const REDUCTION_OPTIONS_HEADER: &str = "# Options for DPORStateReducerWithSummary";

/// Option keys owned by the renderer. Any occurrence in the template
/// (commented or not) is stripped and re-emitted from the configuration,
/// which is what makes rendering idempotent.
const MANAGED_KEYS: &[&str] = &[
    "listener",
    "printout_state_transition",
    "activate_state_reduction",
    "file_output",
];

/// The requested run mode for a single invocation of the model checker.
///
/// Constructed once from the CLI flags and never mutated; the profile file
/// on disk is regenerated from this value before every invocation, so no
/// state leaks from one pair to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfiguration {
    /// Enable partial-order reduction in the reduction listener.
    pub reduction: bool,

    /// Keep the conflict-tracking listener active.
    pub conflict_detection: bool,

    /// Model-checker internal timeout, in minutes.
    pub timeout_minutes: u32,
}

impl RunConfiguration {
    /// Interpret the raw CLI flag strings.
    ///
    /// The literal `"true"` enables reduction; any other value disables it.
    /// The literal `"false"` disables conflict detection; any other value
    /// leaves it enabled.
    pub fn from_cli_flags(reduction: &str, conflict_detection: &str, timeout_minutes: u32) -> Self {
        Self {
            reduction: reduction == "true",
            conflict_detection: conflict_detection != "false",
            timeout_minutes,
        }
    }
}

/// Structured view of the model checker's run-profile file.
///
/// Holds the pristine template text read at startup. [`render`](Self::render)
/// strips every managed line from the template and emits the listener block
/// and timeout from the given [`RunConfiguration`], so rendering an
/// already-rendered profile yields the same text.
#[derive(Debug, Clone)]
pub struct RunProfile {
    template: String,
    ledger_file: String,
    overrides: IndexMap<String, String>,
    option_pattern: Regex,
}

impl RunProfile {
    /// Load the profile template from disk.
    ///
    /// `ledger_file` is the statistics file name handed to the reduction
    /// listener. `overrides` are free-form extra options applied after the
    /// managed block; entries targeting managed keys are dropped with a
    /// warning.
    pub fn load(
        path: &Utf8Path,
        ledger_file: &str,
        overrides: IndexMap<String, String>,
    ) -> Result<Self> {
        let template = fs::read_to_string(path)
            .with_context(|| format!("Failed to read run profile: {}", path))?;
        Ok(Self::from_template(template, ledger_file, overrides))
    }

    /// Build a profile from template text directly.
    pub fn from_template(
        template: impl Into<String>,
        ledger_file: &str,
        overrides: IndexMap<String, String>,
    ) -> Self {
        let overrides = overrides
            .into_iter()
            .filter(|(key, _)| {
                let managed = MANAGED_KEYS.contains(&key.as_str()) || key == "timeout";
                if managed {
                    tracing::warn!("Ignoring profile override for managed option: {}", key);
                }
                !managed
            })
            .collect();

        Self {
            template: template.into(),
            ledger_file: ledger_file.to_string(),
            overrides,
            option_pattern: Regex::new(r"^\s*(#)?\s*([A-Za-z_][A-Za-z0-9_.\-]*)\s*=\s*(.*)$")
                .expect("Invalid option line regex"),
        }
    }

    /// Render the complete profile text for one invocation.
    pub fn render(&self, config: &RunConfiguration) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut block_emitted = false;
        let mut timeout_emitted = false;
        let mut in_managed_run = false;
        let mut applied_overrides: HashSet<&str> = HashSet::new();

        for line in self.template.lines() {
            if self.is_managed(line) {
                if !block_emitted {
                    out.extend(self.listener_block(config));
                    block_emitted = true;
                }
                in_managed_run = true;
                continue;
            }

            // Swallow the blank lines inside a previously rendered block so
            // re-rendering does not accumulate spacing.
            if in_managed_run && line.trim().is_empty() {
                continue;
            }
            in_managed_run = false;

            if let Some((commented, key)) = self.parse_option(line) {
                if !commented {
                    if key == "timeout" {
                        out.push(format!("timeout={}", config.timeout_minutes));
                        timeout_emitted = true;
                        continue;
                    }
                    if let Some(value) = self.overrides.get(key) {
                        out.push(format!("{}={}", key, value));
                        applied_overrides.insert(key);
                        continue;
                    }
                }
            }

            out.push(line.to_string());
        }

        if !block_emitted {
            if out.last().is_some_and(|l| !l.trim().is_empty()) {
                out.push(String::new());
            }
            out.extend(self.listener_block(config));
        }

        if !timeout_emitted {
            out.push(format!("timeout={}", config.timeout_minutes));
        }

        for (key, value) in &self.overrides {
            if !applied_overrides.contains(key.as_str()) {
                out.push(format!("{}={}", key, value));
            }
        }

        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    /// Render and write the profile to the live path the checker reads.
    pub fn apply(&self, path: &Utf8Path, config: &RunConfiguration) -> Result<()> {
        let text = self.render(config);
        fs::write(path, text)
            .with_context(|| format!("Failed to write run profile: {}", path))?;
        tracing::debug!(
            "Wrote run profile: reduction={}, conflict_detection={}, timeout={}m",
            config.reduction,
            config.conflict_detection,
            config.timeout_minutes
        );
        Ok(())
    }

    /// The listener declarations and reduction options for this run mode.
    fn listener_block(&self, config: &RunConfiguration) -> Vec<String> {
        let mut lines = vec![LISTENERS_HEADER.to_string()];

        if config.conflict_detection {
            lines.push(format!("listener={}", CONFLICT_LISTENER));
        } else {
            lines.push(format!("#listener={}", CONFLICT_LISTENER));
        }
        lines.push(format!("listener={}", REDUCTION_LISTENER));
        lines.push(String::new());

        lines.push(REDUCTION_OPTIONS_HEADER.to_string());
        lines.push("printout_state_transition=true".to_string());
        if config.reduction {
            lines.push("#activate_state_reduction=false".to_string());
        } else {
            lines.push("activate_state_reduction=false".to_string());
        }
        lines.push(format!("file_output={}", self.ledger_file));
        lines.push(String::new());

        lines
    }

    fn is_managed(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed == LISTENERS_HEADER
            || trimmed == CONFLICT_LISTENER_COMMENT
            || trimmed == REDUCTION_OPTIONS_HEADER
        {
            return true;
        }
        match self.parse_option(line) {
            Some((_, key)) => MANAGED_KEYS.contains(&key),
            None => false,
        }
    }

    /// Parse an option line into (commented, key). Returns None for plain
    /// comments and blank lines.
    fn parse_option<'a>(&self, line: &'a str) -> Option<(bool, &'a str)> {
        let caps = self.option_pattern.captures(line)?;
        let commented = caps.get(1).is_some();
        let key = caps.get(2)?;
        Some((commented, key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
target=main

# This is the listener that can detect variable write-after-write conflicts
listener=gov.nasa.jpf.listener.ConflictTracker

search.multiple_errors=false
timeout=30
";

    fn profile() -> RunProfile {
        RunProfile::from_template(TEMPLATE, "moreStatistics", IndexMap::new())
    }

    fn config() -> RunConfiguration {
        RunConfiguration {
            reduction: true,
            conflict_detection: true,
            timeout_minutes: 120,
        }
    }

    #[test]
    fn test_render_with_reduction_enabled() {
        let text = profile().render(&config());

        assert!(text.contains("# These are JPF listeners"));
        assert!(text.contains("listener=gov.nasa.jpf.listener.ConflictTracker\n"));
        assert!(text.contains("listener=gov.nasa.jpf.listener.DPORStateReducerWithSummary\n"));
        assert!(text.contains("printout_state_transition=true"));
        assert!(text.contains("#activate_state_reduction=false"));
        assert!(text.contains("file_output=moreStatistics"));
        // The original placeholder comment must be gone
        assert!(!text.contains("write-after-write"));
    }

    #[test]
    fn test_render_with_reduction_disabled() {
        let cfg = RunConfiguration {
            reduction: false,
            ..config()
        };
        let text = profile().render(&cfg);

        assert!(text.contains("\nactivate_state_reduction=false\n"));
        assert!(!text.contains("#activate_state_reduction"));
        // The reduction listener itself stays declared either way
        assert!(text.contains("listener=gov.nasa.jpf.listener.DPORStateReducerWithSummary\n"));
    }

    #[test]
    fn test_render_with_conflict_detection_disabled() {
        let cfg = RunConfiguration {
            conflict_detection: false,
            ..config()
        };
        let text = profile().render(&cfg);

        assert!(text.contains("#listener=gov.nasa.jpf.listener.ConflictTracker\n"));
        assert!(text.contains("listener=gov.nasa.jpf.listener.DPORStateReducerWithSummary\n"));
    }

    #[test]
    fn test_render_replaces_timeout_in_place() {
        let text = profile().render(&config());

        assert!(text.contains("timeout=120"));
        assert!(!text.contains("timeout=30"));
        // timeout keeps its position after the unmanaged options
        let timeout_pos = text.find("timeout=120").unwrap();
        let search_pos = text.find("search.multiple_errors=false").unwrap();
        assert!(search_pos < timeout_pos);
    }

    #[test]
    fn test_render_preserves_unmanaged_lines() {
        let text = profile().render(&config());

        assert!(text.contains("target=main"));
        assert!(text.contains("search.multiple_errors=false"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let p = profile();
        let once = p.render(&config());

        let again = RunProfile::from_template(once.clone(), "moreStatistics", IndexMap::new())
            .render(&config());
        assert_eq!(once, again);
    }

    #[test]
    fn test_two_passes_do_not_duplicate_listener_block() {
        let p = profile();
        let once = p.render(&config());
        let twice = RunProfile::from_template(once, "moreStatistics", IndexMap::new())
            .render(&config());

        assert_eq!(twice.matches("# These are JPF listeners").count(), 1);
        assert_eq!(
            twice
                .matches("listener=gov.nasa.jpf.listener.DPORStateReducerWithSummary")
                .count(),
            1
        );
        assert_eq!(twice.matches("timeout=120").count(), 1);
    }

    #[test]
    fn test_template_without_managed_lines_gets_block_appended() {
        let p = RunProfile::from_template("target=main\n", "moreStatistics", IndexMap::new());
        let text = p.render(&config());

        assert!(text.contains("# These are JPF listeners"));
        assert!(text.contains("listener=gov.nasa.jpf.listener.ConflictTracker"));
        assert!(text.ends_with("timeout=120\n"));
    }

    #[test]
    fn test_overrides_replace_existing_options() {
        let mut overrides = IndexMap::new();
        overrides.insert("search.multiple_errors".to_string(), "true".to_string());
        let p = RunProfile::from_template(TEMPLATE, "moreStatistics", overrides);
        let text = p.render(&config());

        assert!(text.contains("search.multiple_errors=true"));
        assert!(!text.contains("search.multiple_errors=false"));
    }

    #[test]
    fn test_overrides_append_new_options() {
        let mut overrides = IndexMap::new();
        overrides.insert("vm.storage.class".to_string(), "nil".to_string());
        let p = RunProfile::from_template(TEMPLATE, "moreStatistics", overrides);
        let text = p.render(&config());

        assert!(text.contains("vm.storage.class=nil"));
    }

    #[test]
    fn test_overrides_for_managed_keys_are_dropped() {
        let mut overrides = IndexMap::new();
        overrides.insert("listener".to_string(), "com.example.Other".to_string());
        overrides.insert("timeout".to_string(), "5".to_string());
        let p = RunProfile::from_template(TEMPLATE, "moreStatistics", overrides);
        let text = p.render(&config());

        assert!(!text.contains("com.example.Other"));
        assert!(text.contains("timeout=120"));
    }

    #[test]
    fn test_from_cli_flags() {
        let cfg = RunConfiguration::from_cli_flags("true", "whatever", 120);
        assert!(cfg.reduction);
        assert!(cfg.conflict_detection);

        let cfg = RunConfiguration::from_cli_flags("yes", "false", 120);
        assert!(!cfg.reduction);
        assert!(!cfg.conflict_detection);
    }
}
