use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::time::Instant;

use crate::metrics::Metrics;
use crate::models::{AppPair, ResultLabel, ResultRecord, ToolchainSettings};
use crate::profile::{RunConfiguration, RunProfile};
use crate::services::checker::CheckerService;
use crate::services::staging::{StageOutcome, StagingService};

/// Name of the batch-wide summary artifact inside the output directory.
const LOG_LIST_NAME: &str = "logList";

/// The sequential batch driver.
///
/// Threads each enumerated pair through staging, profile rendering,
/// checker invocation, and classification, appending one line per pair to
/// the log-list artifact. Pairs are processed strictly one at a time; a
/// per-pair staging error is recorded and processing continues, while any
/// other failure aborts the batch.
pub struct BatchRunner {
    staging: StagingService,
    checker: CheckerService,
    profile: RunProfile,
    run_config: RunConfiguration,
    profile_path: Utf8PathBuf,
    ledger_path: Utf8PathBuf,
    log_dir: Utf8PathBuf,
    app_dir: Utf8PathBuf,
    metrics: Metrics,
}

impl BatchRunner {
    /// Build the runner and load the run-profile template.
    ///
    /// `work_dir` is the toolchain working directory the build and compile
    /// steps run in; the staging slots are resolved relative to it.
    pub fn new(
        checker_dir: &Utf8Path,
        log_dir: &Utf8Path,
        app_dir: &Utf8Path,
        work_dir: &Utf8Path,
        settings: &ToolchainSettings,
        run_config: RunConfiguration,
    ) -> Result<Self> {
        let profile_path = checker_dir.join(&settings.profile_file);
        let profile = RunProfile::load(
            &profile_path,
            &settings.ledger_file,
            settings.profile_overrides.clone(),
        )?;

        Ok(Self {
            staging: StagingService::new(work_dir, settings),
            checker: CheckerService::new(
                checker_dir,
                work_dir,
                &settings.compile_command,
                &settings.run_script,
                &settings.profile_file,
            ),
            profile,
            run_config,
            profile_path,
            ledger_path: checker_dir.join(&settings.ledger_file),
            log_dir: log_dir.to_path_buf(),
            app_dir: app_dir.to_path_buf(),
            metrics: Metrics::new(),
        })
    }

    /// Process every pair in order, writing the log-list summary as it goes.
    ///
    /// Returns one [`ResultRecord`] per pair. The log list is flushed after
    /// each pair so a fatal failure leaves it valid up to the failed pair.
    pub async fn run(&self, pairs: &[AppPair]) -> Result<Vec<ResultRecord>> {
        if !self.log_dir.exists() {
            fs::create_dir_all(&self.log_dir)
                .with_context(|| format!("Failed to create log directory: {}", self.log_dir))?;
        }

        let log_list_path = self.log_dir.join(LOG_LIST_NAME);
        let mut log_list = File::create(&log_list_path)
            .with_context(|| format!("Failed to create log list: {}", log_list_path))?;

        let mut records = Vec::with_capacity(pairs.len());
        for (index, pair) in pairs.iter().enumerate() {
            tracing::info!(
                "Pair {}/{}: first app {}, second app {}",
                index + 1,
                pairs.len(),
                pair.first,
                pair.second
            );

            let record = self.process_pair(pair).await?;
            writeln!(log_list, "{}", record.summary_line())
                .with_context(|| format!("Failed to append to log list: {}", log_list_path))?;
            log_list.flush()?;

            self.metrics.record_result(record.label);
            records.push(record);
        }

        self.metrics.log_summary();
        Ok(records)
    }

    /// One pair through the full state machine:
    /// staged -> (error-log-written | checker-invoked) -> classified.
    async fn process_pair(&self, pair: &AppPair) -> Result<ResultRecord> {
        let outcome = self.staging.stage_pair(&self.app_dir, pair).await?;
        self.append_ledger(&pair.name())?;

        let log_path = self.log_dir.join(pair.log_name());
        let label = match outcome {
            StageOutcome::Failed(error) => {
                // Record the build step's error text verbatim and skip the
                // checker for this pair.
                fs::write(&log_path, &error)
                    .with_context(|| format!("Failed to write error log: {}", log_path))?;
                ResultLabel::StagingError
            }
            StageOutcome::Ready => {
                self.profile.apply(&self.profile_path, &self.run_config)?;

                let start = Instant::now();
                self.checker.run(&log_path).await?;
                self.metrics.record_checker_time(start.elapsed());

                self.checker.classify(&log_path)?
            }
        };

        tracing::info!("Pair {} classified: {}", pair.name(), label);
        Ok(ResultRecord::new(pair.log_name(), label))
    }

    /// Append the pair name to the statistics ledger. Happens for every
    /// pair submitted, whatever the run outcome.
    fn append_ledger(&self, pair_name: &str) -> Result<()> {
        let mut ledger = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.ledger_path)
            .with_context(|| format!("Failed to open ledger: {}", self.ledger_path))?;
        writeln!(ledger, "{}", pair_name)
            .with_context(|| format!("Failed to append to ledger: {}", self.ledger_path))?;
        Ok(())
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROFILE_TEMPLATE: &str = "\
target=main

# This is the listener that can detect variable write-after-write conflicts
listener=gov.nasa.jpf.listener.ConflictTracker

timeout=30
";

    struct Fixture {
        dir: Utf8PathBuf,
        _guard: TempDir,
    }

    fn fixture(apps: &[&str]) -> Fixture {
        let guard = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(guard.path().to_path_buf()).unwrap();
        fs::write(dir.join("main.jpf"), PROFILE_TEMPLATE).unwrap();
        for app in apps {
            fs::write(dir.join(app), format!("source of {}", app)).unwrap();
        }
        Fixture { dir, _guard: guard }
    }

    fn settings(build_command: &str, run_script: &str) -> ToolchainSettings {
        ToolchainSettings {
            build_command: build_command.to_string(),
            compile_command: ":".to_string(),
            run_script: run_script.to_string(),
            first_slot: "App1.groovy".to_string(),
            second_slot: "App2.groovy".to_string(),
            ..ToolchainSettings::default()
        }
    }

    fn run_config() -> RunConfiguration {
        RunConfiguration {
            reduction: true,
            conflict_detection: true,
            timeout_minutes: 120,
        }
    }

    fn runner(f: &Fixture, settings: &ToolchainSettings) -> BatchRunner {
        BatchRunner::new(&f.dir, &f.dir.join("logs"), &f.dir, &f.dir, settings, run_config())
            .unwrap()
    }

    #[tokio::test]
    async fn test_ledger_records_every_pair() {
        let f = fixture(&["appA", "appB", "appC"]);
        let runner = runner(&f, &settings(":", "echo jpf.RunTest - no errors detected #"));

        let pairs = vec![AppPair::new("appA", "appB"), AppPair::new("appA", "appC")];
        runner.run(&pairs).await.unwrap();

        let ledger = fs::read_to_string(f.dir.join("moreStatistics")).unwrap();
        assert_eq!(ledger, "appA--appB\nappA--appC\n");
    }

    #[tokio::test]
    async fn test_staging_error_skips_checker() {
        let f = fixture(&["appA", "appB"]);
        // Build step reports an error; the run script would leave a sentinel
        // file behind if it ever ran.
        let s = settings(
            "printf 'Direct-Direct Interaction detected' > appCreationError.log",
            "touch checker_ran #",
        );
        let runner = runner(&f, &s);

        let records = runner
            .run(&[AppPair::new("appA", "appB")])
            .await
            .unwrap();

        assert_eq!(records[0].label, ResultLabel::StagingError);
        assert!(!f.dir.join("checker_ran").exists());

        let log = fs::read_to_string(f.dir.join("logs/appA--appB.log")).unwrap();
        assert_eq!(log, "Direct-Direct Interaction detected");
    }

    #[tokio::test]
    async fn test_profile_rendered_before_each_invocation() {
        let f = fixture(&["appA", "appB"]);
        let runner = runner(&f, &settings(":", "echo jpf.RunTest - no errors detected #"));

        runner.run(&[AppPair::new("appA", "appB")]).await.unwrap();

        let profile = fs::read_to_string(f.dir.join("main.jpf")).unwrap();
        assert!(profile.contains("listener=gov.nasa.jpf.listener.ConflictTracker"));
        assert!(profile.contains("timeout=120"));
    }

    #[tokio::test]
    async fn test_log_list_is_rewritten_per_batch() {
        let f = fixture(&["appA", "appB"]);
        fs::create_dir_all(f.dir.join("logs")).unwrap();
        fs::write(f.dir.join("logs/logList"), "stale contents\n").unwrap();

        let runner = runner(&f, &settings(":", "echo jpf.RunTest - no errors detected #"));
        runner.run(&[AppPair::new("appA", "appB")]).await.unwrap();

        let log_list = fs::read_to_string(f.dir.join("logs/logList")).unwrap();
        assert_eq!(log_list, "appA--appB.log\t\tno conflict\n");
    }
}
