//! Services module - the batch orchestration pipeline.
//!
//! Everything here is framework-agnostic business logic with explicit
//! inputs, so it is testable without a real toolchain installation:
//!
//! - [`StagingService`]: copies a pair's app artifacts into the
//!   toolchain's fixed input slots, runs the build/extraction step, and
//!   consumes its error-log artifact into an explicit [`StageOutcome`]
//! - [`CheckerService`]: compiles the staged pair, runs the external model
//!   checker with its output captured into the per-pair log, and
//!   classifies that log against the known result markers
//! - [`BatchRunner`]: the strictly sequential driver loop tying the
//!   pipeline together and maintaining the ledger and log-list artifacts
//!
//! External invocations go through `tokio::process::Command` as shell
//! command strings (`cmd /C` on Windows, `sh -c` elsewhere) and are
//! awaited to completion; the orchestrator enforces no timeout of its own.

pub mod batch;
pub mod checker;
pub mod staging;

pub use batch::BatchRunner;
pub use checker::{CheckerError, CheckerService};
pub use staging::{StageOutcome, StagingError, StagingService};
