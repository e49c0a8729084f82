//! Error types for trials and comparisons.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while configuring, running, or exporting
/// a trial or comparison.
#[derive(Debug, Error)]
pub enum TrialError {
    /// The trial or comparison was configured with unusable parameters.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A single invocation overran the per-call limit.
    #[error("run #{index} exceeded the per-call limit of {limit:?} ({elapsed:?} elapsed)")]
    CallTimeout {
        /// 1-based position of the invocation within the failing batch.
        index: u64,
        /// The configured per-call limit.
        limit: Duration,
        /// How long the invocation actually took.
        elapsed: Duration,
    },

    /// The batch ran out of its total time budget.
    #[error("total budget of {limit:?} exhausted after run #{index} ({elapsed:?} elapsed)")]
    BudgetExhausted {
        /// 1-based position of the invocation at which the budget ran out.
        index: u64,
        /// The configured total budget.
        limit: Duration,
        /// Cumulative batch time at the point of failure.
        elapsed: Duration,
    },

    /// The measured routine panicked. The panic payload is preserved as text;
    /// the variant itself marks the failure as originating inside a
    /// measurement run.
    #[error("measured routine panicked during run #{index}: {message}")]
    Routine {
        /// 1-based position of the invocation that panicked.
        index: u64,
        /// The panic payload, rendered as text.
        message: String,
    },

    /// Statistics, a report, or a plot were requested before any duration
    /// had been recorded.
    #[error("no durations recorded; run the trial first")]
    EmptySeries,

    /// Plot rendering was requested but the `plot` feature is not enabled.
    #[error("plot support is not compiled in; enable the `plot` feature")]
    PlotUnavailable,

    /// The plotting backend failed while rendering.
    #[error("failed to render plot: {0}")]
    Plot(String),

    /// Score export or comparison plotting was refused because the
    /// comparison's results are unusable.
    #[error("comparison results unusable: {0}")]
    ExportRefused(String),

    /// A score or plot file could not be written.
    #[error("failed to write {}", .path.display())]
    Io {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Score or report serialization failed.
    #[error("failed to encode as JSON")]
    Encode(#[from] serde_json::Error),
}
