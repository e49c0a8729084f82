//! Structured snapshot of a trial's accumulated state.

use std::time::Duration;

use serde::Serialize;

use crate::config::TrialConfig;
use crate::error::TrialError;
use crate::statistics::{self, Aggregation};

/// Everything a trial knows about itself after at least one recorded run.
///
/// Counts reflect the trial's whole lifetime (batches accumulate until
/// [`TimeTrial::reset`](crate::TimeTrial::reset)); statistics cover the full
/// recorded series.
#[derive(Debug, Clone, Serialize)]
pub struct TrialReport {
    /// Invocations requested across all batches so far, including batches
    /// that later failed.
    pub expected_runs: u64,

    /// Invocations that completed and were recorded.
    pub completed_runs: u64,

    /// Wall-clock target the routine is measured against.
    pub target: Duration,

    /// Per-invocation watchdog limit (zero = disabled).
    pub per_call_timeout: Duration,

    /// Cumulative budget for a single batch.
    pub total_timeout: Duration,

    /// Failures observed: panics, per-call overruns, exhausted budgets.
    pub error_count: u64,

    /// Wall-clock time spent inside `run` across all batches, loop overhead
    /// included.
    pub total_elapsed: Duration,

    /// Statistic the trial reports as its headline value.
    pub aggregation: Aggregation,

    /// Arithmetic mean of the series.
    pub mean: Duration,

    /// Median of the series.
    pub median: Duration,

    /// Most frequent duration; ties resolve to the smallest.
    pub mode: Duration,

    /// How many times the modal duration appears.
    pub mode_occurrences: usize,

    /// Harmonic mean of the series.
    pub harmonic_mean: Duration,

    /// Geometric mean of the series.
    pub geometric_mean: Duration,

    /// Headline value under the configured aggregation.
    pub representative: Duration,

    /// Whether the headline value is strictly under the target.
    pub met_target: bool,

    /// Signed distance from the target in seconds; positive means under
    /// target.
    pub to_target_secs: f64,

    /// Absolute distance from the target.
    pub to_target_abs: Duration,

    /// Slowest recorded duration.
    pub max: Extreme,

    /// Fastest recorded duration.
    pub min: Extreme,
}

/// A series extreme: its value, where it first appeared, and how often.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Extreme {
    /// The duration value itself.
    pub value: Duration,

    /// Zero-based index of its first occurrence in the series.
    pub first_index: usize,

    /// How many times it occurs in the series.
    pub occurrences: usize,
}

impl Extreme {
    fn locate(series: &[Duration], value: Duration) -> Self {
        Self {
            value,
            first_index: series.iter().position(|d| *d == value).unwrap_or(0),
            occurrences: series.iter().filter(|d| **d == value).count(),
        }
    }
}

/// Assemble a report from a trial's configuration and accumulated state.
pub(crate) fn build_report(
    config: &TrialConfig,
    series: &[Duration],
    expected_runs: u64,
    error_count: u64,
    total_elapsed: Duration,
) -> Result<TrialReport, TrialError> {
    if series.is_empty() {
        return Err(TrialError::EmptySeries);
    }

    let (mode, mode_occurrences) = statistics::mode_with_count(series)?;
    let representative = config.aggregation.apply(series)?;
    let met_target = representative < config.target;
    let to_target_secs = config.target.as_secs_f64() - representative.as_secs_f64();
    let to_target_abs = representative.abs_diff(config.target);

    let max_value = series.iter().copied().max().ok_or(TrialError::EmptySeries)?;
    let min_value = series.iter().copied().min().ok_or(TrialError::EmptySeries)?;

    Ok(TrialReport {
        expected_runs,
        completed_runs: series.len() as u64,
        target: config.target,
        per_call_timeout: config.per_call_timeout,
        total_timeout: config.total_timeout,
        error_count,
        total_elapsed,
        aggregation: config.aggregation,
        mean: statistics::mean(series)?,
        median: statistics::median(series)?,
        mode,
        mode_occurrences,
        harmonic_mean: statistics::harmonic_mean(series)?,
        geometric_mean: statistics::geometric_mean(series)?,
        representative,
        met_target,
        to_target_secs,
        to_target_abs,
        max: Extreme::locate(series, max_value),
        min: Extreme::locate(series, min_value),
    })
}
