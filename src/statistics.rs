//! Aggregate statistics over duration series.
//!
//! All statistics operate on exact integer nanoseconds: the series is stored
//! as [`Duration`] values, the mean and median are computed with integer
//! arithmetic, and the mode uses exact equality. Only the harmonic and
//! geometric means go through `f64`, since they have no exact integer form.
//!
//! Every public function reports [`TrialError::EmptySeries`] on an empty
//! series instead of panicking.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TrialError;

/// Statistic used to reduce a series of durations to a single
/// representative value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Middle value of the sorted series (average of the two middle values
    /// for an even-length series).
    Median,
    /// Most frequent value; ties resolve to the smallest duration.
    Mode,
    /// Harmonic mean: `n / Σ(1/x)`.
    HarmonicMean,
    /// Geometric mean: `exp(Σ ln(x) / n)`.
    GeometricMean,
}

impl Aggregation {
    /// Parse a statistic name.
    ///
    /// Anything unrecognized falls back to [`Aggregation::Mean`], so a typo
    /// in a hand-written name degrades to the least surprising statistic
    /// rather than an error.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "median" => Aggregation::Median,
            "mode" => Aggregation::Mode,
            "harmonic" | "harmonic_mean" => Aggregation::HarmonicMean,
            "geometric" | "geometric_mean" => Aggregation::GeometricMean,
            _ => Aggregation::Mean,
        }
    }

    /// Reduce `series` with this statistic.
    pub fn apply(self, series: &[Duration]) -> Result<Duration, TrialError> {
        match self {
            Aggregation::Mean => mean(series),
            Aggregation::Median => median(series),
            Aggregation::Mode => mode(series),
            Aggregation::HarmonicMean => harmonic_mean(series),
            Aggregation::GeometricMean => geometric_mean(series),
        }
    }

    /// Lowercase name of the statistic, matching what
    /// [`Aggregation::from_name`] accepts.
    pub fn name(self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
            Aggregation::Mode => "mode",
            Aggregation::HarmonicMean => "harmonic_mean",
            Aggregation::GeometricMean => "geometric_mean",
        }
    }
}

/// Arithmetic mean of the series, exact to the nanosecond (truncating).
pub fn mean(series: &[Duration]) -> Result<Duration, TrialError> {
    if series.is_empty() {
        return Err(TrialError::EmptySeries);
    }
    let total = series
        .iter()
        .fold(Duration::ZERO, |acc, d| acc.saturating_add(*d));
    Ok(total / series.len() as u32)
}

/// Median of the series.
///
/// For an even-length series this is the average of the two middle values,
/// computed in integer nanoseconds.
pub fn median(series: &[Duration]) -> Result<Duration, TrialError> {
    if series.is_empty() {
        return Err(TrialError::EmptySeries);
    }
    let mut sorted = series.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Ok(sorted[mid])
    } else {
        Ok(sorted[mid - 1].saturating_add(sorted[mid]) / 2)
    }
}

/// Most frequent duration in the series.
///
/// Frequency is counted with exact nanosecond equality. When several values
/// are tied for most frequent, the smallest wins.
pub fn mode(series: &[Duration]) -> Result<Duration, TrialError> {
    Ok(mode_with_count(series)?.0)
}

/// Most frequent duration together with how often it appears.
pub fn mode_with_count(series: &[Duration]) -> Result<(Duration, usize), TrialError> {
    if series.is_empty() {
        return Err(TrialError::EmptySeries);
    }
    let mut counts: BTreeMap<Duration, usize> = BTreeMap::new();
    for duration in series {
        *counts.entry(*duration).or_insert(0) += 1;
    }
    let mut best = (Duration::ZERO, 0usize);
    // Ascending iteration plus strict-greater keeps the smallest value
    // among tied frequencies.
    for (duration, count) in counts {
        if count > best.1 {
            best = (duration, count);
        }
    }
    Ok(best)
}

/// Harmonic mean of the series.
///
/// Degenerates to zero when the series contains a zero duration, mirroring
/// the limit of `n / Σ(1/x)` as any term approaches zero.
pub fn harmonic_mean(series: &[Duration]) -> Result<Duration, TrialError> {
    if series.is_empty() {
        return Err(TrialError::EmptySeries);
    }
    if series.iter().any(Duration::is_zero) {
        return Ok(Duration::ZERO);
    }
    let reciprocal_sum: f64 = series.iter().map(|d| 1.0 / d.as_nanos() as f64).sum();
    let nanos = series.len() as f64 / reciprocal_sum;
    Ok(Duration::from_nanos(nanos.round() as u64))
}

/// Geometric mean of the series.
///
/// Degenerates to zero when the series contains a zero duration.
pub fn geometric_mean(series: &[Duration]) -> Result<Duration, TrialError> {
    if series.is_empty() {
        return Err(TrialError::EmptySeries);
    }
    if series.iter().any(Duration::is_zero) {
        return Ok(Duration::ZERO);
    }
    let log_sum: f64 = series.iter().map(|d| (d.as_nanos() as f64).ln()).sum();
    let nanos = (log_sum / series.len() as f64).exp();
    Ok(Duration::from_nanos(nanos.round() as u64))
}
