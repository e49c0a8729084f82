//! Trial configuration and validation.

use std::time::Duration;

use crate::error::TrialError;
use crate::statistics::Aggregation;

/// Configuration for a [`TimeTrial`](crate::TimeTrial).
///
/// All fields are public; construct with struct update syntax over
/// [`TrialConfig::default`] or go through the chained setters on
/// [`TimeTrial`](crate::TimeTrial).
#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// Number of invocations per batch (default: 100).
    pub runs: u32,

    /// Wall-clock target one invocation is expected to stay under
    /// (default: 1 s).
    pub target: Duration,

    /// Per-invocation watchdog limit. Zero disables the watchdog and runs
    /// every invocation inline (default: zero).
    pub per_call_timeout: Duration,

    /// Cumulative wall-clock budget for a single batch, loop overhead
    /// included (default: 10 s). A zero budget is accepted and fails the
    /// first invocation.
    pub total_timeout: Duration,

    /// Statistic used to reduce the duration series to one representative
    /// value (default: mean).
    pub aggregation: Aggregation,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            target: Duration::from_secs(1),
            per_call_timeout: Duration::ZERO,
            total_timeout: Duration::from_secs(10),
            aggregation: Aggregation::Mean,
        }
    }
}

impl TrialConfig {
    /// Check the configuration for unusable parameter combinations.
    ///
    /// Called eagerly by [`TimeTrial::with_config`](crate::TimeTrial::with_config)
    /// and again at the start of every run, so configurations assembled
    /// through the chained setters are caught before any measurement.
    pub fn validate(&self) -> Result<(), TrialError> {
        if self.runs == 0 {
            return Err(TrialError::Config("runs must be at least 1".into()));
        }
        if self.target.is_zero() {
            return Err(TrialError::Config("target must be positive".into()));
        }
        if self.per_call_timeout > self.total_timeout {
            return Err(TrialError::Config(format!(
                "per-call limit {:?} exceeds the total budget {:?}",
                self.per_call_timeout, self.total_timeout
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TrialConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_runs_rejected() {
        let config = TrialConfig {
            runs: 0,
            ..TrialConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrialError::Config(_))));
    }

    #[test]
    fn zero_target_rejected() {
        let config = TrialConfig {
            target: Duration::ZERO,
            ..TrialConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrialError::Config(_))));
    }

    #[test]
    fn per_call_limit_above_budget_rejected() {
        let config = TrialConfig {
            per_call_timeout: Duration::from_secs(20),
            total_timeout: Duration::from_secs(10),
            ..TrialConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrialError::Config(_))));
    }

    #[test]
    fn per_call_limit_equal_to_budget_accepted() {
        let config = TrialConfig {
            per_call_timeout: Duration::from_secs(10),
            total_timeout: Duration::from_secs(10),
            ..TrialConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_budget_accepted() {
        // A zero total budget is valid configuration; it fails at run time
        // instead, once any time at all has elapsed.
        let config = TrialConfig {
            total_timeout: Duration::ZERO,
            ..TrialConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
