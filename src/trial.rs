//! Repeated timed invocation of a single routine.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::TrialConfig;
use crate::error::TrialError;
use crate::report::{self, TrialReport};
use crate::statistics::Aggregation;
use crate::watchdog::{invoke_watched, Invocation};

/// Repeatedly times one routine and accumulates its duration series.
///
/// A trial is a stopwatch with opinions: [`run`](TimeTrial::run) invokes a
/// closure a configured number of times, records how long each invocation
/// took, and enforces a per-call watchdog limit and a cumulative batch
/// budget. The series reduces to a single representative value under the
/// configured [`Aggregation`], and [`report`](TimeTrial::report) snapshots
/// everything at once.
///
/// The series and all counters accumulate across successive `run` batches;
/// [`reset`](TimeTrial::reset) is the only boundary. This makes repeated
/// measurement of the same routine cheap, but it means `expected_runs` and
/// `total_elapsed` describe the trial's lifetime, not its last batch.
///
/// ```
/// use std::time::Duration;
/// use time_trial::TimeTrial;
///
/// let mut trial = TimeTrial::new()
///     .runs(50)
///     .target(Duration::from_millis(200));
/// trial.run(|| (0..1000u64).sum::<u64>())?;
/// let report = trial.report()?;
/// assert_eq!(report.completed_runs, 50);
/// # Ok::<(), time_trial::TrialError>(())
/// ```
#[derive(Debug)]
pub struct TimeTrial {
    config: TrialConfig,
    durations: Vec<Duration>,
    expected_runs: u64,
    error_count: u64,
    total_elapsed: Duration,
}

impl Default for TimeTrial {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeTrial {
    /// A trial with the default configuration: 100 runs per batch, a 1 s
    /// target, a 10 s batch budget, no per-call limit, mean aggregation.
    pub fn new() -> Self {
        Self {
            config: TrialConfig::default(),
            durations: Vec::new(),
            expected_runs: 0,
            error_count: 0,
            total_elapsed: Duration::ZERO,
        }
    }

    /// A trial with an explicit configuration, validated eagerly.
    pub fn with_config(config: TrialConfig) -> Result<Self, TrialError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Set the number of invocations per batch.
    pub fn runs(mut self, runs: u32) -> Self {
        self.config.runs = runs;
        self
    }

    /// Set the wall-clock target one invocation should stay under.
    pub fn target(mut self, target: Duration) -> Self {
        self.config.target = target;
        self
    }

    /// Set the per-invocation watchdog limit; zero disables it.
    pub fn per_call_timeout(mut self, limit: Duration) -> Self {
        self.config.per_call_timeout = limit;
        self
    }

    /// Set the cumulative budget for a single batch.
    pub fn total_timeout(mut self, budget: Duration) -> Self {
        self.config.total_timeout = budget;
        self
    }

    /// Set the statistic used to reduce the series.
    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.config.aggregation = aggregation;
        self
    }

    /// The current configuration.
    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    /// The recorded duration series, one entry per successful invocation.
    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    /// Invocations that completed and were recorded.
    pub fn completed_runs(&self) -> u64 {
        self.durations.len() as u64
    }

    /// Invocations requested across all batches, failed batches included.
    pub fn expected_runs(&self) -> u64 {
        self.expected_runs
    }

    /// Failures observed over the trial's lifetime.
    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    /// Wall-clock time spent inside [`run`](TimeTrial::run) so far, loop
    /// overhead included.
    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    /// Run one batch: invoke `routine` the configured number of times,
    /// recording each invocation's duration.
    ///
    /// Arguments reach the routine through closure capture. The closure must
    /// be `Send` because a non-zero per-call limit moves each invocation
    /// onto a watchdog worker thread; without a limit it runs inline.
    ///
    /// On success the series has grown by exactly `runs` entries and the
    /// cumulative [`total_elapsed`](TimeTrial::total_elapsed) is returned.
    /// Every failure path updates the error count and elapsed time *before*
    /// returning, so partial state stays inspectable:
    ///
    /// - a panicking routine fails the batch with [`TrialError::Routine`];
    /// - an invocation over a non-zero per-call limit fails with
    ///   [`TrialError::CallTimeout`];
    /// - cumulative batch time over the total budget fails with
    ///   [`TrialError::BudgetExhausted`].
    ///
    /// A failing invocation's duration is never recorded; durations from
    /// earlier invocations of the same batch remain.
    pub fn run<T, F>(&mut self, mut routine: F) -> Result<Duration, TrialError>
    where
        F: FnMut() -> T + Send,
    {
        self.config.validate()?;
        // Requested before the loop so failed batches still count.
        self.expected_runs += u64::from(self.config.runs);

        let batch = Instant::now();
        for index in 1..=u64::from(self.config.runs) {
            match invoke_watched(&mut routine, self.config.per_call_timeout) {
                Invocation::Completed(elapsed) => {
                    let spent = batch.elapsed();
                    if spent > self.config.total_timeout {
                        self.error_count += 1;
                        self.total_elapsed += spent;
                        return Err(TrialError::BudgetExhausted {
                            index,
                            limit: self.config.total_timeout,
                            elapsed: spent,
                        });
                    }
                    self.durations.push(elapsed);
                }
                Invocation::Overran(elapsed) => {
                    self.error_count += 1;
                    self.total_elapsed += batch.elapsed();
                    return Err(TrialError::CallTimeout {
                        index,
                        limit: self.config.per_call_timeout,
                        elapsed,
                    });
                }
                Invocation::Panicked(message) => {
                    self.error_count += 1;
                    self.total_elapsed += batch.elapsed();
                    return Err(TrialError::Routine { index, message });
                }
            }
        }
        self.total_elapsed += batch.elapsed();
        Ok(self.total_elapsed)
    }

    /// Reduce the recorded series with the configured aggregation.
    pub fn value(&self) -> Result<Duration, TrialError> {
        self.config.aggregation.apply(&self.durations)
    }

    /// Snapshot the trial: counts, limits, all five statistics, the
    /// representative value, target verdict, and series extremes.
    pub fn report(&self) -> Result<TrialReport, TrialError> {
        report::build_report(
            &self.config,
            &self.durations,
            self.expected_runs,
            self.error_count,
            self.total_elapsed,
        )
    }

    /// Clear the series and every counter; configuration is retained.
    pub fn reset(&mut self) {
        self.durations.clear();
        self.expected_runs = 0;
        self.error_count = 0;
        self.total_elapsed = Duration::ZERO;
    }

    /// Render the duration series as a line chart at `path`.
    ///
    /// Requires the `plot` feature; without it this returns
    /// [`TrialError::PlotUnavailable`].
    pub fn plot(&self, path: impl AsRef<Path>) -> Result<(), TrialError> {
        crate::output::plot::render_trial(self, path.as_ref())
    }
}
