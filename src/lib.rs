//! # time-trial
//!
//! Wall-clock micro-benchmarks for whole routines: run a closure a fixed
//! number of times, collect the per-invocation duration series, and reduce
//! it to the statistic you care about. Built for millisecond-scale sanity
//! checks ("does this stay under 50 ms?") rather than nanosecond-scale
//! statistical benchmarking — there is no warmup, no outlier rejection, and
//! no significance testing, by design.
//!
//! - [`TimeTrial`] runs one routine in batches, enforcing a per-call
//!   watchdog limit and a cumulative batch budget, and snapshots everything
//!   into a [`TrialReport`].
//! - [`Comparison`] pits two or more labelled routines against each other
//!   over forward+reverse rounds and ranks them fastest-first.
//! - [`output`] renders reports and rankings for terminals, exports scores
//!   as JSON, and (with the `plot` feature) draws charts.
//!
//! ## Quick start
//!
//! ```
//! use std::time::Duration;
//! use time_trial::{Aggregation, TimeTrial};
//!
//! let mut trial = TimeTrial::new()
//!     .runs(200)
//!     .target(Duration::from_millis(5))
//!     .aggregation(Aggregation::Median);
//! trial.run(|| parse_fixture("alpha=1"))?;
//!
//! let report = trial.report()?;
//! assert!(report.met_target);
//! println!("{}", time_trial::output::terminal::format_report(&report));
//! # fn parse_fixture(s: &str) -> usize { s.len() }
//! # Ok::<(), time_trial::TrialError>(())
//! ```
//!
//! ## Comparing candidates
//!
//! ```
//! use time_trial::{Candidate, Comparison};
//!
//! let mut comparison = Comparison::new(vec![
//!     Candidate::new("iterative", || {
//!         std::hint::black_box(fib_iter(20));
//!     }),
//!     Candidate::new("recursive", || {
//!         std::hint::black_box(fib_rec(20));
//!     }),
//! ])?;
//!
//! let ranking = comparison.run()?;
//! for entry in &ranking {
//!     println!("{}: {:.6} s", entry.label, entry.score);
//! }
//! # fn fib_iter(n: u64) -> u64 { (0..n).fold((0, 1), |(a, b), _| (b, a + b)).0 }
//! # fn fib_rec(n: u64) -> u64 { if n < 2 { n } else { fib_rec(n - 1) + fib_rec(n - 2) } }
//! # Ok::<(), time_trial::TrialError>(())
//! ```
//!
//! ## Watchdog caveat
//!
//! A non-zero per-call limit runs each invocation on a worker thread with a
//! bounded wait. Safe Rust cannot preempt a routine that never returns: the
//! overrun is detected and reported at the deadline, but the trial still
//! waits for the call to finish before failing with the timeout error. The
//! measured routine must be `Send` for the same reason.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod compare;
mod config;
mod error;
mod report;
mod trial;
mod watchdog;

pub mod output;
pub mod statistics;

pub use compare::{Candidate, Comparison, RankEntry, Ranking};
pub use config::TrialConfig;
pub use error::TrialError;
pub use report::{Extreme, TrialReport};
pub use statistics::Aggregation;
pub use trial::TimeTrial;

/// One-shot convenience: run `routine` once under the default configuration
/// (100 invocations, 10 s budget) and return its representative duration.
///
/// ```
/// let mean = time_trial::time(|| (0..1000u64).product::<u64>())?;
/// assert!(mean < std::time::Duration::from_secs(1));
/// # Ok::<(), time_trial::TrialError>(())
/// ```
pub fn time<T, F>(routine: F) -> Result<std::time::Duration, TrialError>
where
    F: FnMut() -> T + Send,
{
    let mut trial = TimeTrial::new();
    trial.run(routine)?;
    trial.value()
}

/// Declarative trial macro.
///
/// Generates a `#[test]` that runs the routine and fails if the
/// representative duration does not stay strictly under the target.
#[cfg(feature = "macros")]
#[macro_export]
macro_rules! trial_test {
    ($name:ident {
        runs: $runs:expr,
        target: $target:expr,
        routine: $routine:expr $(,)?
    }) => {
        #[test]
        fn $name() {
            let mut trial = $crate::TimeTrial::new().runs($runs).target($target);
            trial.run($routine).expect("trial failed");
            let report = trial.report().expect("no report after a successful run");
            assert!(
                report.met_target,
                "target missed: representative {:?} against target {:?}",
                report.representative, report.target
            );
        }
    };
    ($name:ident {
        target: $target:expr,
        routine: $routine:expr $(,)?
    }) => {
        #[test]
        fn $name() {
            let mut trial = $crate::TimeTrial::new().target($target);
            trial.run($routine).expect("trial failed");
            let report = trial.report().expect("no report after a successful run");
            assert!(
                report.met_target,
                "target missed: representative {:?} against target {:?}",
                report.representative, report.target
            );
        }
    };
}
