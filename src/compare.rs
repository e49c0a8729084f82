//! Head-to-head comparison of named routines.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::error::TrialError;
use crate::statistics::Aggregation;
use crate::trial::TimeTrial;

type Routine<'a> = Box<dyn FnMut() + Send + 'a>;

/// A labelled routine entered into a [`Comparison`].
///
/// The label is the candidate's identity: scores, buckets, and the final
/// ranking are all keyed by it, so it must be unique within a comparison.
pub struct Candidate<'a> {
    label: String,
    routine: Routine<'a>,
}

impl<'a> Candidate<'a> {
    /// Pair a routine with the stable label it is scored under.
    ///
    /// Arguments reach the routine through closure capture; return values
    /// are discarded, so wrap value-producing calls in a block.
    pub fn new(label: impl Into<String>, routine: impl FnMut() + Send + 'a) -> Self {
        Self {
            label: label.into(),
            routine: Box::new(routine),
        }
    }

    /// The label the candidate is scored under.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Candidate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Pits two or more candidates against each other and ranks them.
///
/// Each round measures every candidate once in declaration order and once in
/// reverse order, so drift that favours whoever happens to run first (cache
/// warmth, frequency scaling) cancels out across the round. Every
/// measurement is a fresh [`TimeTrial`] whose representative value is added
/// to the candidate's score and pushed into its sample bucket; after all
/// rounds, each candidate's final score is the reduction, with the
/// comparison's aggregation, of the values this run measured, in seconds.
/// Lower is faster.
///
/// Scores and the failure flag reset at the start of every
/// [`run`](Comparison::run), before the configuration is even checked;
/// sample buckets accumulate until [`reset`](Comparison::reset), mirroring
/// the trial's counter behavior, but entries from earlier runs are history
/// and never feed a later run's scores.
///
/// ```
/// use std::time::Duration;
/// use time_trial::{Candidate, Comparison};
///
/// let mut comparison = Comparison::new(vec![
///     Candidate::new("sum", || {
///         std::hint::black_box((0..100u64).sum::<u64>());
///     }),
///     Candidate::new("nap", || std::thread::sleep(Duration::from_millis(2))),
/// ])?
/// .rounds(1)
/// .runs_per_round(3);
///
/// let ranking = comparison.run()?;
/// assert_eq!(ranking.fastest().map(|e| e.label.as_str()), Some("sum"));
/// # Ok::<(), time_trial::TrialError>(())
/// ```
#[derive(Debug)]
pub struct Comparison<'a> {
    candidates: Vec<Candidate<'a>>,
    rounds: u32,
    runs_per_round: u32,
    per_call_timeout: Duration,
    aggregation: Aggregation,
    samples: BTreeMap<String, Vec<Duration>>,
    scores: BTreeMap<String, f64>,
    failed: bool,
}

impl<'a> Comparison<'a> {
    /// A comparison over `candidates` with the default knobs: 2 rounds of
    /// 50 runs per measurement, harmonic-mean scoring, no per-call limit.
    ///
    /// Rejects fewer than two candidates and duplicate labels.
    pub fn new(candidates: Vec<Candidate<'a>>) -> Result<Self, TrialError> {
        if candidates.len() < 2 {
            return Err(TrialError::Config(
                "a comparison needs at least two candidates".into(),
            ));
        }
        let mut labels = BTreeSet::new();
        for candidate in &candidates {
            if !labels.insert(candidate.label.clone()) {
                return Err(TrialError::Config(format!(
                    "duplicate candidate label '{}'",
                    candidate.label
                )));
            }
        }
        let samples = candidates
            .iter()
            .map(|c| (c.label.clone(), Vec::new()))
            .collect();
        let scores = candidates.iter().map(|c| (c.label.clone(), 0.0)).collect();
        Ok(Self {
            candidates,
            rounds: 2,
            runs_per_round: 50,
            per_call_timeout: Duration::ZERO,
            aggregation: Aggregation::HarmonicMean,
            samples,
            scores,
            failed: false,
        })
    }

    /// Set the number of forward+reverse rounds.
    pub fn rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set how many invocations each measurement's trial performs.
    pub fn runs_per_round(mut self, runs: u32) -> Self {
        self.runs_per_round = runs;
        self
    }

    /// Set the per-invocation watchdog limit applied to every measurement.
    pub fn per_call_timeout(mut self, limit: Duration) -> Self {
        self.per_call_timeout = limit;
        self
    }

    /// Set the statistic used both for each measurement's representative
    /// value and for reducing buckets into final scores.
    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Candidate labels in declaration order.
    pub fn labels(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.label.as_str()).collect()
    }

    /// Current scores in seconds, keyed by label. All zeros until a
    /// comparison has completed.
    pub fn scores(&self) -> &BTreeMap<String, f64> {
        &self.scores
    }

    /// Per-candidate representative-value buckets, keyed by label. Buckets
    /// span every run since the last [`reset`](Comparison::reset); score
    /// reduction only ever looks at the latest run's entries.
    pub fn samples(&self) -> &BTreeMap<String, Vec<Duration>> {
        &self.samples
    }

    /// Whether the last comparison failed.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Run the comparison: `rounds` rounds of a forward pass and a reverse
    /// pass over all candidates.
    ///
    /// The previous comparison's scores are discarded first, whatever
    /// happens next: a rejected configuration leaves every score at zero
    /// and the comparison marked failed. On any measurement failure every
    /// score is zeroed, the comparison is marked failed, and the error
    /// propagates unchanged. On success each candidate's score is this
    /// run's measurements reduced with the comparison's aggregation.
    pub fn run(&mut self) -> Result<Ranking, TrialError> {
        // Prior scores are discarded before validation; a rejected
        // configuration leaves zeroed scores and the failed flag set.
        self.failed = false;
        for score in self.scores.values_mut() {
            *score = 0.0;
        }

        if self.rounds == 0 {
            self.failed = true;
            return Err(TrialError::Config("rounds must be at least 1".into()));
        }
        if self.runs_per_round == 0 {
            self.failed = true;
            return Err(TrialError::Config(
                "runs_per_round must be at least 1".into(),
            ));
        }

        // Bucket entries below these marks are history from earlier
        // comparisons; only this run's measurements feed the final scores.
        let bucket_starts: BTreeMap<String, usize> = self
            .samples
            .iter()
            .map(|(label, bucket)| (label.clone(), bucket.len()))
            .collect();

        for _ in 0..self.rounds {
            for index in 0..self.candidates.len() {
                self.measure(index)?;
            }
            for index in (0..self.candidates.len()).rev() {
                self.measure(index)?;
            }
        }

        for (label, bucket) in &self.samples {
            let start = bucket_starts.get(label).copied().unwrap_or(0);
            let reduced = self.aggregation.apply(&bucket[start..])?;
            if let Some(score) = self.scores.get_mut(label) {
                *score = reduced.as_secs_f64();
            }
        }

        Ok(self.ranking())
    }

    /// Measure one candidate with a fresh trial and fold the result in.
    fn measure(&mut self, index: usize) -> Result<(), TrialError> {
        let runs = self.runs_per_round;
        let limit = self.per_call_timeout;
        let aggregation = self.aggregation;

        let candidate = &mut self.candidates[index];
        let mut trial = TimeTrial::new()
            .runs(runs)
            .per_call_timeout(limit)
            .aggregation(aggregation);

        let value = trial
            .run(&mut candidate.routine)
            .and_then(|_| trial.value());
        match value {
            Ok(value) => {
                let label = candidate.label.clone();
                if let Some(score) = self.scores.get_mut(&label) {
                    *score += value.as_secs_f64();
                }
                if let Some(bucket) = self.samples.get_mut(&label) {
                    bucket.push(value);
                }
                Ok(())
            }
            Err(err) => {
                self.failed = true;
                for score in self.scores.values_mut() {
                    *score = 0.0;
                }
                Err(err)
            }
        }
    }

    /// Current scores sorted ascending; callable at any time.
    pub fn ranking(&self) -> Ranking {
        let mut entries: Vec<RankEntry> = self
            .scores
            .iter()
            .map(|(label, score)| RankEntry {
                label: label.clone(),
                score: *score,
            })
            .collect();
        entries.sort_by(|a, b| a.score.total_cmp(&b.score));
        Ranking { entries }
    }

    /// Clear scores, sample buckets, and the failure flag; candidates and
    /// configuration are retained.
    pub fn reset(&mut self) {
        for score in self.scores.values_mut() {
            *score = 0.0;
        }
        for bucket in self.samples.values_mut() {
            bucket.clear();
        }
        self.failed = false;
    }

    /// Write the final `label → seconds` score mapping to `path` as pretty
    /// JSON.
    ///
    /// Refuses with [`TrialError::ExportRefused`] when the last comparison
    /// failed or when any score is zero (nothing completed yet).
    pub fn export_scores(&self, path: impl AsRef<Path>) -> Result<(), TrialError> {
        if self.failed {
            return Err(TrialError::ExportRefused(
                "the last comparison failed".into(),
            ));
        }
        if self.scores.values().any(|score| *score == 0.0) {
            return Err(TrialError::ExportRefused(
                "scores are missing or zero; run the comparison first".into(),
            ));
        }
        crate::output::json::write_scores(&self.scores, path.as_ref())
    }

    /// Render every candidate's sample bucket as one chart at `path`.
    ///
    /// Requires the `plot` feature; without it this returns
    /// [`TrialError::PlotUnavailable`].
    pub fn plot(&self, path: impl AsRef<Path>) -> Result<(), TrialError> {
        if self.failed {
            return Err(TrialError::ExportRefused(
                "the last comparison failed".into(),
            ));
        }
        crate::output::plot::render_comparison(self, path.as_ref())
    }
}

/// Final ordering of a comparison, ascending by score (fastest first).
#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    entries: Vec<RankEntry>,
}

/// One candidate's final score within a [`Ranking`].
#[derive(Debug, Clone, Serialize)]
pub struct RankEntry {
    /// Label supplied when the candidate was registered.
    pub label: String,
    /// Reduced score in seconds; lower is faster.
    pub score: f64,
}

impl Ranking {
    /// All entries, ascending by score.
    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    /// The entry with the smallest score.
    pub fn fastest(&self) -> Option<&RankEntry> {
        self.entries.first()
    }

    /// The entry with the largest score.
    pub fn slowest(&self) -> Option<&RankEntry> {
        self.entries.last()
    }

    /// Number of ranked candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ranking is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'r> IntoIterator for &'r Ranking {
    type Item = &'r RankEntry;
    type IntoIter = std::slice::Iter<'r, RankEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Vec<Candidate<'static>> {
        vec![
            Candidate::new("first", || {
                std::hint::black_box(1u64 + 1);
            }),
            Candidate::new("second", || {
                std::hint::black_box(2u64 * 2);
            }),
        ]
    }

    #[test]
    fn one_candidate_is_rejected() {
        let lone = vec![Candidate::new("only", || {})];
        assert!(matches!(
            Comparison::new(lone),
            Err(TrialError::Config(_))
        ));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let twins = vec![Candidate::new("twin", || {}), Candidate::new("twin", || {})];
        assert!(matches!(
            Comparison::new(twins),
            Err(TrialError::Config(_))
        ));
    }

    #[test]
    fn zero_rounds_rejected_at_run() {
        let mut comparison = Comparison::new(pair()).unwrap().rounds(0);
        assert!(matches!(comparison.run(), Err(TrialError::Config(_))));
        assert!(comparison.failed());
    }

    #[test]
    fn zero_runs_per_round_rejected_at_run() {
        let mut comparison = Comparison::new(pair()).unwrap().runs_per_round(0);
        assert!(matches!(comparison.run(), Err(TrialError::Config(_))));
        assert!(comparison.failed());
    }

    #[test]
    fn labels_keep_declaration_order() {
        let comparison = Comparison::new(pair()).unwrap();
        assert_eq!(comparison.labels(), vec!["first", "second"]);
    }

    #[test]
    fn ranking_sorts_ascending() {
        let mut comparison = Comparison::new(pair()).unwrap();
        comparison.scores.insert("first".into(), 3.5);
        comparison.scores.insert("second".into(), 1.25);
        let ranking = comparison.ranking();
        assert_eq!(ranking.fastest().map(|e| e.label.as_str()), Some("second"));
        assert_eq!(ranking.slowest().map(|e| e.label.as_str()), Some("first"));
        assert!(ranking.entries()[0].score <= ranking.entries()[1].score);
    }

    #[test]
    fn export_refused_before_any_run() {
        let comparison = Comparison::new(pair()).unwrap();
        assert!(matches!(
            comparison.export_scores("unused.json"),
            Err(TrialError::ExportRefused(_))
        ));
    }

    #[test]
    fn reset_clears_buckets_and_scores() {
        let mut comparison = Comparison::new(pair())
            .unwrap()
            .rounds(1)
            .runs_per_round(2);
        comparison.run().unwrap();
        assert!(comparison.samples().values().all(|b| !b.is_empty()));

        comparison.reset();
        assert!(comparison.samples().values().all(|b| b.is_empty()));
        assert!(comparison.scores().values().all(|s| *s == 0.0));
        assert!(!comparison.failed());
    }
}
