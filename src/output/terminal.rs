//! Human-readable terminal rendering.
//!
//! Pure string producers: nothing here prints, and nothing touches global
//! stream state. Callers decide where the text goes.

use colored::Colorize;

use crate::compare::Ranking;
use crate::report::TrialReport;

/// Format a trial report as an aligned label/value block.
///
/// Uses ANSI colors for the target verdict; `colored` suppresses them
/// automatically when the output is not a terminal.
pub fn format_report(report: &TrialReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(48);

    output.push_str(&format!("{}\n", "trial report".bold()));
    output.push_str(&sep);
    output.push('\n');

    output.push_str(&format!("  {:<20}: {}\n", "Expected runs", report.expected_runs));
    output.push_str(&format!("  {:<20}: {}\n", "Successful runs", report.completed_runs));
    output.push_str(&format!("  {:<20}: {}\n", "Errors", report.error_count));
    output.push_str(&format!("  {:<20}: {:?}\n", "Target", report.target));
    output.push_str(&format!(
        "  {:<20}: {:?} total, {:?} per call\n",
        "Limits", report.total_timeout, report.per_call_timeout
    ));
    output.push_str(&format!("  {:<20}: {:?}\n", "Total time elapsed", report.total_elapsed));

    output.push_str(&sep);
    output.push('\n');

    output.push_str(&format!("  {:<20}: {:?}\n", "Mean", report.mean));
    output.push_str(&format!("  {:<20}: {:?}\n", "Median", report.median));
    output.push_str(&format!(
        "  {:<20}: {:?} (seen {}x)\n",
        "Mode", report.mode, report.mode_occurrences
    ));
    output.push_str(&format!("  {:<20}: {:?}\n", "Harmonic mean", report.harmonic_mean));
    output.push_str(&format!("  {:<20}: {:?}\n", "Geometric mean", report.geometric_mean));
    output.push_str(&format!(
        "  {:<20}: {:?} ({})\n",
        "Representative", report.representative, report.aggregation.name()
    ));

    let verdict = if report.met_target {
        "yes".green().bold()
    } else {
        "no".yellow().bold()
    };
    output.push_str(&format!("  {:<20}: {}\n", "Met target", verdict));
    output.push_str(&format!(
        "  {:<20}: {:+.6} s ({:?} absolute)\n",
        "To target", report.to_target_secs, report.to_target_abs
    ));

    output.push_str(&format!(
        "  {:<20}: {:?} (first at #{}, seen {}x)\n",
        "Slowest run", report.max.value, report.max.first_index, report.max.occurrences
    ));
    output.push_str(&format!(
        "  {:<20}: {:?} (first at #{}, seen {}x)\n",
        "Fastest run", report.min.value, report.min.first_index, report.min.occurrences
    ));

    output.push_str(&sep);
    output.push('\n');
    output
}

/// Format a ranking as a numbered leaderboard, fastest first.
pub fn format_ranking(ranking: &Ranking) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(48);

    output.push_str(&format!("{}\n", "comparison".bold()));
    output.push_str(&sep);
    output.push('\n');

    for (place, entry) in ranking.entries().iter().enumerate() {
        let line = format!(
            "  {:>2}. {:<24} {:>14.6} s",
            place + 1,
            entry.label,
            entry.score
        );
        if place == 0 {
            output.push_str(&format!("{}\n", line.green()));
        } else {
            output.push_str(&format!("{line}\n"));
        }
    }

    output.push_str(&sep);
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrialConfig;
    use crate::report::build_report;
    use crate::{Candidate, Comparison};
    use std::time::Duration;

    fn sample_report() -> TrialReport {
        let series = vec![
            Duration::from_millis(10),
            Duration::from_millis(20),
            Duration::from_millis(20),
        ];
        let config = TrialConfig {
            target: Duration::from_millis(100),
            ..TrialConfig::default()
        };
        build_report(&config, &series, 3, 0, Duration::from_millis(55)).unwrap()
    }

    #[test]
    fn report_contains_every_section() {
        let text = format_report(&sample_report());
        for label in [
            "Expected runs",
            "Successful runs",
            "Errors",
            "Target",
            "Limits",
            "Total time elapsed",
            "Mean",
            "Median",
            "Mode",
            "Harmonic mean",
            "Geometric mean",
            "Representative",
            "Met target",
            "To target",
            "Slowest run",
            "Fastest run",
        ] {
            assert!(text.contains(label), "missing label {label:?}");
        }
    }

    #[test]
    fn report_shows_counts_and_mode_multiplicity() {
        let text = format_report(&sample_report());
        assert!(text.contains("Successful runs"));
        assert!(text.contains(": 3\n"));
        assert!(text.contains("seen 2x"));
    }

    #[test]
    fn ranking_lists_candidates_in_order() {
        let comparison = Comparison::new(vec![
            Candidate::new("alpha", || {}),
            Candidate::new("beta", || {}),
        ])
        .unwrap();
        let text = format_ranking(&comparison.ranking());
        let alpha_at = text.find("alpha").unwrap();
        let beta_at = text.find("beta").unwrap();
        assert!(alpha_at < beta_at);
        assert!(text.contains(" 1."));
        assert!(text.contains(" 2."));
    }
}
