//! JSON export of scores and reports.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::TrialError;
use crate::report::TrialReport;

/// The well-known score filename, for callers that want a conventional
/// location rather than choosing their own.
pub const DEFAULT_SCORES_PATH: &str = "time_trial_scores.json";

/// Serialize a `label → seconds` score mapping to a pretty JSON string.
pub fn scores_to_json(scores: &BTreeMap<String, f64>) -> Result<String, TrialError> {
    Ok(serde_json::to_string_pretty(scores)?)
}

/// Serialize a full trial report to a pretty JSON string.
pub fn report_to_json(report: &TrialReport) -> Result<String, TrialError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write a score mapping to `path` as pretty JSON.
pub fn write_scores(scores: &BTreeMap<String, f64>, path: &Path) -> Result<(), TrialError> {
    let body = scores_to_json(scores)?;
    fs::write(path, body).map_err(|source| TrialError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scores() -> BTreeMap<String, f64> {
        let mut scores = BTreeMap::new();
        scores.insert("alpha".to_string(), 0.125);
        scores.insert("beta".to_string(), 0.5);
        scores
    }

    #[test]
    fn scores_serialize_with_labels() {
        let json = scores_to_json(&sample_scores()).unwrap();
        assert!(json.contains("\"alpha\""));
        assert!(json.contains("\"beta\""));
        assert!(json.contains("0.125"));
    }

    #[test]
    fn scores_round_trip() {
        let scores = sample_scores();
        let json = scores_to_json(&scores).unwrap();
        let parsed: BTreeMap<String, f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, scores);
    }

    #[test]
    fn write_scores_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SCORES_PATH);
        write_scores(&sample_scores(), &path).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("\"alpha\""));
    }

    #[test]
    fn write_scores_reports_the_failing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("scores.json");
        let err = write_scores(&sample_scores(), &path).unwrap_err();
        match err {
            TrialError::Io { path: failed, .. } => {
                assert!(failed.ends_with("scores.json"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
