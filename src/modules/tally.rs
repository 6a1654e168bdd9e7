//! `tally` task: aggregate a file of reveals into the median result

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::tally::{aggregate, Response, TallyError};

#[derive(Debug, Error)]
pub enum TallyTaskError {
    #[error("failed to read reveals {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed reveals {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Tally(#[from] TallyError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Read reveals from `path`, a JSON array of `{ prices, market_status }`
/// objects.
pub fn load_reveals(path: &Path) -> Result<Vec<Response>, TallyTaskError> {
    let content = fs::read_to_string(path).map_err(|source| TallyTaskError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| TallyTaskError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Aggregate the reveals in `path` and write the result to `out` as JSON.
pub fn run(path: &Path, out: &mut impl Write) -> Result<Response, TallyTaskError> {
    let reveals = load_reveals(path)?;
    debug!(reveals = reveals.len(), path = %path.display(), "loaded reveals");

    let result = aggregate(&reveals)?;
    let json = serde_json::to_string(&result).map_err(|source| TallyTaskError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    writeln!(out, "{json}")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_reveals(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_run_prints_median() {
        let file = write_reveals(
            r#"[
                {"prices": [100.0, 3.0], "market_status": "open"},
                {"prices": [104.0], "market_status": "open"}
            ]"#,
        );
        let mut out = Vec::new();
        let result = run(file.path(), &mut out).unwrap();

        assert_eq!(result.prices, vec![102.0, 3.0]);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\"prices\":[102.0,3.0],\"market_status\":\"open\"}\n");
    }

    #[test]
    fn test_run_reports_mismatch() {
        let file = write_reveals(
            r#"[
                {"prices": [1.0], "market_status": "open"},
                {"prices": [1.0], "market_status": "halted"}
            ]"#,
        );
        let err = run(file.path(), &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            TallyTaskError::Tally(TallyError::StatusMismatch { .. })
        ));
        assert!(err.to_string().starts_with("Market status is inconsistent"));
    }

    #[test]
    fn test_run_rejects_bad_files() {
        let file = write_reveals(r#"{"prices": []}"#);
        assert!(matches!(
            run(file.path(), &mut Vec::new()),
            Err(TallyTaskError::Parse { .. })
        ));

        let file = write_reveals("[]");
        assert!(matches!(
            run(file.path(), &mut Vec::new()),
            Err(TallyTaskError::Tally(TallyError::NoReveals))
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_reveals(&dir.path().join("missing.json")),
            Err(TallyTaskError::Read { .. })
        ));
    }
}
