use anyhow::{Context, Result};
use std::path::Path;

use fgd_core::VerificationResult;

/// Persist the result record, creating parent directories as needed.
/// Returns the serialized record so callers can echo exactly what was written.
pub fn write_result(out: &Path, result: &VerificationResult) -> Result<String> {
    let json = result.to_json().context("serialize result")?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create output dir {}", parent.display()))?;
    }
    std::fs::write(out, &json).with_context(|| format!("write result {}", out.display()))?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fgd_core::{Details, Verdict};
    use tempfile::tempdir;

    #[test]
    fn writes_record_into_new_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/deeper/fgd_result.json");
        let result = VerificationResult {
            verdict: Verdict::TrueGreen,
            signals: vec![],
            commit: "abc123".into(),
            details: Details::new(),
        };
        let json = write_result(&out, &result).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), json);
    }

    #[test]
    fn blocked_output_directory_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("file"), "x").unwrap();
        let out = dir.path().join("file/fgd_result.json");
        let result = VerificationResult {
            verdict: Verdict::TrueGreen,
            signals: vec![],
            commit: "abc123".into(),
            details: Details::new(),
        };
        assert!(write_result(&out, &result).is_err());
    }
}
