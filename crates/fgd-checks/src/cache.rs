use anyhow::{Context, Result};
use fgd_core::{AuditState, Signal, VerificationRequest};
use tracing::{debug, info};

use crate::{Check, FieldLookup};

/// A cache hit must not come with an output already known to be invalid.
pub struct CacheSanityCheck;

impl Check for CacheSanityCheck {
    fn name(&self) -> &'static str {
        "cache_sanity"
    }

    fn run(&self, req: &VerificationRequest, state: &mut AuditState) -> Result<()> {
        let path = &req.cache_meta_path;
        if !path.exists() {
            debug!(path = %path.display(), "no cache metadata");
            return Ok(());
        }

        let text = std::fs::read_to_string(path).with_context(|| format!("read cache metadata {}", path.display()))?;
        let record = FieldLookup::parse(&text);
        let hit = record.boolean("hit");
        let output_valid = record.boolean("outputValid");
        state.note("cache_hit", hit);
        state.note("cache_outputValid", output_valid);

        if hit == Some(true) && output_valid == Some(false) {
            info!("cache hit with invalid output");
            state.flag(Signal::CacheSanityFail);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fgd_core::DetailValue;
    use tempfile::tempdir;

    fn run_with(meta: &str) -> AuditState {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, meta).unwrap();
        let mut req = VerificationRequest::new("abc123");
        req.cache_meta_path = path;
        let mut state = AuditState::new();
        CacheSanityCheck.run(&req, &mut state).unwrap();
        state
    }

    #[test]
    fn hit_with_invalid_output_fails() {
        let state = run_with(r#"{"hit": true, "outputValid": false}"#);
        assert_eq!(state.signals(), &[Signal::CacheSanityFail]);
        assert_eq!(state.details().get("cache_hit"), Some(&DetailValue::Bool(true)));
        assert_eq!(state.details().get("cache_outputValid"), Some(&DetailValue::Bool(false)));
    }

    #[test]
    fn other_combinations_pass_but_are_recorded() {
        for meta in [
            r#"{"hit": false, "outputValid": false}"#,
            r#"{"hit": true, "outputValid": true}"#,
            r#"{"hit": true}"#,
            r#"{}"#,
        ] {
            let state = run_with(meta);
            assert!(state.signals().is_empty(), "{meta}");
            assert!(state.details().contains_key("cache_hit"));
            assert!(state.details().contains_key("cache_outputValid"));
        }
        let state = run_with(r#"{"hit": true}"#);
        assert_eq!(state.details().get("cache_outputValid"), Some(&DetailValue::Null));
    }

    #[test]
    fn non_strict_metadata_still_flags_invalid_hit() {
        for meta in [
            r#"{"hit": true, "outputValid": false,}"#,
            r#"{"hit": true, "outputValid": false, "note": }"#,
            "// written by ci\n{\"hit\": true, \"outputValid\": false}",
        ] {
            let state = run_with(meta);
            assert_eq!(state.signals(), &[Signal::CacheSanityFail], "{meta}");
            assert_eq!(state.details().get("cache_hit"), Some(&DetailValue::Bool(true)));
            assert_eq!(state.details().get("cache_outputValid"), Some(&DetailValue::Bool(false)));
        }
    }

    #[test]
    fn missing_metadata_is_silent() {
        let mut req = VerificationRequest::new("abc123");
        req.cache_meta_path = tempdir().unwrap().path().join("nope.json");
        let mut state = AuditState::new();
        CacheSanityCheck.run(&req, &mut state).unwrap();
        assert!(state.details().is_empty());
    }
}
