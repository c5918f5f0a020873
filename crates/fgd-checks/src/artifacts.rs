use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use fgd_core::{AuditState, Signal, VerificationRequest};
use tracing::{debug, info};

use crate::Check;

/// Required evidence must exist and regular files must be non-empty.
/// Stops at the first failure.
pub struct ArtifactPresenceCheck;

impl Check for ArtifactPresenceCheck {
    fn name(&self) -> &'static str {
        "artifact_presence"
    }

    fn run(&self, req: &VerificationRequest, state: &mut AuditState) -> Result<()> {
        for rel in &req.required {
            let path = under(&req.artifacts_dir, rel);
            if !path.exists() {
                info!(artifact = %rel, "required artifact missing");
                state.flag(Signal::MissingArtifact);
                state.note("missing", rel.as_str());
                return Ok(());
            }
            let meta = std::fs::metadata(&path).with_context(|| format!("stat {}", path.display()))?;
            if meta.is_file() && meta.len() == 0 {
                info!(artifact = %rel, "required artifact empty");
                state.flag(Signal::MissingArtifact);
                state.note("empty", rel.as_str());
                return Ok(());
            }
        }
        debug!(count = req.required.len(), "all required artifacts present");
        Ok(())
    }
}

/// `rel` resolved inside `base`; a leading root or prefix is dropped so an
/// absolute entry never escapes the artifacts directory.
fn under(base: &Path, rel: &str) -> PathBuf {
    let rel: PathBuf = Path::new(rel)
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    base.join(rel)
}
