use anyhow::{Context, Result};
use fgd_core::{AuditState, Signal, VerificationRequest};
use tracing::{debug, info};

use crate::{Check, FieldLookup};

/// The provenance record must name the commit under audit.
pub struct ProvenanceCheck;

impl Check for ProvenanceCheck {
    fn name(&self) -> &'static str {
        "provenance"
    }

    fn run(&self, req: &VerificationRequest, state: &mut AuditState) -> Result<()> {
        let path = req.provenance_path();
        if !path.exists() {
            debug!(path = %path.display(), "no provenance record");
            return Ok(());
        }

        let text = std::fs::read_to_string(&path).with_context(|| format!("read provenance {}", path.display()))?;
        let record = FieldLookup::parse(&text);
        let recorded = record.string("commit");
        state.note("provenance_commit", recorded);

        if let Some(recorded) = recorded {
            if recorded != req.commit {
                info!(recorded, expected = %req.commit, "provenance commit mismatch");
                state.flag(Signal::ProvenanceMismatch);
            }
        }
        Ok(())
    }
}
