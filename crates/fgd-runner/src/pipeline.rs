use anyhow::{Context, Result};
use fgd_checks::{ArtifactPresenceCheck, CacheSanityCheck, Check, LogScanCheck, ProvenanceCheck, TestReportCheck};
use fgd_core::{AuditState, VerificationRequest, VerificationResult};
use tracing::{debug, info};

use crate::aggregate;

/// Ordered evidence checks. Order is part of the output contract: the first
/// signal in a result is treated as its primary cause.
pub struct Pipeline {
    checks: Vec<Box<dyn Check>>,
}

impl Pipeline {
    /// Standard pipeline: presence, test report, log scan, cache, provenance.
    pub fn for_request(req: &VerificationRequest) -> Result<Self> {
        let log_scan = LogScanCheck::new(req.error_pattern.as_deref()).context("compile --error-pattern")?;
        Ok(Self {
            checks: vec![
                Box::new(ArtifactPresenceCheck),
                Box::new(TestReportCheck),
                Box::new(log_scan),
                Box::new(CacheSanityCheck),
                Box::new(ProvenanceCheck),
            ],
        })
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn run(&self, req: &VerificationRequest) -> Result<VerificationResult> {
        let mut state = AuditState::new();
        for check in &self.checks {
            debug!(check = check.name(), "running check");
            check
                .run(req, &mut state)
                .with_context(|| format!("{} check", check.name()))?;
        }
        let result = aggregate(&req.commit, state);
        info!(
            verdict = result.verdict.as_str(),
            signals = result.signals.len(),
            commit = %result.commit,
            "audit complete"
        );
        Ok(result)
    }
}

/// Build the standard pipeline and run it once.
pub fn verify(req: &VerificationRequest) -> Result<VerificationResult> {
    Pipeline::for_request(req)?.run(req)
}
