use fgd_core::{AuditState, Verdict, VerificationResult};

/// Final verdict over everything the checks accumulated, in execution order.
pub fn aggregate(commit: &str, state: AuditState) -> VerificationResult {
    let (signals, details) = state.into_parts();
    VerificationResult {
        verdict: Verdict::from_signals(&signals),
        signals,
        commit: commit.to_string(),
        details,
    }
}
