use anyhow::Result;
use fgd_core::{AuditState, VerificationRequest};

/// One evidence check in the audit pipeline.
///
/// A check converts every format problem in its own evidence into signals or
/// details. An `Err` is reserved for tool failures and aborts the audit.
pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, req: &VerificationRequest, state: &mut AuditState) -> Result<()>;
}
