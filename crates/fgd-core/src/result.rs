use serde::Serialize;

use crate::{Details, Signal, Verdict};

/// The single externally observed output of an audit.
///
/// Field order here is the serialized field order.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct VerificationResult {
    pub verdict: Verdict,
    pub signals: Vec<Signal>,
    pub commit: String,
    pub details: Details,
}

impl VerificationResult {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }
}

/// Tool-level failure: the audit could not run to completion.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct ToolFailure {
    pub error: String,
}

#[derive(Serialize)]
struct ToolFailureRecord<'a> {
    verdict: &'static str,
    signals: [&'static str; 1],
    error: &'a str,
}

impl ToolFailure {
    pub const TAG: &'static str = "FGD_ERROR";

    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }

    pub fn to_json(&self) -> String {
        let record = ToolFailureRecord {
            verdict: Self::TAG,
            signals: [Self::TAG],
            error: &self.error,
        };
        // A struct of plain strings cannot fail to serialize.
        serde_json::to_string(&record).unwrap_or_else(|_| {
            format!("{{\"verdict\":\"{0}\",\"signals\":[\"{0}\"],\"error\":\"\"}}", Self::TAG)
        })
    }
}
