use anyhow::{Context, Result};
use fgd_core::{AuditState, Signal, VerificationRequest};
use regex::{Regex, RegexBuilder};
use tracing::{debug, info};

use crate::Check;

/// Built-in failure indicators, in priority order. Matched case-insensitively.
pub const BUILTIN_INDICATORS: [&str; 6] = [
    "No tests found",
    "Permission denied",
    "Out of space",
    "Segmentation fault",
    r"\bKilled\b",
    r"\bERROR\b",
];

/// Scans the console log of a job that reported success for evidence of a
/// swallowed failure. Only the first matching indicator is reported.
pub struct LogScanCheck {
    indicators: Vec<Regex>,
}

impl LogScanCheck {
    /// `extra` is appended after the built-ins and matched case-sensitively.
    /// A blank pattern is ignored.
    pub fn new(extra: Option<&str>) -> Result<Self, regex::Error> {
        let mut indicators = BUILTIN_INDICATORS
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(p) = extra.filter(|p| !p.trim().is_empty()) {
            indicators.push(Regex::new(p)?);
        }
        Ok(Self { indicators })
    }

    /// Source text of the first indicator found anywhere in `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.indicators.iter().find(|re| re.is_match(text)).map(Regex::as_str)
    }
}

impl Check for LogScanCheck {
    fn name(&self) -> &'static str {
        "log_scan"
    }

    fn run(&self, req: &VerificationRequest, state: &mut AuditState) -> Result<()> {
        if req.exit_code != 0 {
            debug!(exit_code = req.exit_code, "job reported failure, log scan not needed");
            return Ok(());
        }
        let path = &req.logs_path;
        if !path.exists() {
            debug!(path = %path.display(), "no log file");
            return Ok(());
        }

        let bytes = std::fs::read(path).with_context(|| format!("read log {}", path.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        if let Some(pattern) = self.first_match(&text) {
            info!(pattern, "failure indicator in log of a green job");
            state.flag(Signal::IgnoredError);
            state.note("ignored_error_match", pattern);
        }
        Ok(())
    }
}
