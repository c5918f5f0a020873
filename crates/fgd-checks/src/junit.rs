use std::path::Path;

use anyhow::Result;
use fgd_core::{AuditState, Signal, VerificationRequest};
use thiserror::Error;
use tracing::{debug, info};

use crate::Check;

#[derive(Debug, Error)]
pub enum JunitError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("{0}")]
    Xml(#[from] roxmltree::Error),
    #[error("unsupported JUnit root element: {0}")]
    UnsupportedRoot(String),
}

impl JunitError {
    pub fn kind(&self) -> &'static str {
        match self {
            JunitError::Io(_) => "IoError",
            JunitError::Encoding(_) => "EncodingError",
            JunitError::Xml(_) => "XmlError",
            JunitError::UnsupportedRoot(_) => "UnsupportedRoot",
        }
    }

    /// `<Kind>: <message>`, as recorded under `junit_parse_error`.
    pub fn describe(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

pub fn parse_junit_file(path: &Path) -> Result<i64, JunitError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes)?;
    count_executed_tests(&text)
}

/// Executed-test count of a JUnit document rooted at `<testsuite>` or
/// `<testsuites>`. DOCTYPE declarations are rejected, so entities never expand.
pub fn count_executed_tests(xml: &str) -> Result<i64, JunitError> {
    let opts = roxmltree::ParsingOptions {
        allow_dtd: false,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, opts)?;
    let root = doc.root_element();
    let tag = root.tag_name().name();

    if tag.eq_ignore_ascii_case("testsuite") {
        return Ok(tests_attr(root));
    }
    if tag.eq_ignore_ascii_case("testsuites") {
        let declared = tests_attr(root);
        if declared > 0 {
            return Ok(declared);
        }
        let sum = root
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "testsuite")
            .map(tests_attr)
            .fold(0i64, i64::saturating_add);
        return Ok(sum);
    }

    Err(JunitError::UnsupportedRoot(tag.to_string()))
}

/// Absent, blank or non-numeric `tests` counts as zero.
fn tests_attr(node: roxmltree::Node<'_, '_>) -> i64 {
    node.attribute("tests")
        .map(str::trim)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0)
}

/// Skipped entirely once an artifact is known to be missing.
pub struct TestReportCheck;

impl Check for TestReportCheck {
    fn name(&self) -> &'static str {
        "test_report"
    }

    fn run(&self, req: &VerificationRequest, state: &mut AuditState) -> Result<()> {
        if state.has(Signal::MissingArtifact) {
            debug!("evidence incomplete, skipping test report");
            return Ok(());
        }
        let path = req.test_report_path();
        if !path.exists() {
            debug!(path = %path.display(), "no test report");
            return Ok(());
        }

        match parse_junit_file(&path) {
            Ok(tests) => {
                state.note("junit_tests", tests);
                if tests == 0 {
                    info!("test report declares zero executed tests");
                    state.flag(Signal::TestsNotExecuted);
                }
            }
            Err(e) => {
                info!(error = %e, "test report unreadable");
                state.flag(Signal::CorruptTestReport);
                state.note("junit_parse_error", e.describe());
            }
        }
        Ok(())
    }
}
