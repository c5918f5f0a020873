use serde::{Deserialize, Serialize};

/// Typed evidence signals. Any signal in a run forces `FALSE_GREEN`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    MissingArtifact,
    CorruptTestReport,
    TestsNotExecuted,
    IgnoredError,
    CacheSanityFail,
    ProvenanceMismatch,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::MissingArtifact => "MISSING_ARTIFACT",
            Signal::CorruptTestReport => "CORRUPT_TEST_REPORT",
            Signal::TestsNotExecuted => "TESTS_NOT_EXECUTED",
            Signal::IgnoredError => "IGNORED_ERROR",
            Signal::CacheSanityFail => "CACHE_SANITY_FAIL",
            Signal::ProvenanceMismatch => "PROVENANCE_MISMATCH",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    TrueGreen,
    FalseGreen,
}

pub const EXIT_TRUE_GREEN: i32 = 0;
pub const EXIT_FALSE_GREEN: i32 = 2;
pub const EXIT_FGD_ERROR: i32 = 3;

impl Verdict {
    /// Pure aggregation rule: no signals means the green can be trusted.
    pub fn from_signals(signals: &[Signal]) -> Self {
        if signals.is_empty() {
            Verdict::TrueGreen
        } else {
            Verdict::FalseGreen
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::TrueGreen => "TRUE_GREEN",
            Verdict::FalseGreen => "FALSE_GREEN",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::TrueGreen => EXIT_TRUE_GREEN,
            Verdict::FalseGreen => EXIT_FALSE_GREEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_wire_names() {
        for s in [
            Signal::MissingArtifact,
            Signal::CorruptTestReport,
            Signal::TestsNotExecuted,
            Signal::IgnoredError,
            Signal::CacheSanityFail,
            Signal::ProvenanceMismatch,
        ] {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
        }
        assert_eq!(serde_json::to_string(&Verdict::FalseGreen).unwrap(), "\"FALSE_GREEN\"");
    }

    #[test]
    fn verdict_follows_signal_presence() {
        assert_eq!(Verdict::from_signals(&[]), Verdict::TrueGreen);
        assert_eq!(Verdict::from_signals(&[Signal::IgnoredError]), Verdict::FalseGreen);
        assert_eq!(Verdict::TrueGreen.exit_code(), 0);
        assert_eq!(Verdict::FalseGreen.exit_code(), 2);
    }
}
