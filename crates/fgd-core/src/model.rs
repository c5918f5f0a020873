use std::path::PathBuf;

pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
pub const DEFAULT_LOGS_PATH: &str = "logs/ci.log";
pub const DEFAULT_CACHE_META_PATH: &str = "cache/metadata.json";
pub const DEFAULT_REQUIRED: [&str; 3] = ["test_report.xml", "build_artifact.bin", "provenance.json"];
pub const RESULT_FILE_NAME: &str = "fgd_result.json";

/// Fixed locations of evidence inside the artifacts directory.
pub const TEST_REPORT_FILE: &str = "test_report.xml";
pub const PROVENANCE_FILE: &str = "provenance.json";

/// One audit of one CI job. Built once at startup and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    pub commit: String,
    pub artifacts_dir: PathBuf,
    pub logs_path: PathBuf,
    pub cache_meta_path: PathBuf,
    pub required: Vec<String>,
    pub exit_code: i32,
    pub error_pattern: Option<String>,
}

impl VerificationRequest {
    /// Request with every optional input at its default.
    pub fn new(commit: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            logs_path: PathBuf::from(DEFAULT_LOGS_PATH),
            cache_meta_path: PathBuf::from(DEFAULT_CACHE_META_PATH),
            required: DEFAULT_REQUIRED.iter().map(|s| s.to_string()).collect(),
            exit_code: 0,
            error_pattern: None,
        }
    }

    pub fn test_report_path(&self) -> PathBuf {
        self.artifacts_dir.join(TEST_REPORT_FILE)
    }

    pub fn provenance_path(&self) -> PathBuf {
        self.artifacts_dir.join(PROVENANCE_FILE)
    }

    pub fn default_out_path(&self) -> PathBuf {
        self.artifacts_dir.join(RESULT_FILE_NAME)
    }
}
