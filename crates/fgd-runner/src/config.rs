use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use fgd_core::VerificationRequest;

/// Optional `fgd.toml` defaults. Every field may be overridden on the command line.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub artifacts_dir: Option<String>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub cache_meta: Option<String>,
    #[serde(default)]
    pub out: Option<String>,
    #[serde(default)]
    pub required: Option<Vec<String>>,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub error_pattern: Option<String>,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }
}

/// Values given explicitly on the command line.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub commit: Option<String>,
    pub artifacts_dir: Option<String>,
    pub logs: Option<String>,
    pub cache_meta: Option<String>,
    pub out: Option<String>,
    /// Comma-separated relative paths.
    pub required: Option<String>,
    pub exit_code: Option<i32>,
    pub error_pattern: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required arg: {0}")]
    MissingArg(&'static str),
    #[error("invalid --error-pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// A fully resolved run: the immutable request plus where to write its result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub request: VerificationRequest,
    pub out_path: PathBuf,
}

/// CLI value, else config value (tilde-expanded), else built-in default.
fn pick_path(cli: Option<String>, file: Option<&String>) -> Option<PathBuf> {
    cli.map(PathBuf::from)
        .or_else(|| file.map(|p| PathBuf::from(shellexpand::tilde(p).to_string())))
}

pub fn split_required(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn resolve(cli: Overrides, file: Option<&Config>) -> Result<Settings, ConfigError> {
    let empty = Config::default();
    let file = file.unwrap_or(&empty);

    let commit = cli
        .commit
        .or_else(|| file.commit.clone())
        .filter(|c| !c.trim().is_empty())
        .ok_or(ConfigError::MissingArg("--commit"))?;

    let mut req = VerificationRequest::new(commit);
    if let Some(dir) = pick_path(cli.artifacts_dir, file.artifacts_dir.as_ref()) {
        req.artifacts_dir = dir;
    }
    if let Some(logs) = pick_path(cli.logs, file.logs.as_ref()) {
        req.logs_path = logs;
    }
    if let Some(meta) = pick_path(cli.cache_meta, file.cache_meta.as_ref()) {
        req.cache_meta_path = meta;
    }
    if let Some(list) = cli.required {
        req.required = split_required(&list);
    } else if let Some(list) = &file.required {
        req.required = list.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string).collect();
    }
    req.exit_code = cli.exit_code.or(file.exit_code).unwrap_or(0);

    let pattern = cli
        .error_pattern
        .or_else(|| file.error_pattern.clone())
        .filter(|p| !p.trim().is_empty());
    if let Some(p) = &pattern {
        regex::Regex::new(p)?;
    }
    req.error_pattern = pattern;

    let out_path = pick_path(cli.out, file.out.as_ref()).unwrap_or_else(|| req.default_out_path());
    Ok(Settings { request: req, out_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn with_commit(commit: &str) -> Overrides {
        Overrides {
            commit: Some(commit.to_string()),
            ..Overrides::default()
        }
    }

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let s = resolve(with_commit("abc123"), None).unwrap();
        assert_eq!(s.request, VerificationRequest::new("abc123"));
        assert_eq!(s.out_path, PathBuf::from("artifacts/fgd_result.json"));
    }

    #[test]
    fn out_defaults_under_artifacts_dir() {
        let mut o = with_commit("abc123");
        o.artifacts_dir = Some("build/evidence".into());
        let s = resolve(o, None).unwrap();
        assert_eq!(s.out_path, PathBuf::from("build/evidence/fgd_result.json"));
    }

    #[test]
    fn missing_or_blank_commit_is_rejected() {
        assert!(matches!(resolve(Overrides::default(), None), Err(ConfigError::MissingArg("--commit"))));
        assert!(matches!(resolve(with_commit("  "), None), Err(ConfigError::MissingArg(_))));
        assert_eq!(
            resolve(Overrides::default(), None).unwrap_err().to_string(),
            "missing required arg: --commit"
        );
    }

    #[test]
    fn required_list_is_trimmed_and_drops_empty_entries() {
        assert_eq!(split_required(" a.xml , b.bin,,c.json, "), vec!["a.xml", "b.bin", "c.json"]);
    }

    #[test]
    fn blank_pattern_is_absent_and_invalid_pattern_rejected() {
        let mut o = with_commit("abc123");
        o.error_pattern = Some(" ".into());
        assert_eq!(resolve(o, None).unwrap().request.error_pattern, None);

        let mut o = with_commit("abc123");
        o.error_pattern = Some("(oops".into());
        assert!(matches!(resolve(o, None), Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn cli_overrides_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fgd.toml");
        std::fs::write(
            &path,
            r#"
commit = "fromfile"
artifacts_dir = "evidence"
required = ["report.xml", " bin "]
exit_code = 1
error_pattern = "FAILED"
"#,
        )
        .unwrap();
        let cfg = Config::load_from(&path).unwrap();

        let s = resolve(Overrides::default(), Some(&cfg)).unwrap();
        assert_eq!(s.request.commit, "fromfile");
        assert_eq!(s.request.artifacts_dir, PathBuf::from("evidence"));
        assert_eq!(s.request.required, vec!["report.xml", "bin"]);
        assert_eq!(s.request.exit_code, 1);
        assert_eq!(s.request.error_pattern.as_deref(), Some("FAILED"));

        let mut o = with_commit("abc123");
        o.exit_code = Some(0);
        o.required = Some("x.bin".into());
        let s = resolve(o, Some(&cfg)).unwrap();
        assert_eq!(s.request.commit, "abc123");
        assert_eq!(s.request.exit_code, 0);
        assert_eq!(s.request.required, vec!["x.bin"]);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fgd.toml");
        std::fs::write(&path, "comit = \"typo\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
