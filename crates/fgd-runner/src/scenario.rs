use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use fgd_core::{Signal, Verdict, VerificationRequest, VerificationResult};
use serde::Deserialize;

use crate::verify;

#[derive(Debug, Deserialize)]
pub struct ScenarioExpected {
    pub scenario_id: String,
    pub commit: String,
    #[serde(default)]
    pub exit_code: i32,
    #[serde(default)]
    pub error_pattern: Option<String>,
    #[serde(default)]
    pub required: Option<Vec<String>>,
    pub expect: ScenarioExpect,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioExpect {
    pub verdict: Verdict,
    pub signals: Vec<Signal>,
    /// Subset of details that must be present with exactly these values.
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
    /// Detail keys that must not be present.
    #[serde(default)]
    pub absent_details: Vec<String>,
}

pub fn load_expected(dir: &Path) -> Result<ScenarioExpected> {
    let p = dir.join("expected.yaml");
    let s = std::fs::read_to_string(&p).with_context(|| format!("read expected.yaml: {}", p.display()))?;
    let exp: ScenarioExpected = serde_yaml::from_str(&s).with_context(|| "parse expected.yaml")?;
    Ok(exp)
}

/// Fixture-mode audit of a scenario directory:
/// - `artifacts/` is the artifacts directory
/// - `logs/ci.log` and `cache/metadata.json` are optional
/// - commit, exit code and extra pattern come from `expected.yaml`
pub fn simulate(dir: &Path) -> Result<VerificationResult> {
    let exp = load_expected(dir)?;
    let mut req = VerificationRequest::new(exp.commit.clone());
    req.artifacts_dir = dir.join("artifacts");
    req.logs_path = dir.join("logs").join("ci.log");
    req.cache_meta_path = dir.join("cache").join("metadata.json");
    req.exit_code = exp.exit_code;
    req.error_pattern = exp.error_pattern.clone();
    if let Some(required) = &exp.required {
        req.required = required.clone();
    }
    verify(&req)
}

pub fn assert_matches_expected(exp: &ScenarioExpected, res: &VerificationResult) -> Result<()> {
    let id = &exp.scenario_id;
    if res.verdict != exp.expect.verdict {
        return Err(anyhow!("{id}: verdict {:?}, expected {:?}", res.verdict, exp.expect.verdict));
    }
    if res.signals != exp.expect.signals {
        return Err(anyhow!("{id}: signals {:?}, expected {:?}", res.signals, exp.expect.signals));
    }

    let details = serde_json::to_value(&res.details)?;
    for (key, want) in &exp.expect.details {
        match details.get(key) {
            Some(got) if got == want => {}
            got => return Err(anyhow!("{id}: detail {key} = {got:?}, expected {want}")),
        }
    }
    for key in &exp.expect.absent_details {
        if details.get(key).is_some() {
            return Err(anyhow!("{id}: detail {key} should be absent"));
        }
    }
    Ok(())
}
