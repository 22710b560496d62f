//! Loading bundles and configuration from disk.

use std::path::Path;

use adjudication::{AdjudicationConfig, DebateBundle};
use anyhow::{Context, Result};
use tracing::debug;

/// Config from an optional TOML file, then `FLOW_JUDGE_*` overrides.
pub fn load_config(path: Option<&Path>) -> Result<AdjudicationConfig> {
    let config = match path {
        Some(path) => AdjudicationConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AdjudicationConfig::default(),
    };
    let config = config
        .with_env_overrides()
        .context("Failed to apply FLOW_JUDGE_* overrides")?;
    debug!(?config, "Configuration loaded");
    Ok(config)
}

pub fn load_bundle(path: &Path) -> Result<DebateBundle> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read debate bundle: {}", path.display()))?;
    let bundle: DebateBundle = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse debate bundle: {}", path.display()))?;
    debug!(
        debate_id = %bundle.debate_id,
        arguments = bundle.arguments.len(),
        clashes = bundle.clashes.len(),
        issues = bundle.issues.len(),
        "Bundle loaded"
    );
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BUNDLE: &str = r#"{
        "debateId": "d1",
        "arguments": [
            {"id": "x", "authorId": "alice", "side": "pro", "claimText": "a", "qualityScore": 8},
            {"id": "y", "authorId": "bob", "side": "con", "claimText": "b", "qualityScore": 6}
        ],
        "clashes": [
            {"id": "c1", "attackerId": "x", "defenderId": "y", "clashType": "direct_refutation"}
        ],
        "issues": [
            {"id": "i1", "topic": "Emissions", "argumentIds": ["x", "y"]}
        ]
    }"#;

    #[test]
    fn test_load_bundle() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BUNDLE.as_bytes()).unwrap();

        let bundle = load_bundle(file.path()).unwrap();
        assert_eq!(bundle.debate_id, "d1");
        assert_eq!(bundle.arguments.len(), 2);
        assert!(bundle.motion.is_none());
        assert!(!bundle.clashes[0].defender_responsive);
    }

    #[test]
    fn test_load_bundle_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"debateId\": ").unwrap();

        let err = load_bundle(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse debate bundle"));

        let err = load_bundle(Path::new("/nonexistent/round.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/round.json"));
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "issueWinMargin = 1.5").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!((config.issue_win_margin - 1.5).abs() < f64::EPSILON);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "maxVotingIssues = 0").unwrap();
        assert!(load_config(Some(bad.path())).is_err());
    }
}
