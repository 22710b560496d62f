//! Scoring configuration, threaded explicitly through every component.
//!
//! Loaded from TOML (all keys optional, camelCase) and optionally overridden
//! by `FLOW_JUDGE_*` environment variables. The engine never reads the
//! environment itself; callers build the config and hand it over.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::side::Team;

/// Upper bound of an issue weight.
pub const MAX_ISSUE_WEIGHT: u32 = 10;

/// Error type for configuration loading and validation
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value}")]
    EnvVar { var: String, value: String },
}

/// Tunables of a scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdjudicationConfig {
    /// Side holding presumption when neither side meets its burden.
    pub presumption_default: Team,
    /// Effective clash scores this close are a draw.
    pub clash_draw_threshold: f64,
    /// Weight ceiling for issues argued by only one side.
    pub one_sided_weight_cap: u32,
    /// Added to a responsive defender's effective score.
    pub responsiveness_bonus: f64,
    /// Clash quality lost per fallacy on either participant.
    pub fallacy_penalty: f64,
    /// Strength lead required to take an issue.
    pub issue_win_margin: f64,
    /// Maximum entries in the verdict's voting issues.
    pub max_voting_issues: usize,
    /// Concurrent passes in a batch.
    pub max_parallel_debates: usize,
}

impl Default for AdjudicationConfig {
    fn default() -> Self {
        Self {
            presumption_default: Team::Con,
            clash_draw_threshold: 0.5,
            one_sided_weight_cap: 5,
            responsiveness_bonus: 1.0,
            fallacy_penalty: 1.0,
            issue_win_margin: 0.75,
            max_voting_issues: 5,
            max_parallel_debates: 4,
        }
    }
}

impl AdjudicationConfig {
    /// Parse from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `FLOW_JUDGE_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Recognized variables: `FLOW_JUDGE_PRESUMPTION`,
    /// `FLOW_JUDGE_CLASH_DRAW_THRESHOLD`, `FLOW_JUDGE_ONE_SIDED_WEIGHT_CAP`,
    /// `FLOW_JUDGE_ISSUE_WIN_MARGIN`, `FLOW_JUDGE_MAX_VOTING_ISSUES`,
    /// `FLOW_JUDGE_MAX_PARALLEL`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FLOW_JUDGE_PRESUMPTION") {
            self.presumption_default = v.parse().map_err(|_| ConfigError::EnvVar {
                var: "FLOW_JUDGE_PRESUMPTION".to_string(),
                value: v.clone(),
            })?;
        }
        if let Some(v) = parse_var(&lookup, "FLOW_JUDGE_CLASH_DRAW_THRESHOLD")? {
            self.clash_draw_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, "FLOW_JUDGE_ONE_SIDED_WEIGHT_CAP")? {
            self.one_sided_weight_cap = v;
        }
        if let Some(v) = parse_var(&lookup, "FLOW_JUDGE_ISSUE_WIN_MARGIN")? {
            self.issue_win_margin = v;
        }
        if let Some(v) = parse_var(&lookup, "FLOW_JUDGE_MAX_VOTING_ISSUES")? {
            self.max_voting_issues = v;
        }
        if let Some(v) = parse_var(&lookup, "FLOW_JUDGE_MAX_PARALLEL")? {
            self.max_parallel_debates = v;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values that would break the scoring invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("clashDrawThreshold", self.clash_draw_threshold),
            ("responsivenessBonus", self.responsiveness_bonus),
            ("fallacyPenalty", self.fallacy_penalty),
            ("issueWinMargin", self.issue_win_margin),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.one_sided_weight_cap > MAX_ISSUE_WEIGHT {
            return Err(ConfigError::Invalid(format!(
                "oneSidedWeightCap must be at most {}, got {}",
                MAX_ISSUE_WEIGHT, self.one_sided_weight_cap
            )));
        }
        if self.max_voting_issues == 0 {
            return Err(ConfigError::Invalid(
                "maxVotingIssues must be at least 1".to_string(),
            ));
        }
        if self.max_parallel_debates == 0 {
            return Err(ConfigError::Invalid(
                "maxParallelDebates must be at least 1".to_string(),
            ));
        }
        if self.max_parallel_debates > Semaphore::MAX_PERMITS {
            return Err(ConfigError::Invalid(format!(
                "maxParallelDebates must be at most {}, got {}",
                Semaphore::MAX_PERMITS,
                self.max_parallel_debates
            )));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVar {
                var: var.to_string(),
                value: raw,
            }),
    }
}
