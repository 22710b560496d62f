//! Adjudication engine. Runs every component over one debate bundle.
//!
//! ```text
//! DebateBundle
//!   → ArgumentStore        (validate, index)
//!   → ClashEvaluator       (decide candidate pairs)
//!   → FlowTracker          (terminal status per argument)
//!   → IssueAggregator      (winner + weight per issue)
//!   → BurdenAnalyzer       (burdens, presumption)
//!   → SpeakerScorer        (points per author)
//!   → VerdictSynthesizer   (winner, margin, confidence, voting issues)
//! ```
//!
//! A pass is pure: no I/O, no shared mutable state. Batches fan out over a
//! `JoinSet` of blocking workers bounded by a semaphore.

use std::sync::Arc;
use std::time::Instant;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::argument::{Argument, ArgumentStore};
use crate::burden::{BurdenAnalysis, BurdenAnalyzer};
use crate::clash::{Clash, ClashCandidate, ClashEvaluator};
use crate::config::{AdjudicationConfig, ConfigError};
use crate::error::{AdjudicationError, AdjudicationResult};
use crate::flow::{ArgumentStatus, FlowTracker};
use crate::issue::{Issue, IssueAggregator, IssueGrouping};
use crate::speaker::{SpeakerEvaluation, SpeakerScorer};
use crate::verdict::{Verdict, VerdictSynthesizer};

/// Everything the extraction layer hands over for one debate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebateBundle {
    pub debate_id: String,
    /// Resolution under debate, used to phrase the burdens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<String>,
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub clashes: Vec<ClashCandidate>,
    pub issues: Vec<IssueGrouping>,
}

/// An argument together with its derived status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArgument {
    #[serde(flatten)]
    pub argument: Argument,
    pub status: ArgumentStatus,
}

/// Full result of a scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjudication {
    pub debate_id: String,
    pub arguments: Vec<ScoredArgument>,
    pub clashes: Vec<Clash>,
    pub issues: Vec<Issue>,
    pub burden: BurdenAnalysis,
    pub speakers: Vec<SpeakerEvaluation>,
    pub verdict: Verdict,
}

impl Adjudication {
    pub fn status_of(&self, argument_id: &str) -> Option<ArgumentStatus> {
        self.arguments
            .iter()
            .find(|a| a.argument.id == argument_id)
            .map(|a| a.status)
    }

    pub fn issue(&self, issue_id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == issue_id)
    }
}

/// Outcome of one bundle within a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub debate_id: String,
    pub result: AdjudicationResult<Adjudication>,
}

/// Runs scoring passes under a validated configuration.
#[derive(Debug, Clone)]
pub struct AdjudicationEngine {
    config: Arc<AdjudicationConfig>,
}

impl AdjudicationEngine {
    pub fn new(config: AdjudicationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &AdjudicationConfig {
        &self.config
    }

    /// Adjudicate a single debate.
    pub fn score(&self, bundle: &DebateBundle) -> AdjudicationResult<Adjudication> {
        let start = Instant::now();
        let config = self.config.as_ref();

        let store = ArgumentStore::new(bundle.arguments.clone())?;
        let clashes = ClashEvaluator::new(config).evaluate_all(&bundle.clashes, &store)?;
        let sheet = FlowTracker::new().track(&store, &clashes);
        let issues = IssueAggregator::new(config).aggregate(&bundle.issues, &store, &sheet, &clashes)?;
        let burden = BurdenAnalyzer::new(config).analyze(bundle.motion.as_deref(), &issues);
        let speakers = SpeakerScorer::new().score(&store, &sheet, &clashes)?;
        let verdict =
            VerdictSynthesizer::new(config).synthesize(&issues, &burden, &speakers, &store, &sheet)?;

        let arguments = store
            .iter()
            .map(|argument| {
                Ok(ScoredArgument {
                    status: sheet.status(&argument.id)?,
                    argument: argument.clone(),
                })
            })
            .collect::<AdjudicationResult<Vec<_>>>()?;

        info!(
            debate_id = %bundle.debate_id,
            winner = %verdict.winner,
            margin = verdict.margin,
            confidence = verdict.winner_confidence,
            arguments = arguments.len(),
            clashes = clashes.len(),
            issues = issues.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Debate adjudicated"
        );

        Ok(Adjudication {
            debate_id: bundle.debate_id.clone(),
            arguments,
            clashes,
            issues,
            burden,
            speakers,
            verdict,
        })
    }

    /// Adjudicate many debates concurrently. Entries come back in input
    /// order and a failed debate never affects the others.
    pub async fn score_batch(&self, bundles: Vec<DebateBundle>) -> Vec<BatchEntry> {
        let total = bundles.len();
        let sem = Arc::new(Semaphore::new(self.config.max_parallel_debates));
        let mut join_set: JoinSet<(usize, BatchEntry)> = JoinSet::new();
        let mut debate_ids = Vec::with_capacity(total);

        for (index, bundle) in bundles.into_iter().enumerate() {
            debate_ids.push(bundle.debate_id.clone());
            let sem = sem.clone();
            let engine = self.clone();

            join_set.spawn(async move {
                let debate_id = bundle.debate_id.clone();
                let result = match sem.acquire_owned().await {
                    Ok(_permit) => tokio::task::spawn_blocking(move || engine.score(&bundle))
                        .await
                        .unwrap_or_else(|e| Err(AdjudicationError::WorkerFailed(e.to_string()))),
                    Err(e) => Err(AdjudicationError::WorkerFailed(e.to_string())),
                };
                (index, BatchEntry { debate_id, result })
            });
        }

        let mut slots: Vec<Option<BatchEntry>> = (0..total).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, entry)) => {
                    match &entry.result {
                        Ok(adjudication) => debug!(
                            debate_id = %entry.debate_id,
                            winner = %adjudication.verdict.winner,
                            "Batch entry scored"
                        ),
                        Err(e) => warn!(debate_id = %entry.debate_id, error = %e, "Batch entry failed"),
                    }
                    slots[index] = Some(entry);
                }
                Err(e) => warn!(error = %e, "Batch worker panicked"),
            }
        }

        let entries: Vec<BatchEntry> = slots
            .into_iter()
            .zip(debate_ids)
            .map(|(slot, debate_id)| {
                slot.unwrap_or_else(|| BatchEntry {
                    debate_id,
                    result: Err(AdjudicationError::WorkerFailed("worker did not report".to_string())),
                })
            })
            .collect();

        info!(
            total,
            failed = entries.iter().filter(|e| e.result.is_err()).count(),
            "Batch complete"
        );
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clash::ClashType;
    use crate::side::{Outcome, Side};

    fn bundle() -> DebateBundle {
        DebateBundle {
            debate_id: "d1".to_string(),
            motion: Some("the city should build light rail".to_string()),
            arguments: vec![
                Argument::new("x", "alice", Side::Pro, "rail cuts emissions", 8.0)
                    .with_warrant("electric traction beats diesel per rider"),
                Argument::new("y", "bob", Side::Con, "buses are enough", 6.0),
            ],
            clashes: vec![ClashCandidate::new("c1", "x", "y", ClashType::DirectRefutation)],
            issues: vec![IssueGrouping::new("i1", "Emissions", &["x", "y"])],
        }
    }

    #[test]
    fn test_score_runs_pipeline() {
        let engine = AdjudicationEngine::new(AdjudicationConfig::default()).unwrap();
        let adjudication = engine.score(&bundle()).unwrap();

        assert_eq!(adjudication.debate_id, "d1");
        assert_eq!(adjudication.status_of("y"), Some(ArgumentStatus::Refuted));
        assert_eq!(adjudication.status_of("x"), Some(ArgumentStatus::Extended));
        assert_eq!(adjudication.verdict.winner, Outcome::Pro);
        assert_eq!(adjudication.speakers[0].author, "alice");
        assert!(adjudication.burden.burden_met.pro);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AdjudicationConfig {
            max_voting_issues: 0,
            ..AdjudicationConfig::default()
        };
        assert!(matches!(AdjudicationEngine::new(config), Err(ConfigError::Invalid(_))));

        let config = AdjudicationConfig {
            max_parallel_debates: 2,
            ..AdjudicationConfig::default()
        };
        let engine = AdjudicationEngine::new(config.clone()).unwrap();
        assert_eq!(engine.config(), &config);
    }

    #[test]
    fn test_drawn_attacker_is_not_a_drop() {
        let drawn = DebateBundle {
            debate_id: "d4".to_string(),
            motion: None,
            arguments: vec![
                Argument::new("x", "alice", Side::Pro, "rail cuts emissions", 6.0),
                Argument::new("y", "bob", Side::Con, "buses are enough", 6.2),
            ],
            clashes: vec![ClashCandidate::new("c1", "x", "y", ClashType::Reframe)],
            issues: vec![IssueGrouping::new("i1", "Emissions", &["x", "y"])],
        };
        let engine = AdjudicationEngine::new(AdjudicationConfig::default()).unwrap();
        let adjudication = engine.score(&drawn).unwrap();

        assert_eq!(adjudication.status_of("x"), Some(ArgumentStatus::Contested));
        assert_eq!(adjudication.status_of("y"), Some(ArgumentStatus::Contested));
        assert_eq!(adjudication.verdict.dropped_by_con, 0);
        assert_eq!(adjudication.verdict.dropped_by_pro, 0);
        assert_eq!(adjudication.speakers[0].arguments_drawn, 1);
    }

    #[test]
    fn test_scored_argument_flattens() {
        let engine = AdjudicationEngine::new(AdjudicationConfig::default()).unwrap();
        let json = serde_json::to_value(engine.score(&bundle()).unwrap()).unwrap();
        assert_eq!(json["arguments"][1]["id"], "y");
        assert_eq!(json["arguments"][1]["status"], "refuted");
        assert_eq!(json["arguments"][0]["warrant"], "electric traction beats diesel per rider");
        assert!(json["arguments"][1].get("warrant").is_none());
        assert_eq!(json["verdict"]["winner"], "pro");
        assert_eq!(json["burden"]["burdenMet"]["pro"], true);
    }

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let engine = AdjudicationEngine::new(AdjudicationConfig::default()).unwrap();
        let mut broken = bundle();
        broken.debate_id = "d2".to_string();
        broken.issues.clear();
        let mut third = bundle();
        third.debate_id = "d3".to_string();

        let entries = engine.score_batch(vec![bundle(), broken, third]).await;
        let ids: Vec<&str> = entries.iter().map(|e| e.debate_id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);
        assert!(entries[0].result.is_ok());
        assert_eq!(
            entries[1].result,
            Err(AdjudicationError::UnassignedArgument("x".to_string()))
        );
        assert!(entries[2].result.is_ok());
    }
}
