//! Clash evaluator. Decides each head-to-head exchange.
//!
//! Pairing discovery happens upstream; the evaluator only receives candidate
//! pairs and turns each into a decided [`Clash`].

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::argument::{Argument, ArgumentId, ArgumentStore, MAX_ARGUMENT_SCORE};
use crate::config::AdjudicationConfig;
use crate::error::{AdjudicationError, AdjudicationResult};

/// How the attacker engages the defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClashType {
    DirectRefutation,
    CounterEvidence,
    LogicalChallenge,
    SourceChallenge,
    Reframe,
}

impl std::fmt::Display for ClashType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectRefutation => write!(f, "direct_refutation"),
            Self::CounterEvidence => write!(f, "counter_evidence"),
            Self::LogicalChallenge => write!(f, "logical_challenge"),
            Self::SourceChallenge => write!(f, "source_challenge"),
            Self::Reframe => write!(f, "reframe"),
        }
    }
}

/// Which participant took the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClashWinner {
    Attacker,
    Defender,
    Draw,
}

impl std::fmt::Display for ClashWinner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attacker => write!(f, "attacker"),
            Self::Defender => write!(f, "defender"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Upstream-identified attack/defense pair, not yet decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClashCandidate {
    pub id: String,
    pub attacker_id: ArgumentId,
    pub defender_id: ArgumentId,
    pub clash_type: ClashType,
    /// Defender answers the attacker's specific mechanism.
    #[serde(default)]
    pub defender_responsive: bool,
}

impl ClashCandidate {
    pub fn new(id: &str, attacker_id: &str, defender_id: &str, clash_type: ClashType) -> Self {
        Self {
            id: id.to_string(),
            attacker_id: attacker_id.to_string(),
            defender_id: defender_id.to_string(),
            clash_type,
            defender_responsive: false,
        }
    }

    pub fn responsive(mut self) -> Self {
        self.defender_responsive = true;
        self
    }
}

/// A decided clash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clash {
    pub id: String,
    pub attacker_id: ArgumentId,
    pub defender_id: ArgumentId,
    pub clash_type: ClashType,
    pub winner: ClashWinner,
    /// Engagement quality (0–10).
    pub clash_quality: f64,
    pub winner_reasoning: String,
    pub attacker_effective_score: f64,
    pub defender_effective_score: f64,
}

impl Clash {
    /// Whether `argument_id` is either participant.
    pub fn involves(&self, argument_id: &str) -> bool {
        self.attacker_id == argument_id || self.defender_id == argument_id
    }

    pub fn winning_argument(&self) -> Option<&str> {
        match self.winner {
            ClashWinner::Attacker => Some(&self.attacker_id),
            ClashWinner::Defender => Some(&self.defender_id),
            ClashWinner::Draw => None,
        }
    }

    pub fn losing_argument(&self) -> Option<&str> {
        match self.winner {
            ClashWinner::Attacker => Some(&self.defender_id),
            ClashWinner::Defender => Some(&self.attacker_id),
            ClashWinner::Draw => None,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner != ClashWinner::Draw
    }
}

/// Decides candidate clashes from argument quality.
pub struct ClashEvaluator<'a> {
    config: &'a AdjudicationConfig,
}

impl<'a> ClashEvaluator<'a> {
    pub fn new(config: &'a AdjudicationConfig) -> Self {
        Self { config }
    }

    /// Decide a single pair. Pure: the same inputs always give the same clash.
    pub fn evaluate(
        &self,
        candidate: &ClashCandidate,
        attacker: &Argument,
        defender: &Argument,
    ) -> AdjudicationResult<Clash> {
        if !attacker.side.opposes(defender.side) {
            return Err(AdjudicationError::InvalidClash {
                clash_id: candidate.id.clone(),
                attacker_side: attacker.side,
                defender_side: defender.side,
            });
        }

        let attacker_effective = attacker.quality_score;
        let defender_effective = if candidate.defender_responsive {
            defender.quality_score + self.config.responsiveness_bonus
        } else {
            defender.quality_score
        };

        let gap = attacker_effective - defender_effective;
        let winner = if gap.abs() <= self.config.clash_draw_threshold {
            ClashWinner::Draw
        } else if gap > 0.0 {
            ClashWinner::Attacker
        } else {
            ClashWinner::Defender
        };

        let fallacies = (attacker.fallacy_count() + defender.fallacy_count()) as f64;
        let clash_quality = ((attacker.quality_score + defender.quality_score) / 2.0
            - fallacies * self.config.fallacy_penalty)
            .clamp(0.0, MAX_ARGUMENT_SCORE);

        let winner_reasoning = match winner {
            ClashWinner::Draw => format!(
                "{} ({:.1}) and {} ({:.1}) are within {:.1}; no winner",
                attacker.id,
                attacker_effective,
                defender.id,
                defender_effective,
                self.config.clash_draw_threshold
            ),
            ClashWinner::Attacker => format!(
                "attacker {} ({:.1}) outweighs defender {} ({:.1}) by {:.1}",
                attacker.id,
                attacker_effective,
                defender.id,
                defender_effective,
                gap
            ),
            ClashWinner::Defender => format!(
                "defender {} ({:.1}{}) withstands attacker {} ({:.1}) by {:.1}",
                defender.id,
                defender_effective,
                if candidate.defender_responsive {
                    ", responsive"
                } else {
                    ""
                },
                attacker.id,
                attacker_effective,
                -gap
            ),
        };

        debug!(
            clash_id = %candidate.id,
            %winner,
            attacker_effective,
            defender_effective,
            clash_quality,
            "Clash decided"
        );

        Ok(Clash {
            id: candidate.id.clone(),
            attacker_id: attacker.id.clone(),
            defender_id: defender.id.clone(),
            clash_type: candidate.clash_type,
            winner,
            clash_quality,
            winner_reasoning,
            attacker_effective_score: attacker_effective,
            defender_effective_score: defender_effective,
        })
    }

    /// Decide every candidate, resolving ids against the store.
    pub fn evaluate_all(
        &self,
        candidates: &[ClashCandidate],
        store: &ArgumentStore,
    ) -> AdjudicationResult<Vec<Clash>> {
        let mut seen = HashSet::with_capacity(candidates.len());
        let mut clashes = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if !seen.insert(candidate.id.as_str()) {
                return Err(AdjudicationError::DuplicateClash(candidate.id.clone()));
            }
            let referenced_by = format!("clash {}", candidate.id);
            let attacker = store.require(&candidate.attacker_id, &referenced_by)?;
            let defender = store.require(&candidate.defender_id, &referenced_by)?;
            clashes.push(self.evaluate(candidate, attacker, defender)?);
        }

        Ok(clashes)
    }
}
