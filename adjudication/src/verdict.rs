//! Verdict synthesizer: the decision and the issues it turned on.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::argument::ArgumentStore;
use crate::burden::{BurdenAnalysis, Presumption};
use crate::config::AdjudicationConfig;
use crate::error::{AdjudicationError, AdjudicationResult};
use crate::flow::{ArgumentStatus, FlowSheet};
use crate::issue::Issue;
use crate::side::{Outcome, Side, Team};
use crate::speaker::SpeakerEvaluation;

/// Keeps the confidence ratio finite when both scores are zero.
const CONFIDENCE_EPSILON: f64 = 1e-9;

/// Floor of the confidence scale; also the confidence of a draw.
const BASE_CONFIDENCE: u32 = 50;

const MAX_CONFIDENCE: u32 = 100;

/// Voting issues reported for a drawn round.
const DRAW_VOTING_ISSUES: usize = 3;

/// Lowest confidence that counts as a clear win.
pub const CLEAR_WIN_CONFIDENCE: u32 = 75;

/// How decisively the round was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    ClearWinner,
    NarrowWinner,
    Draw,
}

impl OutcomeType {
    /// Draws stay draws; a decided round is clear at 75% confidence or more.
    pub fn classify(winner: Outcome, confidence: u32) -> Self {
        if winner.is_draw() {
            Self::Draw
        } else if confidence >= CLEAR_WIN_CONFIDENCE {
            Self::ClearWinner
        } else {
            Self::NarrowWinner
        }
    }
}

impl std::fmt::Display for OutcomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClearWinner => write!(f, "clear_winner"),
            Self::NarrowWinner => write!(f, "narrow_winner"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// An issue the decision rests on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingIssue {
    pub issue_id: String,
    pub winner: Outcome,
    pub weight: u32,
    pub explanation: String,
}

/// The round's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub winner: Outcome,
    pub outcome_type: OutcomeType,
    /// 50–100.
    pub winner_confidence: u32,
    pub pro_score: u32,
    pub con_score: u32,
    pub margin: u32,
    pub issues_won_by_pro: u32,
    pub issues_won_by_con: u32,
    pub issue_draws: u32,
    /// Con arguments pro left unanswered.
    pub dropped_by_pro: u32,
    /// Pro arguments con left unanswered.
    pub dropped_by_con: u32,
    pub voting_issues: Vec<VotingIssue>,
    pub judge_notes: String,
}

/// Combines issue outcomes, burdens and speakers into a verdict.
pub struct VerdictSynthesizer<'a> {
    config: &'a AdjudicationConfig,
}

impl<'a> VerdictSynthesizer<'a> {
    pub fn new(config: &'a AdjudicationConfig) -> Self {
        Self { config }
    }

    pub fn synthesize(
        &self,
        issues: &[Issue],
        burden: &BurdenAnalysis,
        speakers: &[SpeakerEvaluation],
        store: &ArgumentStore,
        sheet: &FlowSheet,
    ) -> AdjudicationResult<Verdict> {
        if issues.is_empty() {
            return Err(AdjudicationError::NoContestableIssues);
        }

        let weight_won_by = |outcome: Outcome| -> u32 {
            issues
                .iter()
                .filter(|i| i.issue_winner == outcome)
                .map(|i| i.issue_weight)
                .sum()
        };
        let count_won_by = |outcome: Outcome| -> u32 {
            issues.iter().filter(|i| i.issue_winner == outcome).count() as u32
        };

        let pro_score = weight_won_by(Outcome::Pro);
        let con_score = weight_won_by(Outcome::Con);
        let margin = pro_score.abs_diff(con_score);
        let winner = match pro_score.cmp(&con_score) {
            std::cmp::Ordering::Greater => Outcome::Pro,
            std::cmp::Ordering::Less => Outcome::Con,
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        let winner_confidence = confidence(winner, margin, pro_score + con_score);
        let outcome_type = OutcomeType::classify(winner, winner_confidence);

        let mut dropped_by_pro = 0;
        let mut dropped_by_con = 0;
        for argument in store.iter() {
            if sheet.status(&argument.id)? != ArgumentStatus::Dropped {
                continue;
            }
            match argument.side {
                Side::Con => dropped_by_pro += 1,
                Side::Pro => dropped_by_con += 1,
                Side::Neutral => {}
            }
        }

        let voting_issues = self.voting_issues(issues, winner);
        let judge_notes = judge_notes(winner, pro_score, con_score, winner_confidence, burden, speakers);

        info!(
            winner = %winner,
            outcome = %outcome_type,
            pro_score,
            con_score,
            margin,
            confidence = winner_confidence,
            voting_issues = voting_issues.len(),
            "Verdict reached"
        );

        Ok(Verdict {
            winner,
            outcome_type,
            winner_confidence,
            pro_score,
            con_score,
            margin,
            issues_won_by_pro: count_won_by(Outcome::Pro),
            issues_won_by_con: count_won_by(Outcome::Con),
            issue_draws: count_won_by(Outcome::Draw),
            dropped_by_pro,
            dropped_by_con,
            voting_issues,
            judge_notes,
        })
    }

    /// Issues the winner carried, heaviest first; the three heaviest on a draw.
    fn voting_issues(&self, issues: &[Issue], winner: Outcome) -> Vec<VotingIssue> {
        let mut selected: Vec<&Issue> = match winner {
            Outcome::Draw => issues.iter().collect(),
            decided => issues.iter().filter(|i| i.issue_winner == decided).collect(),
        };
        // Stable: equal weights keep input order
        selected.sort_by(|a, b| b.issue_weight.cmp(&a.issue_weight));

        let limit = match winner {
            Outcome::Draw => DRAW_VOTING_ISSUES.min(self.config.max_voting_issues),
            _ => self.config.max_voting_issues,
        };

        selected
            .into_iter()
            .take(limit)
            .map(|issue| VotingIssue {
                issue_id: issue.id.clone(),
                winner: issue.issue_winner,
                weight: issue.issue_weight,
                explanation: issue.headline().to_string(),
            })
            .collect()
    }
}

/// `min(100, round(margin / total × 100) + 50)` for a decided round.
pub fn confidence(winner: Outcome, margin: u32, total: u32) -> u32 {
    if winner.is_draw() {
        return BASE_CONFIDENCE;
    }
    let share = f64::from(margin) / (f64::from(total) + CONFIDENCE_EPSILON) * 100.0;
    (share.round() as u32 + BASE_CONFIDENCE).min(MAX_CONFIDENCE)
}

fn judge_notes(
    winner: Outcome,
    pro_score: u32,
    con_score: u32,
    confidence: u32,
    burden: &BurdenAnalysis,
    speakers: &[SpeakerEvaluation],
) -> String {
    let mut notes = Vec::with_capacity(4);

    notes.push(match winner.team() {
        Some(team) => format!(
            "Decision to {} on issue weight, {} to {} (confidence {}%).",
            team, pro_score, con_score, confidence
        ),
        None => format!(
            "The round is drawn on issue weight at {} apiece.",
            pro_score
        ),
    });

    let met = |team: Team| {
        if burden.burden_met.get(team) {
            "met"
        } else {
            "did not meet"
        }
    };
    notes.push(format!(
        "Pro {} its burden; con {} its burden.",
        met(Team::Pro),
        met(Team::Con)
    ));

    notes.push(match burden.presumption {
        Presumption::None => "Presumption was not needed.".to_string(),
        side => format!("Neither burden was met, so presumption sits with {}.", side),
    });

    if let Some(top) = speakers.first() {
        notes.push(format!(
            "Top speaker: {} ({:.1} points).",
            top.author, top.speaker_points
        ));
    }

    notes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Argument;
    use crate::burden::BurdenAnalyzer;
    use crate::flow::FlowTracker;

    fn issue(id: &str, winner: Outcome, weight: u32) -> Issue {
        Issue {
            id: id.to_string(),
            topic: id.to_string(),
            description: String::new(),
            pro_arguments: vec![format!("{}-p", id)],
            con_arguments: vec![format!("{}-c", id)],
            neutral_arguments: Vec::new(),
            clashes: Vec::new(),
            issue_winner: winner,
            issue_weight: weight,
            pro_strength: 0.0,
            con_strength: 0.0,
            one_sided: false,
            reasoning: format!("{} headline\ndetail", id),
        }
    }

    fn synthesize(issues: &[Issue]) -> AdjudicationResult<Verdict> {
        let config = AdjudicationConfig::default();
        let store = ArgumentStore::new(vec![
            Argument::new("p", "alice", Side::Pro, "unanswered", 5.0),
            Argument::new("q", "bob", Side::Con, "also unanswered", 5.0),
            Argument::new("r", "bob", Side::Con, "again", 5.0),
        ])
        .unwrap();
        let sheet = FlowTracker::new().track(&store, &[]);
        let burden = BurdenAnalyzer::new(&config).analyze(None, issues);
        VerdictSynthesizer::new(&config).synthesize(issues, &burden, &[], &store, &sheet)
    }

    #[test]
    fn test_weighted_issue_decision() {
        let verdict = synthesize(&[issue("i1", Outcome::Pro, 6), issue("i2", Outcome::Con, 4)]).unwrap();
        assert_eq!(verdict.pro_score, 6);
        assert_eq!(verdict.con_score, 4);
        assert_eq!(verdict.winner, Outcome::Pro);
        assert_eq!(verdict.margin, 2);
        assert_eq!(verdict.winner_confidence, 70);
        assert_eq!(verdict.outcome_type, OutcomeType::NarrowWinner);
        assert_eq!(verdict.voting_issues.len(), 1);
        assert_eq!(verdict.voting_issues[0].issue_id, "i1");
        assert_eq!(verdict.voting_issues[0].explanation, "i1 headline");
        assert!(verdict.judge_notes.starts_with("Decision to pro"));
    }

    #[test]
    fn test_empty_issue_set_fails() {
        assert_eq!(synthesize(&[]).unwrap_err(), AdjudicationError::NoContestableIssues);
    }

    #[test]
    fn test_dropped_counts_credit_the_answering_duty() {
        let verdict = synthesize(&[issue("i1", Outcome::Draw, 2)]).unwrap();
        // q and r are con arguments pro never answered
        assert_eq!(verdict.dropped_by_pro, 2);
        assert_eq!(verdict.dropped_by_con, 1);
    }

    #[test]
    fn test_draw_reports_three_heaviest() {
        let verdict = synthesize(&[
            issue("i1", Outcome::Pro, 2),
            issue("i2", Outcome::Con, 2),
            issue("i3", Outcome::Draw, 9),
            issue("i4", Outcome::Draw, 1),
            issue("i5", Outcome::Draw, 5),
        ])
        .unwrap();
        assert_eq!(verdict.winner, Outcome::Draw);
        assert_eq!(verdict.winner_confidence, 50);
        assert_eq!(verdict.outcome_type, OutcomeType::Draw);
        assert_eq!(verdict.issue_draws, 3);
        let ids: Vec<&str> = verdict.voting_issues.iter().map(|v| v.issue_id.as_str()).collect();
        assert_eq!(ids, vec!["i3", "i5", "i1"]);
    }

    #[test]
    fn test_voting_issues_capped_and_sorted() {
        let issues: Vec<Issue> = (0..8)
            .map(|n| issue(&format!("i{}", n), Outcome::Con, n % 4))
            .collect();
        let verdict = synthesize(&issues).unwrap();
        assert_eq!(verdict.winner, Outcome::Con);
        assert_eq!(verdict.voting_issues.len(), 5);
        let weights: Vec<u32> = verdict.voting_issues.iter().map(|v| v.weight).collect();
        assert_eq!(weights, vec![3, 3, 2, 2, 1]);
        // i3 precedes i7 at equal weight
        assert_eq!(verdict.voting_issues[0].issue_id, "i3");
        assert_eq!(verdict.winner_confidence, 100);
        assert_eq!(verdict.outcome_type, OutcomeType::ClearWinner);
    }

    #[test]
    fn test_outcome_type_boundaries() {
        assert_eq!(OutcomeType::classify(Outcome::Draw, 50), OutcomeType::Draw);
        assert_eq!(OutcomeType::classify(Outcome::Pro, 74), OutcomeType::NarrowWinner);
        assert_eq!(OutcomeType::classify(Outcome::Con, 75), OutcomeType::ClearWinner);
        assert_eq!(OutcomeType::classify(Outcome::Pro, 100), OutcomeType::ClearWinner);
        for outcome in [OutcomeType::ClearWinner, OutcomeType::NarrowWinner, OutcomeType::Draw] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome));
        }
    }

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(confidence(Outcome::Draw, 0, 0), 50);
        assert_eq!(confidence(Outcome::Pro, 10, 10), 100);
        assert_eq!(confidence(Outcome::Con, 1, 19), 55);
        for total in 1..=20u32 {
            for margin in 1..=total {
                let c = confidence(Outcome::Pro, margin, total);
                assert!((50..=100).contains(&c));
            }
        }
    }
}
