//! Speaker scorer: per-participant points on fixed sub-scales.
//!
//! ```text
//! content              min(40, mean quality × 4)
//! style                min(40, mean style × 4)
//! strategy             clamp(2 × (extended + turned) − dropped, 0, 20)
//! intellectual honesty max(0, 10 − 2 × fallacious concessions)
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::argument::{Argument, ArgumentStore, FallacyFamily};
use crate::clash::Clash;
use crate::error::AdjudicationResult;
use crate::flow::{ArgumentStatus, FlowSheet};
use crate::side::Side;

pub const MAX_CONTENT: f64 = 40.0;
pub const MAX_STYLE: f64 = 40.0;
pub const MAX_STRATEGY: u32 = 20;
pub const MAX_HONESTY: u32 = 10;

/// Points lost per fallacious concession.
const HONESTY_PENALTY: u32 = 2;

/// One participant's scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerEvaluation {
    pub author: String,
    /// Majority side of the author's arguments.
    pub side: Side,
    pub content: f64,
    pub style: f64,
    pub strategy: u32,
    pub intellectual_honesty: u32,
    pub arguments_made: u32,
    pub arguments_won: u32,
    pub arguments_lost: u32,
    /// Clashes this speaker's arguments fought to a draw.
    pub arguments_drawn: u32,
    pub fallacy_count: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fallacy_families: BTreeMap<FallacyFamily, u32>,
    pub speaker_points: f64,
    /// 1 = best.
    pub rank: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct ClashRecord {
    won: u32,
    lost: u32,
    drawn: u32,
}

/// Scores every author in the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeakerScorer;

impl SpeakerScorer {
    pub fn new() -> Self {
        Self
    }

    /// Evaluations ranked by points descending, then author id.
    pub fn score(
        &self,
        store: &ArgumentStore,
        sheet: &FlowSheet,
        clashes: &[Clash],
    ) -> AdjudicationResult<Vec<SpeakerEvaluation>> {
        let records = clash_records(store, clashes);

        let mut evaluations = store
            .authors()
            .into_iter()
            .map(|author| {
                let arguments: Vec<&Argument> = store.by_author(author).collect();
                evaluate(
                    author,
                    &arguments,
                    sheet,
                    records.get(author).copied().unwrap_or_default(),
                )
            })
            .collect::<AdjudicationResult<Vec<_>>>()?;

        evaluations.sort_by(|a, b| {
            b.speaker_points
                .total_cmp(&a.speaker_points)
                .then_with(|| a.author.cmp(&b.author))
        });
        for (pos, evaluation) in evaluations.iter_mut().enumerate() {
            evaluation.rank = pos as u32 + 1;
        }

        debug!(
            speakers = evaluations.len(),
            top = evaluations.first().map(|e| e.author.as_str()).unwrap_or("-"),
            "Speakers scored"
        );
        Ok(evaluations)
    }
}

/// Clash outcomes tallied per author of the participating arguments.
fn clash_records<'s>(store: &'s ArgumentStore, clashes: &[Clash]) -> HashMap<&'s str, ClashRecord> {
    let mut records: HashMap<&str, ClashRecord> = HashMap::new();
    for clash in clashes {
        if !clash.is_decided() {
            for id in [&clash.attacker_id, &clash.defender_id] {
                if let Some(argument) = store.get(id) {
                    records.entry(argument.author_id.as_str()).or_default().drawn += 1;
                }
            }
            continue;
        }
        if let Some(winner) = clash.winning_argument().and_then(|id| store.get(id)) {
            records.entry(winner.author_id.as_str()).or_default().won += 1;
        }
        if let Some(loser) = clash.losing_argument().and_then(|id| store.get(id)) {
            records.entry(loser.author_id.as_str()).or_default().lost += 1;
        }
    }
    records
}

fn evaluate(
    author: &str,
    arguments: &[&Argument],
    sheet: &FlowSheet,
    record: ClashRecord,
) -> AdjudicationResult<SpeakerEvaluation> {
    let made = arguments.len() as f64;
    let mean_quality = arguments.iter().map(|a| a.quality_score).sum::<f64>() / made;
    let mean_style = arguments.iter().map(|a| a.effective_style()).sum::<f64>() / made;

    let mut carried = 0i64;
    let mut dropped = 0i64;
    for argument in arguments {
        match sheet.status(&argument.id)? {
            ArgumentStatus::Extended | ArgumentStatus::Turned => carried += 1,
            ArgumentStatus::Dropped => dropped += 1,
            ArgumentStatus::Contested | ArgumentStatus::Refuted | ArgumentStatus::Conceded => {}
        }
    }
    let strategy = (2 * carried - dropped).clamp(0, i64::from(MAX_STRATEGY)) as u32;

    let bad_faith = arguments
        .iter()
        .filter(|a| a.is_concession && a.fallacious_concession)
        .count() as u32;
    let intellectual_honesty = MAX_HONESTY.saturating_sub(HONESTY_PENALTY.saturating_mul(bad_faith));

    let mut fallacy_families = BTreeMap::new();
    for fallacy in arguments.iter().flat_map(|a| &a.fallacies) {
        *fallacy_families.entry(fallacy.kind.family()).or_insert(0) += 1;
    }

    let content = (mean_quality * 4.0).min(MAX_CONTENT);
    let style = (mean_style * 4.0).min(MAX_STYLE);

    Ok(SpeakerEvaluation {
        author: author.to_string(),
        side: majority_side(arguments),
        content,
        style,
        strategy,
        intellectual_honesty,
        arguments_made: arguments.len() as u32,
        arguments_won: record.won,
        arguments_lost: record.lost,
        arguments_drawn: record.drawn,
        fallacy_count: fallacy_families.values().sum(),
        fallacy_families,
        speaker_points: content + style + f64::from(strategy) + f64::from(intellectual_honesty),
        rank: 0,
    })
}

/// Side with strictly the most arguments; any tie is neutral.
fn majority_side(arguments: &[&Argument]) -> Side {
    let count = |side: Side| arguments.iter().filter(|a| a.side == side).count();
    let (pro, con, neutral) = (count(Side::Pro), count(Side::Con), count(Side::Neutral));
    if pro > con && pro > neutral {
        Side::Pro
    } else if con > pro && con > neutral {
        Side::Con
    } else {
        Side::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::FallacyKind;
    use crate::clash::{ClashCandidate, ClashEvaluator, ClashType};
    use crate::config::AdjudicationConfig;
    use crate::flow::FlowTracker;

    fn score(arguments: Vec<Argument>, candidates: &[ClashCandidate]) -> Vec<SpeakerEvaluation> {
        let config = AdjudicationConfig::default();
        let store = ArgumentStore::new(arguments).unwrap();
        let clashes = ClashEvaluator::new(&config)
            .evaluate_all(candidates, &store)
            .unwrap();
        let sheet = FlowTracker::new().track(&store, &clashes);
        SpeakerScorer::new().score(&store, &sheet, &clashes).unwrap()
    }

    fn find<'e>(evaluations: &'e [SpeakerEvaluation], author: &str) -> &'e SpeakerEvaluation {
        evaluations.iter().find(|e| e.author == author).unwrap()
    }

    #[test]
    fn test_extended_and_dropped_arguments() {
        let evaluations = score(
            vec![
                Argument::new("a1", "alice", Side::Pro, "strong", 9.0),
                Argument::new("a2", "alice", Side::Pro, "empty", 0.0),
                Argument::new("b1", "bob", Side::Con, "weak attack", 6.0),
            ],
            &[ClashCandidate::new("c1", "b1", "a1", ClashType::CounterEvidence)],
        );

        let alice = find(&evaluations, "alice");
        assert!((alice.content - 18.0).abs() < 1e-9);
        // a1 extended (+2), a2 dropped (-1)
        assert_eq!(alice.strategy, 1);
        assert_eq!(alice.arguments_won, 1);
        assert_eq!(alice.arguments_lost, 0);
        assert_eq!(alice.side, Side::Pro);
        assert!((alice.style - 20.0).abs() < 1e-9);

        let bob = find(&evaluations, "bob");
        assert_eq!(bob.arguments_lost, 1);
        assert_eq!(bob.strategy, 0);
    }

    #[test]
    fn test_drawn_clashes_tallied_for_both_speakers() {
        let evaluations = score(
            vec![
                Argument::new("a1", "alice", Side::Pro, "attack", 6.0),
                Argument::new("a2", "alice", Side::Pro, "second attack", 9.0),
                Argument::new("b1", "bob", Side::Con, "defense", 6.2),
            ],
            &[
                ClashCandidate::new("c1", "a1", "b1", ClashType::Reframe),
                ClashCandidate::new("c2", "a2", "b1", ClashType::DirectRefutation),
            ],
        );

        let alice = find(&evaluations, "alice");
        assert_eq!((alice.arguments_won, alice.arguments_lost, alice.arguments_drawn), (1, 0, 1));
        let bob = find(&evaluations, "bob");
        assert_eq!((bob.arguments_won, bob.arguments_lost, bob.arguments_drawn), (0, 1, 1));
    }

    #[test]
    fn test_caps_hold() {
        let arguments: Vec<Argument> = (0..12)
            .map(|n| Argument::new(&format!("a{}", n), "alice", Side::Pro, "claim", 10.0).with_style(10.0))
            .chain((0..12).map(|n| Argument::new(&format!("b{}", n), "bob", Side::Con, "claim", 1.0)))
            .collect();
        let candidates: Vec<ClashCandidate> = (0..12)
            .map(|n| {
                ClashCandidate::new(
                    &format!("c{}", n),
                    &format!("b{}", n),
                    &format!("a{}", n),
                    ClashType::DirectRefutation,
                )
            })
            .collect();
        let evaluations = score(arguments, &candidates);

        let alice = &evaluations[0];
        assert_eq!(alice.author, "alice");
        assert_eq!(alice.rank, 1);
        assert!((alice.content - MAX_CONTENT).abs() < 1e-9);
        assert!((alice.style - MAX_STYLE).abs() < 1e-9);
        assert_eq!(alice.strategy, MAX_STRATEGY);
        assert!((alice.speaker_points - 110.0).abs() < 1e-9);
        assert_eq!(evaluations[1].rank, 2);
    }

    #[test]
    fn test_only_fallacious_concessions_cost_honesty() {
        let evaluations = score(
            vec![
                Argument::new("a1", "alice", Side::Pro, "fair", 5.0).conceding(),
                Argument::new("a2", "alice", Side::Pro, "fine, whatever", 5.0).conceding_in_bad_faith(),
                Argument::new("b1", "bob", Side::Con, "fair", 5.0).conceding(),
            ],
            &[],
        );
        assert_eq!(find(&evaluations, "alice").intellectual_honesty, 8);
        assert_eq!(find(&evaluations, "bob").intellectual_honesty, 10);
    }

    #[test]
    fn test_ties_rank_by_author_and_side_ties_are_neutral() {
        let evaluations = score(
            vec![
                Argument::new("z1", "zed", Side::Pro, "p", 5.0),
                Argument::new("z2", "zed", Side::Con, "c", 5.0),
                Argument::new("m1", "mia", Side::Pro, "p", 5.0),
                Argument::new("m2", "mia", Side::Con, "c", 5.0),
            ],
            &[],
        );
        assert_eq!(evaluations[0].author, "mia");
        assert_eq!(evaluations[1].author, "zed");
        assert_eq!(evaluations[0].side, Side::Neutral);
    }

    #[test]
    fn test_fallacy_families_tallied() {
        let evaluations = score(
            vec![Argument::new("a1", "alice", Side::Pro, "claim", 5.0)
                .with_fallacy(FallacyKind::Strawman)
                .with_fallacy(FallacyKind::RedHerring)
                .with_fallacy(FallacyKind::GishGallop)],
            &[],
        );
        let alice = &evaluations[0];
        assert_eq!(alice.fallacy_count, 3);
        assert_eq!(alice.fallacy_families[&FallacyFamily::Relevance], 2);
        assert_eq!(alice.fallacy_families[&FallacyFamily::BadFaith], 1);
    }
}
