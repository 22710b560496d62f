//! Argument flow tracker: what happened to every argument across the round.
//!
//! Status derivation is a pure recomputation over (arguments, clashes). Rules
//! are applied in precedence order and exactly one fires per argument:
//!
//! ```text
//! concession ──────────────────────────────► conceded
//! lost any decided clash ──────────────────► refuted
//! won a clash, appropriated by other side ─► turned
//! won at least one clash ──────────────────► extended
//! in no clash at all ──────────────────────► dropped
//! every exchange drawn ────────────────────► contested
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::argument::{Argument, ArgumentId, ArgumentStore};
use crate::clash::{Clash, ClashWinner};
use crate::error::{AdjudicationError, AdjudicationResult};

/// Terminal fate of an argument after a scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStatus {
    /// Engaged, but no exchange produced a winner.
    Contested,
    /// Survived contact and carried through.
    Extended,
    /// Never answered by the other side.
    Dropped,
    /// Beaten in a head-to-head exchange.
    Refuted,
    /// Appropriated by the other side.
    Turned,
    /// Granted to the other side by its own author.
    Conceded,
}

impl ArgumentStatus {
    pub const ALL: [ArgumentStatus; 6] = [
        Self::Contested,
        Self::Extended,
        Self::Dropped,
        Self::Refuted,
        Self::Turned,
        Self::Conceded,
    ];
}

impl std::fmt::Display for ArgumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contested => write!(f, "contested"),
            Self::Extended => write!(f, "extended"),
            Self::Dropped => write!(f, "dropped"),
            Self::Refuted => write!(f, "refuted"),
            Self::Turned => write!(f, "turned"),
            Self::Conceded => write!(f, "conceded"),
        }
    }
}

/// Per-argument tally of clash participation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Involvement {
    won: u32,
    lost: u32,
    engaged: u32,
}

/// Statuses for every argument of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowSheet {
    statuses: BTreeMap<ArgumentId, ArgumentStatus>,
}

impl FlowSheet {
    /// Status of an argument. Absence means the derivation skipped it.
    pub fn status(&self, argument_id: &str) -> AdjudicationResult<ArgumentStatus> {
        self.statuses
            .get(argument_id)
            .copied()
            .ok_or_else(|| AdjudicationError::InconsistentStatus(argument_id.to_string()))
    }

    pub fn count(&self, status: ArgumentStatus) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

/// Assigns terminal statuses from clash outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowTracker;

impl FlowTracker {
    pub fn new() -> Self {
        Self
    }

    /// Derive the status of every argument in the store.
    pub fn track(&self, store: &ArgumentStore, clashes: &[Clash]) -> FlowSheet {
        let involvement = tally(clashes);
        let statuses: BTreeMap<ArgumentId, ArgumentStatus> = store
            .iter()
            .map(|argument| {
                let status = derive_status(
                    argument,
                    involvement.get(argument.id.as_str()).copied().unwrap_or_default(),
                    store,
                );
                (argument.id.clone(), status)
            })
            .collect();

        let sheet = FlowSheet { statuses };
        debug!(
            arguments = sheet.len(),
            extended = sheet.count(ArgumentStatus::Extended),
            refuted = sheet.count(ArgumentStatus::Refuted),
            dropped = sheet.count(ArgumentStatus::Dropped),
            turned = sheet.count(ArgumentStatus::Turned),
            conceded = sheet.count(ArgumentStatus::Conceded),
            contested = sheet.count(ArgumentStatus::Contested),
            "Flow tracked"
        );
        sheet
    }
}

fn tally(clashes: &[Clash]) -> HashMap<&str, Involvement> {
    let mut involvement: HashMap<&str, Involvement> = HashMap::new();
    for clash in clashes {
        involvement.entry(clash.defender_id.as_str()).or_default().engaged += 1;
        involvement.entry(clash.attacker_id.as_str()).or_default().engaged += 1;
        match clash.winner {
            ClashWinner::Attacker => {
                involvement.entry(clash.attacker_id.as_str()).or_default().won += 1;
                involvement.entry(clash.defender_id.as_str()).or_default().lost += 1;
            }
            ClashWinner::Defender => {
                involvement.entry(clash.defender_id.as_str()).or_default().won += 1;
                involvement.entry(clash.attacker_id.as_str()).or_default().lost += 1;
            }
            ClashWinner::Draw => {}
        }
    }
    involvement
}

fn derive_status(argument: &Argument, involvement: Involvement, store: &ArgumentStore) -> ArgumentStatus {
    let appropriated = argument
        .turned_by
        .as_deref()
        .and_then(|by| store.get(by))
        .is_some_and(|by| argument.side.opposes(by.side));

    if argument.is_concession {
        ArgumentStatus::Conceded
    } else if involvement.lost > 0 {
        ArgumentStatus::Refuted
    } else if involvement.won > 0 && appropriated {
        ArgumentStatus::Turned
    } else if involvement.won > 0 {
        ArgumentStatus::Extended
    } else if involvement.engaged == 0 {
        ArgumentStatus::Dropped
    } else {
        ArgumentStatus::Contested
    }
}
