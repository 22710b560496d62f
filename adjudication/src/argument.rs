//! Argument store. Holds the normalized, read-only input arguments of a round.
//!
//! Extracted attributes (side, claim, quality, fallacies, concession flag and
//! the upstream signals) never change during a pass. The derived status lives
//! in [`crate::flow::FlowSheet`], not on the argument.

use std::collections::{BTreeSet, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AdjudicationError, AdjudicationResult};
use crate::side::Side;

/// Identifier of an argument, as assigned by the extraction layer.
pub type ArgumentId = String;

/// Inclusive upper bound of every per-argument score.
pub const MAX_ARGUMENT_SCORE: f64 = 10.0;

/// Style signal assumed for arguments that carry none.
pub const NEUTRAL_STYLE_SCORE: f64 = 5.0;

/// Family a fallacy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallacyFamily {
    /// The premise does not bear on the conclusion.
    Relevance,
    /// The argument assumes what it needs to prove.
    Presumption,
    /// The argument trades on unclear language.
    Ambiguity,
    /// Deliberate rhetorical manipulation.
    BadFaith,
}

impl std::fmt::Display for FallacyFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Relevance => write!(f, "relevance"),
            Self::Presumption => write!(f, "presumption"),
            Self::Ambiguity => write!(f, "ambiguity"),
            Self::BadFaith => write!(f, "bad_faith"),
        }
    }
}

/// Fallacy labels produced by the extraction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FallacyKind {
    AdHominem,
    Strawman,
    FalseDichotomy,
    AppealToAuthority,
    AppealToEmotion,
    AppealToPopularity,
    RedHerring,
    Whataboutism,
    HastyGeneralization,
    SlipperySlope,
    CircularReasoning,
    MovingGoalposts,
    NoTrueScotsman,
    FalseCause,
    AppealToNature,
    GeneticFallacy,
    Sealioning,
    GishGallop,
    BurdenShifting,
    CherryPicking,
    Equivocation,
    BeggingTheQuestion,
    /// Any label outside the known taxonomy.
    #[serde(other)]
    Other,
}

impl FallacyKind {
    pub fn family(self) -> FallacyFamily {
        match self {
            Self::AdHominem
            | Self::Strawman
            | Self::AppealToAuthority
            | Self::AppealToEmotion
            | Self::AppealToPopularity
            | Self::RedHerring
            | Self::Whataboutism
            | Self::AppealToNature
            | Self::GeneticFallacy
            | Self::Other => FallacyFamily::Relevance,
            Self::FalseDichotomy
            | Self::HastyGeneralization
            | Self::SlipperySlope
            | Self::CircularReasoning
            | Self::NoTrueScotsman
            | Self::FalseCause
            | Self::BurdenShifting
            | Self::CherryPicking
            | Self::BeggingTheQuestion => FallacyFamily::Presumption,
            Self::Equivocation => FallacyFamily::Ambiguity,
            Self::MovingGoalposts | Self::Sealioning | Self::GishGallop => FallacyFamily::BadFaith,
        }
    }
}

/// How badly a fallacy undermines the argument it appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FallacySeverity {
    Minor,
    Moderate,
    Significant,
    Severe,
}

/// A fallacy flagged upstream in an argument's claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fallacy {
    pub kind: FallacyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<FallacySeverity>,
    /// Detector confidence (0.0–1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Fallacy {
    pub fn new(kind: FallacyKind) -> Self {
        Self {
            kind,
            severity: None,
            confidence: None,
        }
    }
}

/// One contribution to the debate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub id: ArgumentId,
    pub author_id: String,
    pub side: Side,
    pub claim_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warrant: Option<String>,
    /// Upstream quality assessment (0–10).
    pub quality_score: f64,
    #[serde(default)]
    pub fallacies: Vec<Fallacy>,
    #[serde(default)]
    pub is_concession: bool,
    /// The concession dodged the substance rather than granting a point.
    #[serde(default)]
    pub fallacious_concession: bool,
    /// Later opposing argument that appropriated this claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turned_by: Option<ArgumentId>,
    /// Civility/clarity signal (0–10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_score: Option<f64>,
}

impl Argument {
    /// Create a bare argument with no fallacies or upstream signals.
    pub fn new(id: &str, author_id: &str, side: Side, claim_text: &str, quality_score: f64) -> Self {
        Self {
            id: id.to_string(),
            author_id: author_id.to_string(),
            side,
            claim_text: claim_text.to_string(),
            warrant: None,
            quality_score,
            fallacies: Vec::new(),
            is_concession: false,
            fallacious_concession: false,
            turned_by: None,
            style_score: None,
        }
    }

    pub fn with_fallacy(mut self, kind: FallacyKind) -> Self {
        self.fallacies.push(Fallacy::new(kind));
        self
    }

    /// Mark as a good-faith concession.
    pub fn conceding(mut self) -> Self {
        self.is_concession = true;
        self
    }

    /// Mark as a concession made to avoid engaging the substance.
    pub fn conceding_in_bad_faith(mut self) -> Self {
        self.is_concession = true;
        self.fallacious_concession = true;
        self
    }

    pub fn turned_by(mut self, by: &str) -> Self {
        self.turned_by = Some(by.to_string());
        self
    }

    pub fn with_style(mut self, style: f64) -> Self {
        self.style_score = Some(style);
        self
    }

    pub fn with_warrant(mut self, warrant: &str) -> Self {
        self.warrant = Some(warrant.to_string());
        self
    }

    pub fn fallacy_count(&self) -> usize {
        self.fallacies.len()
    }

    /// Style signal, falling back to neutral when none was supplied.
    pub fn effective_style(&self) -> f64 {
        self.style_score.unwrap_or(NEUTRAL_STYLE_SCORE)
    }
}

/// Indexed, validated collection of the round's arguments.
///
/// Iteration follows input order so every downstream output is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ArgumentStore {
    arguments: Vec<Argument>,
    index: HashMap<ArgumentId, usize>,
}

impl ArgumentStore {
    /// Build a store, rejecting duplicate ids, out-of-range scores and
    /// dangling `turned_by` references.
    pub fn new(arguments: Vec<Argument>) -> AdjudicationResult<Self> {
        let mut index = HashMap::with_capacity(arguments.len());
        for (pos, argument) in arguments.iter().enumerate() {
            check_score(&argument.id, "qualityScore", argument.quality_score)?;
            if let Some(style) = argument.style_score {
                check_score(&argument.id, "styleScore", style)?;
            }
            if index.insert(argument.id.clone(), pos).is_some() {
                return Err(AdjudicationError::DuplicateArgument(argument.id.clone()));
            }
        }

        let store = Self { arguments, index };
        for argument in &store.arguments {
            if let Some(by) = &argument.turned_by {
                store.require(by, &format!("argument {} (turnedBy)", argument.id))?;
            }
        }
        Ok(store)
    }

    pub fn get(&self, id: &str) -> Option<&Argument> {
        self.index.get(id).map(|&pos| &self.arguments[pos])
    }

    /// Look up an argument that some other record points at.
    pub fn require(&self, id: &str, referenced_by: &str) -> AdjudicationResult<&Argument> {
        self.get(id).ok_or_else(|| AdjudicationError::UnknownArgument {
            argument_id: id.to_string(),
            referenced_by: referenced_by.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Distinct author ids in sorted order.
    pub fn authors(&self) -> Vec<&str> {
        self.arguments
            .iter()
            .map(|a| a.author_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Arguments written by `author`, in input order.
    pub fn by_author<'a>(&'a self, author: &'a str) -> impl Iterator<Item = &'a Argument> + 'a {
        self.arguments.iter().filter(move |a| a.author_id == author)
    }
}

fn check_score(argument_id: &str, field: &'static str, value: f64) -> AdjudicationResult<()> {
    if (0.0..=MAX_ARGUMENT_SCORE).contains(&value) {
        Ok(())
    } else {
        Err(AdjudicationError::InvalidScore {
            argument_id: argument_id.to_string(),
            field,
            value,
        })
    }
}
