//! Sides of the round and the outcomes they can take.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Side an argument is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Affirmative.
    Pro,
    /// Negative.
    Con,
    /// Not attributable to either team (questions, asides, moderation).
    Neutral,
}

impl Side {
    /// The opposing side. Neutral has none.
    pub fn opposite(self) -> Option<Side> {
        match self {
            Self::Pro => Some(Self::Con),
            Self::Con => Some(Self::Pro),
            Self::Neutral => None,
        }
    }

    /// The team this side plays for, if any.
    pub fn team(self) -> Option<Team> {
        match self {
            Self::Pro => Some(Team::Pro),
            Self::Con => Some(Team::Con),
            Self::Neutral => None,
        }
    }

    /// Whether `other` is on the opposing team.
    pub fn opposes(self, other: Side) -> bool {
        self.opposite() == Some(other)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pro => write!(f, "pro"),
            Self::Con => write!(f, "con"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// One of the two competing teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Pro,
    Con,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Self::Pro => Self::Con,
            Self::Con => Self::Pro,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Self::Pro => Side::Pro,
            Self::Con => Side::Con,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.side(), f)
    }
}

impl std::str::FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pro" => Ok(Self::Pro),
            "con" => Ok(Self::Con),
            other => Err(format!("expected 'pro' or 'con', got '{}'", other)),
        }
    }
}

/// Result of a contest between the teams: an issue or the whole round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pro,
    Con,
    Draw,
}

impl Outcome {
    /// The winning team, or `None` on a draw.
    pub fn team(self) -> Option<Team> {
        match self {
            Self::Pro => Some(Team::Pro),
            Self::Con => Some(Team::Con),
            Self::Draw => None,
        }
    }

    pub fn is_draw(self) -> bool {
        matches!(self, Self::Draw)
    }
}

impl From<Team> for Outcome {
    fn from(team: Team) -> Self {
        match team {
            Team::Pro => Self::Pro,
            Team::Con => Self::Con,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pro => write!(f, "pro"),
            Self::Con => write!(f, "con"),
            Self::Draw => write!(f, "draw"),
        }
    }
}
