//! Issue aggregator: who carried each topic and how much it matters.
//!
//! Argument → issue assignment is supplied upstream. Strength per side:
//!
//! | status              | credited to      | factor |
//! |---------------------|------------------|--------|
//! | extended            | own side         | 1.0    |
//! | conceded            | opposing side    | 1.0    |
//! | refuted, turned     | opposing side    | 0.5    |
//! | dropped, contested  | nobody           | 0.0    |

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::argument::{ArgumentId, ArgumentStore};
use crate::clash::Clash;
use crate::config::{AdjudicationConfig, MAX_ISSUE_WEIGHT};
use crate::error::{AdjudicationError, AdjudicationResult};
use crate::flow::{ArgumentStatus, FlowSheet};
use crate::side::{Outcome, Team};

/// Upstream grouping of arguments into a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueGrouping {
    pub id: String,
    pub topic: String,
    #[serde(default)]
    pub description: String,
    pub argument_ids: Vec<ArgumentId>,
}

impl IssueGrouping {
    pub fn new(id: &str, topic: &str, argument_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            topic: topic.to_string(),
            description: String::new(),
            argument_ids: argument_ids.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// An adjudicated issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub topic: String,
    pub description: String,
    pub pro_arguments: Vec<ArgumentId>,
    pub con_arguments: Vec<ArgumentId>,
    pub neutral_arguments: Vec<ArgumentId>,
    /// Ids of clashes touching any member argument.
    pub clashes: Vec<String>,
    pub issue_winner: Outcome,
    /// Adjudicative weight (0–10).
    pub issue_weight: u32,
    pub pro_strength: f64,
    pub con_strength: f64,
    /// Only one team argued this issue.
    pub one_sided: bool,
    pub reasoning: String,
}

impl Issue {
    /// Both teams put arguments on this issue.
    pub fn is_contested(&self) -> bool {
        !self.pro_arguments.is_empty() && !self.con_arguments.is_empty()
    }

    /// First line of the reasoning.
    pub fn headline(&self) -> &str {
        self.reasoning.lines().next().unwrap_or_default()
    }
}

/// Credit an argument's status earns, and for whom.
fn credit(status: ArgumentStatus, team: Team) -> Option<(Team, f64)> {
    match status {
        ArgumentStatus::Extended => Some((team, 1.0)),
        ArgumentStatus::Conceded => Some((team.opponent(), 1.0)),
        ArgumentStatus::Refuted | ArgumentStatus::Turned => Some((team.opponent(), 0.5)),
        ArgumentStatus::Dropped | ArgumentStatus::Contested => None,
    }
}

/// Computes per-issue winners and weights.
pub struct IssueAggregator<'a> {
    config: &'a AdjudicationConfig,
}

impl<'a> IssueAggregator<'a> {
    pub fn new(config: &'a AdjudicationConfig) -> Self {
        Self { config }
    }

    /// Check that every argument sits in exactly one grouping and every
    /// grouped id exists.
    pub fn check_assignments(
        &self,
        groupings: &[IssueGrouping],
        store: &ArgumentStore,
    ) -> AdjudicationResult<()> {
        let mut assigned: HashMap<&str, &str> = HashMap::with_capacity(store.len());
        for grouping in groupings {
            for argument_id in &grouping.argument_ids {
                store.require(argument_id, &format!("issue {}", grouping.id))?;
                if let Some(first) = assigned.insert(argument_id.as_str(), grouping.id.as_str()) {
                    return Err(AdjudicationError::DuplicateAssignment {
                        argument_id: argument_id.clone(),
                        first_issue: first.to_string(),
                        second_issue: grouping.id.clone(),
                    });
                }
            }
        }
        match store.iter().find(|a| !assigned.contains_key(a.id.as_str())) {
            Some(orphan) => Err(AdjudicationError::UnassignedArgument(orphan.id.clone())),
            None => Ok(()),
        }
    }

    /// Adjudicate every grouping.
    pub fn aggregate(
        &self,
        groupings: &[IssueGrouping],
        store: &ArgumentStore,
        sheet: &FlowSheet,
        clashes: &[Clash],
    ) -> AdjudicationResult<Vec<Issue>> {
        self.check_assignments(groupings, store)?;
        groupings
            .iter()
            .map(|grouping| self.adjudicate(grouping, store, sheet, clashes))
            .collect()
    }

    fn adjudicate(
        &self,
        grouping: &IssueGrouping,
        store: &ArgumentStore,
        sheet: &FlowSheet,
        clashes: &[Clash],
    ) -> AdjudicationResult<Issue> {
        let mut pro_arguments = Vec::new();
        let mut con_arguments = Vec::new();
        let mut neutral_arguments = Vec::new();
        let mut pro_strength = 0.0;
        let mut con_strength = 0.0;
        let mut decisive: Vec<(ArgumentStatus, &str)> = Vec::new();

        for argument_id in &grouping.argument_ids {
            let argument = store.require(argument_id, &format!("issue {}", grouping.id))?;
            let status = sheet.status(argument_id)?;
            let Some(team) = argument.side.team() else {
                neutral_arguments.push(argument_id.clone());
                continue;
            };
            match team {
                Team::Pro => pro_arguments.push(argument_id.clone()),
                Team::Con => con_arguments.push(argument_id.clone()),
            }
            if let Some((beneficiary, factor)) = credit(status, team) {
                let points = argument.quality_score * factor;
                match beneficiary {
                    Team::Pro => pro_strength += points,
                    Team::Con => con_strength += points,
                }
                decisive.push((status, argument_id.as_str()));
            }
        }

        let issue_clashes: Vec<String> = clashes
            .iter()
            .filter(|c| grouping.argument_ids.iter().any(|id| c.involves(id)))
            .map(|c| c.id.clone())
            .collect();

        let leading = pro_strength.max(con_strength);
        let engagement = issue_clashes.len() as u32 + (leading / 5.0).round() as u32;
        let full_weight = engagement.min(MAX_ISSUE_WEIGHT);
        let clash_word = if issue_clashes.len() == 1 { "clash" } else { "clashes" };

        let (issue_winner, issue_weight, one_sided, headline) =
            match (pro_arguments.is_empty(), con_arguments.is_empty()) {
                (true, true) => (
                    Outcome::Draw,
                    0,
                    false,
                    format!("No pro or con arguments on '{}'", grouping.topic),
                ),
                (false, true) | (true, false) => {
                    let (team, count) = if con_arguments.is_empty() {
                        (Team::Pro, pro_arguments.len())
                    } else {
                        (Team::Con, con_arguments.len())
                    };
                    let weight = full_weight.min(self.config.one_sided_weight_cap);
                    (
                        Outcome::from(team),
                        weight,
                        true,
                        format!(
                            "Only {} argued '{}' ({} argument{}); uncontested, weight {}",
                            team,
                            grouping.topic,
                            count,
                            if count == 1 { "" } else { "s" },
                            weight
                        ),
                    )
                }
                (false, false) => {
                    let lead = pro_strength - con_strength;
                    let winner = if lead > self.config.issue_win_margin {
                        Outcome::Pro
                    } else if -lead > self.config.issue_win_margin {
                        Outcome::Con
                    } else {
                        Outcome::Draw
                    };
                    let headline = match winner.team() {
                        Some(team) => {
                            let (ahead, behind) = match team {
                                Team::Pro => (pro_strength, con_strength),
                                Team::Con => (con_strength, pro_strength),
                            };
                            format!(
                                "{} carries '{}' {:.1} to {:.1} across {} {}",
                                capitalize(&team.to_string()),
                                grouping.topic,
                                ahead,
                                behind,
                                issue_clashes.len(),
                                clash_word
                            )
                        }
                        None => format!(
                            "'{}' is even: pro {:.1}, con {:.1} across {} {}",
                            grouping.topic,
                            pro_strength,
                            con_strength,
                            issue_clashes.len(),
                            clash_word
                        ),
                    };
                    (winner, full_weight, false, headline)
                }
            };

        let mut reasoning = headline;
        if !decisive.is_empty() {
            let detail: Vec<String> = decisive
                .iter()
                .map(|(status, id)| format!("{} {}", id, status))
                .collect();
            reasoning.push('\n');
            reasoning.push_str(&detail.join(", "));
        }

        debug!(
            issue_id = %grouping.id,
            winner = %issue_winner,
            weight = issue_weight,
            pro_strength,
            con_strength,
            one_sided,
            "Issue adjudicated"
        );

        Ok(Issue {
            id: grouping.id.clone(),
            topic: grouping.topic.clone(),
            description: grouping.description.clone(),
            pro_arguments,
            con_arguments,
            neutral_arguments,
            clashes: issue_clashes,
            issue_winner,
            issue_weight,
            pro_strength,
            con_strength,
            one_sided,
            reasoning,
        })
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
