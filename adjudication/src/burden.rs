//! Burden-of-proof analyzer.
//!
//! A team meets its burden by carrying at least half of the contested
//! issues. Presumption only decides anything when neither team does.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AdjudicationConfig;
use crate::issue::Issue;
use crate::side::{Outcome, Team};

/// Share of contested issues a team must carry.
pub const BURDEN_THRESHOLD: f64 = 0.5;

/// Which side the round falls to when the burdens fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presumption {
    Pro,
    Con,
    /// Not invoked: at least one team met its burden.
    None,
}

impl From<Team> for Presumption {
    fn from(team: Team) -> Self {
        match team {
            Team::Pro => Self::Pro,
            Team::Con => Self::Con,
        }
    }
}

impl std::fmt::Display for Presumption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pro => write!(f, "pro"),
            Self::Con => write!(f, "con"),
            Self::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurdenMet {
    pub pro: bool,
    pub con: bool,
}

impl BurdenMet {
    pub fn get(&self, team: Team) -> bool {
        match team {
            Team::Pro => self.pro,
            Team::Con => self.con,
        }
    }
}

/// Round-level burden evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurdenAnalysis {
    pub affirmative_burden: String,
    pub negative_burden: String,
    pub burden_met: BurdenMet,
    pub presumption: Presumption,
    pub burden_reasoning: String,
    /// Issues both teams argued.
    pub contested_issues: u32,
}

/// Evaluates both burdens over the adjudicated issues.
pub struct BurdenAnalyzer<'a> {
    config: &'a AdjudicationConfig,
}

impl<'a> BurdenAnalyzer<'a> {
    pub fn new(config: &'a AdjudicationConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, motion: Option<&str>, issues: &[Issue]) -> BurdenAnalysis {
        let contested: Vec<&Issue> = issues.iter().filter(|i| i.is_contested()).collect();
        let total = contested.len() as u32;
        let won_by = |outcome: Outcome| {
            contested
                .iter()
                .filter(|i| i.issue_winner == outcome)
                .count() as u32
        };
        let pro_won = won_by(Outcome::Pro);
        let con_won = won_by(Outcome::Con);

        let meets = |won: u32| total > 0 && f64::from(won) / f64::from(total) >= BURDEN_THRESHOLD;
        let burden_met = BurdenMet {
            pro: meets(pro_won),
            con: meets(con_won),
        };

        let presumption = if !burden_met.pro && !burden_met.con {
            Presumption::from(self.config.presumption_default)
        } else {
            Presumption::None
        };

        let (affirmative_burden, negative_burden) = match motion.map(str::trim).filter(|m| !m.is_empty()) {
            Some(motion) => (
                format!("Pro must prove that {}", motion),
                format!("Con must show that the case for \"{}\" does not hold", motion),
            ),
            None => (
                "Pro must prove the motion".to_string(),
                "Con must show that the affirmative case does not hold".to_string(),
            ),
        };

        let mut burden_reasoning = if total == 0 {
            "No issue was argued by both teams; neither burden can be met.".to_string()
        } else {
            format!(
                "Pro carried {} of {} contested issues and {} its burden; con carried {} and {} its burden.",
                pro_won,
                total,
                if burden_met.pro { "met" } else { "did not meet" },
                con_won,
                if burden_met.con { "met" } else { "did not meet" },
            )
        };
        burden_reasoning.push(' ');
        burden_reasoning.push_str(&match presumption {
            Presumption::None => "Presumption is not invoked.".to_string(),
            side => format!("Presumption falls to {}.", side),
        });

        debug!(
            contested = total,
            pro_won,
            con_won,
            pro_met = burden_met.pro,
            con_met = burden_met.con,
            %presumption,
            "Burden analyzed"
        );

        BurdenAnalysis {
            affirmative_burden,
            negative_burden,
            burden_met,
            presumption,
            burden_reasoning,
            contested_issues: total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: &str, winner: Outcome, pro: usize, con: usize) -> Issue {
        Issue {
            id: id.to_string(),
            topic: id.to_string(),
            description: String::new(),
            pro_arguments: (0..pro).map(|n| format!("{}-p{}", id, n)).collect(),
            con_arguments: (0..con).map(|n| format!("{}-c{}", id, n)).collect(),
            neutral_arguments: Vec::new(),
            clashes: Vec::new(),
            issue_winner: winner,
            issue_weight: 3,
            pro_strength: 0.0,
            con_strength: 0.0,
            one_sided: pro == 0 || con == 0,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_majority_meets_burden() {
        let config = AdjudicationConfig::default();
        let analysis = BurdenAnalyzer::new(&config).analyze(
            Some("the city should build light rail"),
            &[
                issue("i1", Outcome::Pro, 1, 1),
                issue("i2", Outcome::Pro, 2, 1),
                issue("i3", Outcome::Con, 1, 2),
            ],
        );
        assert!(analysis.burden_met.pro);
        assert!(!analysis.burden_met.con);
        assert_eq!(analysis.presumption, Presumption::None);
        assert_eq!(analysis.contested_issues, 3);
        assert!(analysis.affirmative_burden.contains("light rail"));
    }

    #[test]
    fn test_even_split_meets_both() {
        let config = AdjudicationConfig::default();
        let analysis = BurdenAnalyzer::new(&config).analyze(
            None,
            &[issue("i1", Outcome::Pro, 1, 1), issue("i2", Outcome::Con, 1, 1)],
        );
        assert!(analysis.burden_met.pro && analysis.burden_met.con);
        assert_eq!(analysis.presumption, Presumption::None);
    }

    #[test]
    fn test_neither_meets_falls_to_presumption() {
        let config = AdjudicationConfig::default();
        let analysis = BurdenAnalyzer::new(&config).analyze(
            None,
            &[
                issue("i1", Outcome::Draw, 1, 1),
                issue("i2", Outcome::Draw, 1, 1),
                issue("i3", Outcome::Pro, 1, 1),
            ],
        );
        assert!(!analysis.burden_met.pro);
        assert!(!analysis.burden_met.con);
        assert_eq!(analysis.presumption, Presumption::Con);
        assert!(analysis.burden_reasoning.ends_with("Presumption falls to con."));

        let config = AdjudicationConfig {
            presumption_default: Team::Pro,
            ..AdjudicationConfig::default()
        };
        let analysis = BurdenAnalyzer::new(&config).analyze(None, &[issue("i1", Outcome::Draw, 1, 1)]);
        assert_eq!(analysis.presumption, Presumption::Pro);
    }

    #[test]
    fn test_one_sided_issues_are_not_contested() {
        let config = AdjudicationConfig::default();
        let analysis = BurdenAnalyzer::new(&config).analyze(
            None,
            &[issue("i1", Outcome::Pro, 3, 0), issue("i2", Outcome::Pro, 2, 0)],
        );
        assert_eq!(analysis.contested_issues, 0);
        assert_eq!(analysis.burden_met, BurdenMet::default());
        assert_eq!(analysis.presumption, Presumption::Con);
    }
}
