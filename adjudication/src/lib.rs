//! Flow-judging adjudication engine.
//!
//! Takes a debate whose arguments have already been extracted and annotated
//! (side, quality, fallacies, concession flags) and reasons transparently to
//! a decision:
//!
//! - **Clashes**: each attack/defense pair is decided on effective quality
//! - **Flow**: every argument ends the round extended, dropped, refuted,
//!   turned, conceded or contested
//! - **Issues**: per-topic winner and weight from the argument fates
//! - **Burden**: whether each team carried its burden, and presumption
//! - **Speakers**: points on content, style, strategy and intellectual honesty
//! - **Verdict**: winner, margin, confidence and the voting issues
//!
//! # Usage
//!
//! ```no_run
//! use adjudication::{AdjudicationConfig, AdjudicationEngine, DebateBundle};
//!
//! # fn run(bundle: DebateBundle) -> Result<(), Box<dyn std::error::Error>> {
//! let engine = AdjudicationEngine::new(AdjudicationConfig::default())?;
//! let adjudication = engine.score(&bundle)?;
//! println!("{} by {}", adjudication.verdict.winner, adjudication.verdict.margin);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod argument;
pub mod burden;
pub mod clash;
pub mod config;
pub mod engine;
pub mod error;
pub mod flow;
pub mod issue;
pub mod side;
pub mod speaker;
pub mod verdict;

pub use argument::{
    Argument, ArgumentId, ArgumentStore, Fallacy, FallacyFamily, FallacyKind, FallacySeverity,
};
pub use burden::{BurdenAnalysis, BurdenAnalyzer, BurdenMet, Presumption};
pub use clash::{Clash, ClashCandidate, ClashEvaluator, ClashType, ClashWinner};
pub use config::{AdjudicationConfig, ConfigError};
pub use engine::{Adjudication, AdjudicationEngine, BatchEntry, DebateBundle, ScoredArgument};
pub use error::{AdjudicationError, AdjudicationResult};
pub use flow::{ArgumentStatus, FlowSheet, FlowTracker};
pub use issue::{Issue, IssueAggregator, IssueGrouping};
pub use side::{Outcome, Side, Team};
pub use speaker::{SpeakerEvaluation, SpeakerScorer};
pub use verdict::{OutcomeType, Verdict, VerdictSynthesizer, VotingIssue};
