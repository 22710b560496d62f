//! Score command - adjudicate one debate
//!
//! Usage:
//! ```bash
//! flow-judge score round.json
//! flow-judge score round.json --config judge.toml --compact
//! ```

use std::path::PathBuf;

use adjudication::AdjudicationEngine;
use anyhow::Result;
use clap::Args;
use tracing::{debug, info};

use super::print_json;
use crate::input::{load_bundle, load_config};

/// Arguments for the score command
#[derive(Args)]
pub struct ScoreArgs {
    /// Debate bundle (JSON)
    #[arg(value_name = "FILE")]
    bundle: PathBuf,

    /// Scoring configuration (TOML)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

/// Run the score command
pub fn run(args: ScoreArgs) -> Result<()> {
    let engine = AdjudicationEngine::new(load_config(args.config.as_deref())?)?;
    let bundle = load_bundle(&args.bundle)?;
    debug!(
        presumption = %engine.config().presumption_default,
        draw_threshold = engine.config().clash_draw_threshold,
        "Scoring with config"
    );

    let adjudication = engine.score(&bundle)?;
    info!(
        debate_id = %adjudication.debate_id,
        winner = %adjudication.verdict.winner,
        confidence = adjudication.verdict.winner_confidence,
        "Scored"
    );

    print_json(&adjudication, args.compact)
}
