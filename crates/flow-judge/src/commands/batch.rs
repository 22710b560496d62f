//! Batch command - adjudicate several debates concurrently
//!
//! Usage:
//! ```bash
//! flow-judge batch round1.json round2.json --config judge.toml
//! ```
//!
//! Prints one entry per input file, in input order. A bundle that cannot be
//! read or scored yields an `error` entry without affecting the rest.

use std::path::PathBuf;

use adjudication::{Adjudication, AdjudicationEngine, BatchEntry};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use super::print_json;
use crate::input::{load_bundle, load_config};

/// Arguments for the batch command
#[derive(Args)]
pub struct BatchArgs {
    /// Debate bundles (JSON)
    #[arg(value_name = "FILE", required = true)]
    bundles: Vec<PathBuf>,

    /// Scoring configuration (TOML)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

/// One line of batch output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchLine {
    debate_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    adjudication: Option<Adjudication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BatchLine {
    fn failed(debate_id: String, error: String) -> Self {
        Self {
            debate_id,
            adjudication: None,
            error: Some(error),
        }
    }
}

impl From<BatchEntry> for BatchLine {
    fn from(entry: BatchEntry) -> Self {
        match entry.result {
            Ok(adjudication) => Self {
                debate_id: entry.debate_id,
                adjudication: Some(adjudication),
                error: None,
            },
            Err(e) => Self::failed(entry.debate_id, e.to_string()),
        }
    }
}

/// Run the batch command
pub async fn run(args: BatchArgs) -> Result<()> {
    let engine = AdjudicationEngine::new(load_config(args.config.as_deref())?)?;

    let mut lines: Vec<Option<BatchLine>> = (0..args.bundles.len()).map(|_| None).collect();
    let mut positions = Vec::with_capacity(args.bundles.len());
    let mut bundles = Vec::with_capacity(args.bundles.len());

    for (pos, path) in args.bundles.iter().enumerate() {
        match load_bundle(path) {
            Ok(bundle) => {
                positions.push(pos);
                bundles.push(bundle);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable bundle");
                lines[pos] = Some(BatchLine::failed(path.display().to_string(), format!("{:#}", e)));
            }
        }
    }

    info!(
        bundles = bundles.len(),
        max_parallel = engine.config().max_parallel_debates,
        "Starting batch"
    );
    let entries = engine.score_batch(bundles).await;
    for (pos, entry) in positions.into_iter().zip(entries) {
        lines[pos] = Some(BatchLine::from(entry));
    }

    let lines: Vec<BatchLine> = lines.into_iter().flatten().collect();
    info!(
        total = lines.len(),
        failed = lines.iter().filter(|l| l.error.is_some()).count(),
        "Batch scored"
    );
    print_json(&lines, args.compact)
}
