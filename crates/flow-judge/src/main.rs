//! flow-judge: adjudicate annotated debates from the command line
//!
//! # Usage
//!
//! ```bash
//! # Score one debate and print the adjudication
//! flow-judge score round.json --config judge.toml
//!
//! # Score many debates concurrently
//! flow-judge batch round1.json round2.json round3.json
//!
//! # Print the JSON schema of a debate bundle
//! flow-judge schema
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod input;

use commands::{batch, schema, score};

/// Flow judge for extracted debate arguments.
#[derive(Parser)]
#[command(
    name = "flow-judge",
    version,
    about = "Flow-judge annotated debates",
    long_about = "Scores a debate whose arguments are already extracted and annotated.\n\n\
                  Tracks the fate of every argument, decides each clash and issue,\n\
                  checks both burdens and synthesizes a verdict with voting issues."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Adjudicate a single debate bundle
    #[command(name = "score")]
    Score(score::ScoreArgs),

    /// Adjudicate several debate bundles concurrently
    #[command(name = "batch")]
    Batch(batch::BatchArgs),

    /// Print the JSON schema of the input bundle
    #[command(name = "schema")]
    Schema(schema::SchemaArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let result: Result<()> = match cli.command {
        Commands::Score(args) => score::run(args),
        Commands::Batch(args) => batch::run(args).await,
        Commands::Schema(args) => schema::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Unable to adjudicate: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Setup logging based on verbosity level. Output goes to stderr so stdout
/// stays valid JSON.
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();
}
