//! Schema command - print the JSON schema of a debate bundle

use adjudication::DebateBundle;
use anyhow::Result;
use clap::Args;

use super::print_json;

/// Arguments for the schema command
#[derive(Args)]
pub struct SchemaArgs {
    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

pub fn run(args: SchemaArgs) -> Result<()> {
    print_json(&bundle_schema(), args.compact)
}

fn bundle_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(DebateBundle)
}
