pub mod batch;
pub mod schema;
pub mod score;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `value` to stdout as JSON.
pub fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
