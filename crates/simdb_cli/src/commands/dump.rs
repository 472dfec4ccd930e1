//! Dump command implementation.

use std::path::Path;

/// Runs the dump command.
pub fn run(path: &Path, entry: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let envelope = super::load_document(path, entry)?;
    println!("{}", serde_json::to_string_pretty(&envelope.records)?);
    Ok(())
}
