//! Inspect command implementation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use simdb_codec::Envelope;
use std::path::Path;

/// Document inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Document path.
    pub path: String,
    /// Archive entry, if the document lives in an archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Type name recorded in the document.
    pub type_name: Option<String>,
    /// Time of the last save.
    pub last_update: Option<DateTime<Utc>>,
    /// Number of saves on the document.
    pub total_change: u64,
    /// Number of records.
    pub record_count: usize,
}

impl InspectResult {
    fn new(path: &Path, entry: Option<&str>, envelope: &Envelope<Value>) -> Self {
        Self {
            path: path.display().to_string(),
            entry: entry.map(str::to_string),
            type_name: envelope.type_name.clone(),
            last_update: envelope.last_update,
            total_change: envelope.total_change,
            record_count: envelope.records.len(),
        }
    }
}

/// Runs the inspect command.
pub fn run(
    path: &Path,
    entry: Option<&str>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let envelope = super::load_document(path, entry)?;
    let result = InspectResult::new(path, entry, &envelope);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("SimDB Document Inspection");
    println!("=========================");
    println!();
    println!("Path:  {}", result.path);
    if let Some(entry) = &result.entry {
        println!("Entry: {entry}");
    }
    println!();
    println!(
        "Type:         {}",
        result.type_name.as_deref().unwrap_or("(unnamed)")
    );
    match result.last_update {
        Some(time) => println!("Last update:  {}", time.to_rfc3339()),
        None => println!("Last update:  never"),
    }
    println!("Total change: {}", result.total_change);
    println!("Records:      {}", result.record_count);
}
