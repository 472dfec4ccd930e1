//! Entries command implementation.

use simdb_storage::ArchiveBackend;
use std::path::Path;

/// Runs the entries command.
pub fn run(archive: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !archive.exists() {
        return Err(format!("No archive found at {:?}", archive).into());
    }

    let entries = ArchiveBackend::entries(archive)?;
    if entries.is_empty() {
        println!("Archive {:?} has no entries", archive);
        return Ok(());
    }

    println!("{:<32} {:>12} {:>12}", "Entry", "Size", "Compressed");
    for entry in &entries {
        println!(
            "{:<32} {:>12} {:>12}",
            entry.name, entry.size, entry.compressed_size
        );
    }
    println!();
    println!("{} entries", entries.len());

    Ok(())
}
