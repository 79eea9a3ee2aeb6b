use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use glob::Pattern;

use crate::{commands::matching_filenames, resource_manager::GameArchive};

/// List resources matching a glob pattern
pub fn list_resources(archive: &GameArchive, patterns: &[Pattern]) -> Result<()> {
    // Use a buffered writer since we're dumping a lot of data
    let mut stdout = BufWriter::new(io::stdout().lock());

    matching_filenames(archive, patterns)
        .iter()
        .try_for_each(|f| writeln!(stdout, "{f}").context("Failed to write to stdout"))?;

    stdout.flush().context("Failed to flush stdout")
}

/// List the bundles named by the master index and whether they could be read
pub fn list_bundles(archive: &GameArchive) -> Result<()> {
    let mut stdout = BufWriter::new(io::stdout().lock());

    for (i, slot) in archive.bundles().iter().enumerate() {
        let status = if slot.file.is_placeholder() {
            String::from("unavailable")
        } else {
            let layout = match slot.file.check_layout() {
                Ok(()) => String::new(),
                Err(e) => format!(" ({e})"),
            };
            format!(
                "{} files, {} tilesets{layout}",
                slot.file.file_entries.len(),
                slot.file.tileset_entries.len()
            )
        };
        writeln!(stdout, "{i}\t{}\t{status}", slot.name).context("Failed to write to stdout")?;
    }

    stdout.flush().context("Failed to flush stdout")
}
