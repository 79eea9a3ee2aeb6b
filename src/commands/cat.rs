use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use crate::resource_manager::GameArchive;

/// Write the contents of the resource to stdout
pub fn cat_resource(archive: &GameArchive, filename: &str) -> Result<()> {
    let contents = archive
        .read(filename)
        .with_context(|| format!("Failed to read resource {filename}"))?;

    let mut stdout = BufWriter::new(io::stdout().lock());
    stdout
        .write_all(&contents)
        .context("Failed to write to stdout")?;

    stdout.flush().context("Failed to flush stdout")
}
