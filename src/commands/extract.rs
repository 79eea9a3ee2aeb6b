use std::{fs, path::Path};

use anyhow::{Context, Result};
use glob::Pattern;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{info, warn};

use crate::{commands::matching_filenames, resource_manager::GameArchive};

fn extract_one(archive: &GameArchive, filename: &str, output_folder: &Path) -> Result<()> {
    let contents = archive.read(filename)?;
    let out_path = output_folder.join(filename);
    fs::write(&out_path, &contents).with_context(|| format!("Failed to write file {out_path:?}"))
}

/// Extract resources matching a glob pattern to a folder. Returns how many were written.
pub fn extract_resources(
    archive: &GameArchive,
    patterns: &[Pattern],
    output_folder: &Path,
) -> Result<usize> {
    fs::create_dir_all(output_folder)
        .with_context(|| format!("Failed to create folder {output_folder:?}"))?;

    let filenames = matching_filenames(archive, patterns);

    let extracted = filenames
        .par_iter()
        .map(|filename| (filename, extract_one(archive, filename, output_folder)))
        // Report results
        .filter(|(filename, result)| match result {
            Ok(()) => {
                info!("Extracted resource: {filename}");
                true
            }
            Err(e) => {
                warn!("Failed to extract resource {filename}: {e:?}");
                false
            }
        })
        .count();

    Ok(extracted)
}
