use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use glob::Pattern;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    commands::matching_filenames,
    file_parsers::{FileParser, itm::ItmParser, tda::TdaParser},
    path::split_resource_name,
    resource_manager::GameArchive,
    resource_type::ResourceType,
};

pub trait FileParserExt: FileParser {
    fn parse_to_json_file(&self, bytes: &[u8], output_path: &Path) -> Result<()>
    where
        Self::Output: Serialize,
    {
        let parsed = self.parse(bytes)?;

        let f = File::create(output_path)
            .with_context(|| format!("Failed to create file {output_path:?}"))?;
        let f = BufWriter::new(f);

        serde_json::to_writer_pretty(f, &parsed).context("Failed to serialise")?;

        Ok(())
    }
}

impl<P> FileParserExt for P where P: FileParser {}

enum Parser {
    Itm(ItmParser),
    Tda(TdaParser),
}

impl Parser {
    fn parse_to_json_file(&self, bytes: &[u8], output_path: &Path) -> Result<()> {
        match self {
            Parser::Itm(p) => p.parse_to_json_file(bytes, output_path),
            Parser::Tda(p) => p.parse_to_json_file(bytes, output_path),
        }
    }

    fn from_filename(filename: &str) -> Option<Self> {
        let (_, ty) = split_resource_name(filename).ok()?;

        let p = match ty {
            ResourceType::Itm => Parser::Itm(ItmParser),
            ResourceType::Tda => Parser::Tda(TdaParser),
            _ => return None,
        };

        Some(p)
    }
}

fn dump_one(archive: &GameArchive, filename: &str, output_folder: &Path) -> Result<()> {
    let parser = Parser::from_filename(filename)
        .with_context(|| format!("No parser for resource {filename}"))?;

    let contents = archive.read(filename)?;
    let out_path = output_folder.join(format!("{filename}.json"));
    parser
        .parse_to_json_file(&contents, &out_path)
        .with_context(|| format!("Failed to process resource {filename}"))
}

/// Parse matching items and tables, writing each out as JSON. Returns how many were written.
pub fn dump_resources(
    archive: &GameArchive,
    patterns: &[Pattern],
    output_folder: &Path,
) -> Result<usize> {
    std::fs::create_dir_all(output_folder)
        .with_context(|| format!("Failed to create folder {output_folder:?}"))?;

    let filenames = matching_filenames(archive, patterns)
        .into_iter()
        // Filter out resources that we can't parse
        .filter(|filename| {
            let parsable = Parser::from_filename(filename).is_some();
            if !parsable {
                debug!("Skipping {filename}");
            }
            parsable
        })
        .collect::<Vec<_>>();

    let dumped = filenames
        .par_iter()
        .map(|filename| (filename, dump_one(archive, filename, output_folder)))
        .filter(|(filename, result)| match result {
            Ok(()) => {
                info!("Dumped resource: {filename}");
                true
            }
            Err(e) => {
                warn!("{e:?}");
                false
            }
        })
        .count();

    Ok(dumped)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use glob::Pattern;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::dump_resources;
    use crate::{
        file_parsers::key::types::Locator,
        resource_manager::GameArchive,
        test_utils::{BundleBuilder, GameDir, KeyBuilder},
    };

    #[test]
    fn test_dump_tables() {
        let game = GameDir::new();
        game.write(
            "chitin.key",
            &KeyBuilder::new()
                .bundle("a.bif")
                .resource("THAC0", 0x3f4, Locator(0))
                .resource("BROKEN", 0x3f4, Locator(1))
                .resource("AR0001", 0x3f2, Locator(2))
                .build(),
        );
        game.write(
            "a.bif",
            &BundleBuilder::new()
                .file(0x3f4, b"2DA V1.0\n0\nA B\nFIGHTER 1 2\n")
                .file(0x3f4, b"not a table")
                .file(0x3f2, b"area")
                .build(),
        );
        let archive = GameArchive::open(&game.key_path()).unwrap();

        let out = tempfile::tempdir().unwrap();
        let count = dump_resources(&archive, &[Pattern::new("*").unwrap()], out.path()).unwrap();
        assert_eq!(count, 1);

        let json: Value =
            serde_json::from_slice(&fs::read(out.path().join("THAC0.2da.json")).unwrap()).unwrap();
        assert_eq!(json["default_value"], "0");
        assert_eq!(json["columns"][1], "B");
        assert_eq!(json["rows"][0]["label"], "FIGHTER");

        assert!(!out.path().join("BROKEN.2da.json").exists());
        assert!(!out.path().join("AR0001.are.json").exists());
    }
}
