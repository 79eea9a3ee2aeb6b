use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

use crate::{
    path::resource_filename,
    resource_manager::{GameArchive, ResourceManager},
};

pub mod cat;
pub mod dump;
pub mod extract;
pub mod list;
pub mod strings;

/// Resource names are case-insensitive, so globs are too
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Load the archive on the calling thread for a one-shot command
pub fn load_archive(key_path: &Path) -> Result<Arc<GameArchive>> {
    let manager = ResourceManager::new();
    manager
        .load(key_path)
        .context("Failed to load game archive")?;

    Ok(manager.archive()?)
}

/// "name.ext" of every index entry matching any of the patterns, in index order
pub fn matching_filenames(archive: &GameArchive, patterns: &[Pattern]) -> Vec<String> {
    archive
        .entries()
        .map(|entry| resource_filename(&entry.name, entry.type_tag))
        .filter(|filename| {
            patterns
                .iter()
                .any(|pattern| pattern.matches_with(filename, MATCH_OPTIONS))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use glob::Pattern;
    use pretty_assertions::assert_eq;

    use super::{load_archive, matching_filenames};
    use crate::{
        file_parsers::key::types::Locator,
        resource_manager::GameArchive,
        test_utils::{BundleBuilder, GameDir, KeyBuilder, hello_bundle},
    };

    #[test]
    fn test_load_archive() {
        let game = GameDir::new();
        game.write(
            "chitin.key",
            &KeyBuilder::new()
                .bundle("TEST.BIF")
                .resource("foo", 0x3f4, Locator(0))
                .build(),
        );
        game.write("TEST.BIF", &hello_bundle());

        let archive = load_archive(&game.key_path()).unwrap();
        assert_eq!(archive.read("foo.2da").unwrap(), b"hello".as_slice());

        let err = load_archive(&game.path().join("missing.key")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load game archive"));
    }

    #[test]
    fn test_glob_filter() {
        let game = GameDir::new();
        game.write(
            "chitin.key",
            &KeyBuilder::new()
                .bundle("a.bif")
                .resource("SW1H01", 0x3ed, Locator(0))
                .resource("THAC0", 0x3f4, Locator(1))
                .resource("SW1H02", 0x3ed, Locator(2))
                .build(),
        );
        game.write(
            "a.bif",
            &BundleBuilder::new()
                .file(0x3ed, b"a")
                .file(0x3f4, b"b")
                .file(0x3ed, b"c")
                .build(),
        );
        let archive = GameArchive::open(&game.key_path()).unwrap();

        let items = matching_filenames(&archive, &[Pattern::new("*.ITM").unwrap()]);
        assert_eq!(items, vec!["SW1H01.itm", "SW1H02.itm"]);

        let mixed = matching_filenames(
            &archive,
            &[
                Pattern::new("thac0.*").unwrap(),
                Pattern::new("sw1h02.itm").unwrap(),
            ],
        );
        assert_eq!(mixed, vec!["THAC0.2da", "SW1H02.itm"]);
    }
}
