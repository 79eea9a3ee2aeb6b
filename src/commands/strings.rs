use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{
    file_parsers::{FileParser, tlk::TlkParser},
    path::find_child_case_insensitive,
};

pub const STRING_TABLE: &str = "dialog.tlk";

/// The string table shipped with the game: in the game folder for the original releases,
/// under "lang/<locale>" for the enhanced editions
pub fn find_string_table(root: &Path, locale: &str) -> Option<PathBuf> {
    find_child_case_insensitive(root, STRING_TABLE)
        .or_else(|| {
            let lang = find_child_case_insensitive(root, "lang")?;
            let locale = find_child_case_insensitive(&lang, locale)?;
            find_child_case_insensitive(&locale, STRING_TABLE)
        })
        .filter(|p| p.is_file())
}

/// Print the text of each string id, one per line
pub fn print_strings(table_path: &Path, ids: &[u32]) -> Result<()> {
    let contents =
        fs::read(table_path).with_context(|| format!("Failed to read {table_path:?}"))?;
    let table = TlkParser
        .parse(&contents)
        .with_context(|| format!("Failed to parse {table_path:?}"))?;

    let mut stdout = BufWriter::new(io::stdout().lock());
    for &id in ids {
        let text = table.text(id)?;
        writeln!(stdout, "{id}\t{text}").context("Failed to write to stdout")?;
    }

    stdout.flush().context("Failed to flush stdout")
}
