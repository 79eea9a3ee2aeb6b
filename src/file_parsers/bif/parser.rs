use std::io::{self, Read, Seek, SeekFrom};

use winnow::{
    Parser,
    binary::{le_u16, le_u32},
    combinator::repeat,
    error::ContextError,
};

use super::types::*;
use crate::file_parsers::{
    FormatError,
    shared::{TraceHelper, WinnowParser, signature},
};

const FORMAT: &str = "BIFF";

#[derive(Debug)]
pub struct BundleHeader {
    pub kind: BundleKind,
    pub file_count: u32,
    pub tileset_count: u32,
    pub file_table_offset: u32,
}

impl BundleHeader {
    fn table_len(&self) -> u64 {
        self.file_count as u64 * FILE_ENTRY_SIZE as u64
            + self.tileset_count as u64 * TILESET_ENTRY_SIZE as u64
    }
}

fn truncated(section: &'static str) -> impl FnOnce(ContextError) -> FormatError {
    move |_| FormatError::Truncated {
        format: FORMAT,
        section,
    }
}

fn io_error(source: io::Error) -> FormatError {
    FormatError::Io {
        format: FORMAT,
        source,
    }
}

fn file_entry<'a>() -> impl WinnowParser<&'a [u8], FileEntry> {
    (le_u32, le_u32, le_u32, le_u16, le_u16)
        .map(|(locator, offset, size, type_tag, unknown)| FileEntry {
            locator,
            offset,
            size,
            type_tag,
            unknown,
        })
        .trace("file_entry")
}

fn tileset_entry<'a>() -> impl WinnowParser<&'a [u8], TilesetEntry> {
    (le_u32, le_u32, le_u32, le_u32, le_u16, le_u16)
        .map(
            |(locator, offset, count, size, type_tag, unknown)| TilesetEntry {
                locator,
                offset,
                count,
                size,
                type_tag,
                unknown,
            },
        )
        .trace("tileset_entry")
}

/// Parses the 20 byte header. Compressed variants are recognised and then refused.
pub fn parse_bif_header(contents: &[u8]) -> Result<BundleHeader, FormatError> {
    let mut input = contents;

    let sig = signature()
        .parse_next(&mut input)
        .map_err(truncated("signature"))?;
    let kind =
        BundleKind::from_signature(sig).ok_or_else(|| FormatError::bad_signature(FORMAT, sig))?;
    if kind != BundleKind::UncompressedV1 {
        return Err(FormatError::UnsupportedVariant {
            format: FORMAT,
            variant: format!("{kind:?}"),
        });
    }

    let (file_count, tileset_count, file_table_offset) = (le_u32, le_u32, le_u32)
        .trace("bif_header")
        .parse_next(&mut input)
        .map_err(truncated("header"))?;

    Ok(BundleHeader {
        kind,
        file_count,
        tileset_count,
        file_table_offset,
    })
}

/// The file entry table followed directly by the tileset table
fn entry_tables(
    header: &BundleHeader,
    input: &mut &[u8],
) -> Result<(Vec<FileEntry>, Vec<TilesetEntry>), FormatError> {
    let file_entries: Vec<_> = repeat(header.file_count as usize, file_entry())
        .parse_next(input)
        .map_err(truncated("file entry table"))?;

    let tileset_entries: Vec<_> = repeat(header.tileset_count as usize, tileset_entry())
        .parse_next(input)
        .map_err(truncated("tileset entry table"))?;

    Ok((file_entries, tileset_entries))
}

/// Parse a whole bundle held in memory
pub fn parse_bif_bytes(contents: &[u8]) -> Result<BundleFile, FormatError> {
    let header = parse_bif_header(contents)?;

    let mut input =
        contents
            .get(header.file_table_offset as usize..)
            .ok_or(FormatError::OffsetOutOfBounds {
                format: FORMAT,
                section: "file entry table",
                offset: header.file_table_offset as u64,
            })?;

    let (file_entries, tileset_entries) = entry_tables(&header, &mut input)?;

    Ok(BundleFile {
        kind: header.kind,
        file_entries,
        tileset_entries,
        trailing_bytes: input.len(),
    })
}

/// Read only the header and entry tables of a bundle, leaving the resource data on disk
pub fn read_bif<R: Read + Seek>(reader: &mut R) -> Result<BundleFile, FormatError> {
    let mut head = Vec::with_capacity(HEADER_SIZE);
    reader
        .by_ref()
        .take(HEADER_SIZE as u64)
        .read_to_end(&mut head)
        .map_err(io_error)?;
    let header = parse_bif_header(&head)?;

    let end = reader.seek(SeekFrom::End(0)).map_err(io_error)?;
    let table_start = header.file_table_offset as u64;
    if table_start > end {
        return Err(FormatError::OffsetOutOfBounds {
            format: FORMAT,
            section: "file entry table",
            offset: table_start,
        });
    }

    let table_len = header.table_len();
    let available = end - table_start;
    if table_len > available {
        // Which table runs out matters for the error
        let files_len = header.file_count as u64 * FILE_ENTRY_SIZE as u64;
        let section = if files_len > available {
            "file entry table"
        } else {
            "tileset entry table"
        };
        return Err(FormatError::Truncated {
            format: FORMAT,
            section,
        });
    }

    reader
        .seek(SeekFrom::Start(table_start))
        .map_err(io_error)?;
    let mut tables = vec![0; table_len as usize];
    reader.read_exact(&mut tables).map_err(io_error)?;

    let (file_entries, tileset_entries) = entry_tables(&header, &mut tables.as_slice())?;

    Ok(BundleFile {
        kind: header.kind,
        file_entries,
        tileset_entries,
        trailing_bytes: (available - table_len) as usize,
    })
}
