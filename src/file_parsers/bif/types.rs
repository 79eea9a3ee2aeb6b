use serde::Serialize;

use crate::file_parsers::FormatError;

pub const HEADER_SIZE: usize = 20;
pub const FILE_ENTRY_SIZE: usize = 16;
pub const TILESET_ENTRY_SIZE: usize = 20;

/// Identified by the 8 byte signature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BundleKind {
    /// Placeholder for a bundle that could not be opened
    #[default]
    Invalid,
    /// "BIFFV1  "
    UncompressedV1,
    /// "BIF V1.0", a single zlib stream
    CompressedFile,
    /// "BIFCV1.0", zlib blocks
    CompressedBlocks,
}

impl BundleKind {
    pub fn from_signature(signature: &[u8]) -> Option<Self> {
        use BundleKind::*;
        let kind = match signature {
            b"BIFFV1  " => UncompressedV1,
            b"BIF V1.0" => CompressedFile,
            b"BIFCV1.0" => CompressedBlocks,
            _ => return None,
        };

        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub locator: u32,
    pub offset: u32,
    pub size: u32,
    pub type_tag: u16,
    pub unknown: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TilesetEntry {
    pub locator: u32,
    pub offset: u32,
    /// Number of tiles
    pub count: u32,
    /// Size of a single tile
    pub size: u32,
    pub type_tag: u16,
    pub unknown: u16,
}

#[derive(Debug, Default, Serialize)]
pub struct BundleFile {
    pub kind: BundleKind,
    pub file_entries: Vec<FileEntry>,
    pub tileset_entries: Vec<TilesetEntry>,
    /// Bytes left in the file after the tileset table. Zero for an exact layout.
    pub trailing_bytes: usize,
}

impl BundleFile {
    /// An empty bundle standing in for one that is missing, keeping bundle indices aligned
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == BundleKind::Invalid
    }

    /// Strict check that the entry tables end exactly at the end of the file
    pub fn check_layout(&self) -> Result<(), FormatError> {
        if self.trailing_bytes == 0 {
            Ok(())
        } else {
            Err(FormatError::UnexpectedLayout {
                format: "BIFF",
                trailing: self.trailing_bytes,
            })
        }
    }
}
