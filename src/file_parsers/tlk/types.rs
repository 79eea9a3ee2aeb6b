use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;

pub const SIGNATURE: &[u8; 8] = b"TLK V1  ";
pub const HEADER_SIZE: usize = 18;
pub const ENTRY_SIZE: usize = 26;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StringTableError {
    #[error("string id {id} is out of range, the table holds {count} strings")]
    IdOutOfRange { id: u32, count: usize },

    #[error("string {id} spans {start}..{end}, past the end of the string data")]
    TextOutOfBounds { id: u32, start: usize, end: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringEntry {
    /// 1 == has text
    /// 2 == has sound
    /// 4 == has tokens
    pub flags: u16,
    pub sound: String,
    pub volume_variance: u32,
    pub pitch_variance: u32,
    /// Relative to the start of the string data
    pub start: u32,
    pub length: u32,
}

#[derive(Debug, Serialize)]
pub struct StringTable {
    pub language_id: u16,
    pub entries: Vec<StringEntry>,
    #[serde(skip)]
    pub strings: Vec<u8>,
}

impl StringTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: u32) -> Result<&StringEntry, StringTableError> {
        self.entries
            .get(id as usize)
            .ok_or(StringTableError::IdOutOfRange {
                id,
                count: self.entries.len(),
            })
    }

    /// Text of string `id`
    pub fn text(&self, id: u32) -> Result<Cow<'_, str>, StringTableError> {
        let entry = self.entry(id)?;

        let start = entry.start as usize;
        let end = start + entry.length as usize;
        let bytes = self
            .strings
            .get(start..end)
            .ok_or(StringTableError::TextOutOfBounds { id, start, end })?;

        Ok(String::from_utf8_lossy(bytes))
    }
}
