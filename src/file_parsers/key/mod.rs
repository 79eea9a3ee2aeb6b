use crate::file_parsers::{FileParser, FormatError};

pub mod parser;
pub mod types;
use parser::parse_key_bytes;
use types::KeyFile;

pub struct KeyParser;

impl FileParser for KeyParser {
    type Output = KeyFile;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output, FormatError> {
        parse_key_bytes(bytes)
    }
}
