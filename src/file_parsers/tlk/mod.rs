use crate::file_parsers::{FileParser, FormatError};

pub mod parser;
pub mod types;
use parser::parse_tlk_bytes;
use types::StringTable;

pub struct TlkParser;

impl FileParser for TlkParser {
    type Output = StringTable;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output, FormatError> {
        parse_tlk_bytes(bytes)
    }
}
