use crate::file_parsers::{FileParser, FormatError};

pub mod parser;
pub mod types;
use parser::parse_tda_bytes;
use types::TableData;

pub struct TdaParser;

impl FileParser for TdaParser {
    type Output = TableData;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output, FormatError> {
        parse_tda_bytes(bytes)
    }
}
