use crate::file_parsers::{FileParser, FormatError};

pub mod parser;
pub mod types;
use parser::parse_itm_bytes;
use types::ItemDefinition;

pub struct ItmParser;

impl FileParser for ItmParser {
    type Output = ItemDefinition;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output, FormatError> {
        parse_itm_bytes(bytes)
    }
}
