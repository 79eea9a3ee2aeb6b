use crate::file_parsers::{FileParser, FormatError};

pub mod parser;
pub mod types;
use parser::parse_bif_bytes;
use types::BundleFile;

pub struct BifParser;

impl FileParser for BifParser {
    type Output = BundleFile;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output, FormatError> {
        parse_bif_bytes(bytes)
    }
}
