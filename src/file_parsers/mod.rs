pub mod bif;
pub mod error;
pub mod itm;
pub mod key;
pub mod shared;
pub mod tda;
pub mod tlk;

pub use error::FormatError;

pub trait FileParser {
    type Output;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output, FormatError>;
}
