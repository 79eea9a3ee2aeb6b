use thiserror::Error;

/// Errors raised while decoding one of the on-disk formats.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The leading signature does not belong to this format at all.
    #[error("not a {format} file, signature was {found:?}")]
    BadSignature { format: &'static str, found: String },

    /// The signature is known but the variant cannot be decoded.
    #[error("{format} variant {variant:?} is not supported")]
    UnsupportedVariant {
        format: &'static str,
        variant: String,
    },

    #[error("{format} file is truncated while reading {section}")]
    Truncated {
        format: &'static str,
        section: &'static str,
    },

    #[error("{format} {section} declared at offset {declared}, but it starts at {actual}")]
    MisplacedTable {
        format: &'static str,
        section: &'static str,
        declared: usize,
        actual: usize,
    },

    #[error("{format} {section} at offset {offset} lies outside the file")]
    OffsetOutOfBounds {
        format: &'static str,
        section: &'static str,
        offset: u64,
    },

    /// Tables were read but the stream did not end where they did.
    #[error("{format} has {trailing} bytes after its last table")]
    UnexpectedLayout {
        format: &'static str,
        trailing: usize,
    },

    #[error("name offset {offset} lies outside the {format} string region")]
    BadStringOffset { format: &'static str, offset: u32 },

    #[error("I/O error while reading {format}: {source}")]
    Io {
        format: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    /// True when the input is simply some other kind of file.
    pub fn is_signature_mismatch(&self) -> bool {
        matches!(self, FormatError::BadSignature { .. })
    }

    pub(crate) fn bad_signature(format: &'static str, found: &[u8]) -> Self {
        FormatError::BadSignature {
            format,
            found: String::from_utf8_lossy(found).into_owned(),
        }
    }
}
