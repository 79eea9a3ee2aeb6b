use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{
    file_parsers::FormatError, resource_manager::LoadState, resource_type::ResourceTypeError,
};

/// Why a game archive could not be loaded
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("a load is already in progress")]
    LoadInProgress,

    #[error("failed to read master index {path:?}")]
    ReadIndex {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid master index {path:?}")]
    InvalidIndex {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

/// Why a single resource could not be extracted
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resources are unavailable while the archive is {0:?}")]
    NotLoaded(LoadState),

    #[error(transparent)]
    UnknownType(#[from] ResourceTypeError),

    #[error("resource {0} not found")]
    NotFound(String),

    #[error("bundle {index} ({name}) is not available")]
    BundleUnavailable { index: usize, name: String },

    #[error("entry {entry} is out of range for bundle {name}")]
    EntryOutOfRange { name: String, entry: usize },

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse resource {name}")]
    Parse {
        name: String,
        #[source]
        source: FormatError,
    },

    #[error("short read from {path:?} at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        path: PathBuf,
        offset: u64,
        expected: usize,
        actual: usize,
    },
}
