use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which directory argument a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    SearchRoot,
    Destination,
}

impl fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryRole::SearchRoot => write!(f, "search"),
            DirectoryRole::Destination => write!(f, "destination"),
        }
    }
}

/// Errors produced by the search and transfer engines
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("{role} directory does not exist or is not a directory: {}", path.display())]
    InvalidDirectory { role: DirectoryRole, path: PathBuf },

    #[error("{} -> {}: {source}", from.display(), to.display())]
    Transfer {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not inside search root {}", path.display(), root.display())]
    OutsideSearchRoot { path: PathBuf, root: PathBuf },

    #[error("destination already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    #[error("source and destination are the same file: {}", path.display())]
    SameFile { path: PathBuf },

    #[error("no files selected")]
    EmptySelection,

    #[error("selection index {index} is out of range ({len} results)")]
    SelectionOutOfRange { index: usize, len: usize },

    #[error("no file extensions selected")]
    NoExtensions,

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("configuration error in {}: {message}", path.display())]
    Configuration { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, FinderError>;
