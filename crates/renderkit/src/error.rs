//! Error types for template rendering
//!
//! Every variant is structural: the template (or the tree of files it
//! includes) is broken, and the render call produces no output.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering a template
#[derive(Error, Debug)]
pub enum Error {
    /// An included file does not exist
    #[error("file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    /// An included folder does not exist
    #[error("folder {} does not exist", .0.display())]
    FolderNotFound(PathBuf),

    /// A folder include points at something that is not a folder
    #[error("folder {} is not a folder", .0.display())]
    NotAFolder(PathBuf),

    /// A file includes itself, directly or through other files
    #[error("include cycle at {}: {chain}", .path.display())]
    IncludeCycle { path: PathBuf, chain: String },

    /// Includes nest deeper than allowed
    #[error("includes nested deeper than {limit} levels at {}", .path.display())]
    DepthExceeded { path: PathBuf, limit: usize },

    /// A folder include pattern is not a valid regular expression
    #[error("invalid include pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A file or folder could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, Error>;
