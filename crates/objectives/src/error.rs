//! Error types for the objectives crate
//!
//! All of these are declaration errors: they are raised while turning
//! declarations into objectives, never while checking them. A check
//! whose desired state is not met is reported through `Ok(false)`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading objective declarations
#[derive(Error, Debug)]
pub enum Error {
    /// Declaration text is not valid, or has unknown or missing elements
    #[error("invalid declaration in {origin}: {source}")]
    Declaration {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// A version pattern is not a valid regular expression
    #[error("invalid version pattern '{pattern}' for package {package}: {source}")]
    InvalidPattern {
        package: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A package declaration has an empty name
    #[error("package declaration in {origin} has an empty name")]
    EmptyName { origin: String },

    /// Declaration file could not be read
    #[error("failed to read declaration {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for objectives operations
pub type Result<T> = std::result::Result<T, Error>;
