//! # renderkit
//!
//! Template preprocessing for configuration templates.
//!
//! This crate provides:
//! - **Includes**: `${include:file=...}` and `${include:folder=...;pattern=...}`
//!   directives, resolved recursively with cycle and depth protection
//! - **Substitution**: `${name}` placeholders filled from a variable map
//! - **Escaping**: `${dollar}` for a literal `$`
//!
//! ## Example
//!
//! ```
//! use renderkit::{MemoryFs, Renderer};
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let fs = MemoryFs::new().with_file("/templates/footer.txt", "-- ${team}");
//! let renderer = Renderer::with_fs(fs);
//!
//! let mut vars = HashMap::new();
//! vars.insert("team".to_string(), "ops".to_string());
//!
//! let text = renderer.render(
//!     &vars,
//!     "price ${dollar}10\n${include:file=footer.txt}",
//!     Path::new("/templates"),
//! )?;
//! assert_eq!(text, "price $10\n-- ops");
//! # Ok::<(), renderkit::Error>(())
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod fs;
pub mod include;
pub mod renderer;
pub mod substitute;

// Re-export commonly used items at crate root for convenience
pub use error::{Error, Result};
pub use fs::{MemoryFs, StdFs, TemplateFs};
pub use include::{IncludeResolver, IncludeSpec};
pub use renderer::{DEFAULT_FOLDER_PATTERN, DEFAULT_MAX_INCLUDE_DEPTH, RenderOptions, Renderer};
pub use substitute::{DOLLAR_ESCAPE, Variables, substitute, unescape, unresolved};
