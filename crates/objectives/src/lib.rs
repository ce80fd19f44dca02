//! # Objectives
//!
//! Desired-state checks for a managed system.
//!
//! This crate provides the abstractions for declaring what a target
//! system should look like, checking whether it does, and (where the
//! objective supports it) converging or undoing it.
//!
//! ## Core Concepts
//!
//! - **Objective**: Something with a desired state that can be checked,
//!   configured and removed
//! - **PackageObjective**: A package that must be deployed at one of the
//!   versions its acceptance rules accept
//! - **ObjectiveSet**: An ordered group of objectives checked together
//! - **Declaration**: TOML input that parses into objectives
//!
//! ## Example
//!
//! ```
//! use objectives::{Declaration, MapTarget, Objective, ObjectiveContext, RecordingReporter};
//!
//! let decl = Declaration::parse(
//!     r#"
//! [[package]]
//! name = "esb"
//!
//! [[package.version]]
//! pattern = "1\\..*"
//! verdict = "OK"
//! "#,
//!     "inline",
//! )?;
//!
//! let target = MapTarget::new("dev").with_package("esb", "1.4");
//! let mut reporter = RecordingReporter::new();
//! let mut ctx = ObjectiveContext::new(&target, &mut reporter);
//!
//! assert!(decl.into_objectives().check(&mut ctx)?);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! The crate uses traits for dependency injection:
//!
//! - [`Target`]: Looks up deployed packages on the system being checked
//! - [`Reporter`]: Receives error/warn/info/debug diagnostics
//!
//! A check that finds its objective unmet is not an error: it returns
//! `Ok(false)` and leaves the explanation with the reporter.

pub mod context;
pub mod declaration;
pub mod error;
pub mod objective;
pub mod package;
pub mod set;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use context::{
    LogReporter, MapTarget, ObjectiveContext, RecordingReporter, Reporter, Target,
};
pub use declaration::Declaration;
pub use error::{Error, Result};
pub use objective::{BoxedObjective, Objective};
pub use package::{Evaluation, PackageObjective};
pub use set::ObjectiveSet;
pub use types::{CheckSummary, PackageInfo, Report, Severity};
pub use version::{ACCEPT_VERDICT, AcceptanceRule};
