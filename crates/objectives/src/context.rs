//! Evaluation context and provider traits
//!
//! These traits allow the objectives crate to be used without
//! depending on a specific transport to the target system or a
//! specific way of showing diagnostics.

use crate::types::{PackageInfo, Report, Severity};
use anyhow::Result;
use std::collections::HashMap;

/// Handle to the system objectives are evaluated against
///
/// Implement this trait to expose the deployed state of a system.
/// How the state is obtained (remote call, snapshot file) is up to
/// the implementation.
pub trait Target {
    /// Name of the target system, used in diagnostics
    fn name(&self) -> &str;

    /// Look up the deployed package with the given name
    ///
    /// Returns `Ok(None)` when the package is not installed. A package
    /// that is installed without a known version is returned with an
    /// empty or absent `full_version`.
    fn package_info(&self, name: &str) -> Result<Option<PackageInfo>>;
}

/// Sink for diagnostics produced while evaluating objectives
///
/// Reporting never fails: implementations swallow their own errors.
pub trait Reporter {
    /// Receive a message at the given severity
    fn report(&mut self, severity: Severity, message: &str);

    fn error(&mut self, message: &str) {
        self.report(Severity::Error, message);
    }

    fn warn(&mut self, message: &str) {
        self.report(Severity::Warn, message);
    }

    fn info(&mut self, message: &str) {
        self.report(Severity::Info, message);
    }

    fn debug(&mut self, message: &str) {
        self.report(Severity::Debug, message);
    }
}

/// Reporter that forwards every message to the `log` facade
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => log::error!("{message}"),
            Severity::Warn => log::warn!("{message}"),
            Severity::Info => log::info!("{message}"),
            Severity::Debug => log::debug!("{message}"),
        }
    }
}

/// Reporter that keeps every message in memory
///
/// Useful for front ends that render the trail after a run, and in tests.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub entries: Vec<Report>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded at exactly the given severity
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|r| r.severity == severity)
            .map(|r| r.message.as_str())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.messages(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.messages(Severity::Warn)
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, severity: Severity, message: &str) {
        self.entries.push(Report {
            severity,
            message: message.to_string(),
        });
    }
}

/// In-memory target backed by a name to version map
#[derive(Debug, Default, Clone)]
pub struct MapTarget {
    name: String,
    packages: HashMap<String, Option<String>>,
}

impl MapTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            packages: HashMap::new(),
        }
    }

    /// Add an installed package with a version
    pub fn with_package(mut self, name: &str, version: &str) -> Self {
        self.packages
            .insert(name.to_string(), Some(version.to_string()));
        self
    }

    /// Add an installed package without version information
    pub fn with_unversioned(mut self, name: &str) -> Self {
        self.packages.insert(name.to_string(), None);
        self
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl Target for MapTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn package_info(&self, name: &str) -> Result<Option<PackageInfo>> {
        Ok(self.packages.get(name).map(|version| PackageInfo {
            name: name.to_string(),
            full_version: version.clone(),
        }))
    }
}

/// Context passed to objective operations
pub struct ObjectiveContext<'a> {
    /// System the objective is evaluated against
    pub target: &'a dyn Target,
    /// Where diagnostics go
    pub reporter: &'a mut dyn Reporter,
    /// Whether configure/remove should only report what they would do
    pub dry_run: bool,
}

impl<'a> ObjectiveContext<'a> {
    /// Create a new context
    pub fn new(target: &'a dyn Target, reporter: &'a mut dyn Reporter) -> Self {
        Self {
            target,
            reporter,
            dry_run: false,
        }
    }

    /// Create a context that makes no changes
    pub fn dry_run(target: &'a dyn Target, reporter: &'a mut dyn Reporter) -> Self {
        Self {
            target,
            reporter,
            dry_run: true,
        }
    }
}
