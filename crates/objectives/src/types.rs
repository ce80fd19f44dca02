//! Core types for objective evaluation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Information about a package deployed on a target system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Package identifier
    pub name: String,
    /// Full version string as reported by the target, if any
    pub full_version: Option<String>,
}

impl PackageInfo {
    /// Create package info with a known version
    pub fn new(name: impl Into<String>, full_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_version: Some(full_version.into()),
        }
    }

    /// Create package info for a package whose version is unknown
    pub fn unversioned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_version: None,
        }
    }

    /// Version for display, never empty
    pub fn display_version(&self) -> &str {
        match self.full_version.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => "<none>",
        }
    }
}

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single message sent to a reporter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub severity: Severity,
    pub message: String,
}

/// Summary of a check run over several objectives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckSummary {
    pub passed: usize,
    pub failed: usize,
    /// Ids of the objectives whose desired state was not met
    pub failures: Vec<String>,
}

impl CheckSummary {
    /// Total number of objectives checked
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Check if every objective was met
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Record the outcome of a single objective
    pub fn add_result(&mut self, id: &str, passed: bool) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
            self.failures.push(id.to_string());
        }
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &CheckSummary) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.failures.extend(other.failures.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_version() {
        assert_eq!(PackageInfo::new("a", "1.0").display_version(), "1.0");
        assert_eq!(PackageInfo::new("a", "").display_version(), "<none>");
        assert_eq!(PackageInfo::unversioned("a").display_version(), "<none>");
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = CheckSummary::default();
        summary.add_result("a", true);
        summary.add_result("b", false);
        assert_eq!(summary.total(), 2);
        assert!(!summary.is_success());
        assert_eq!(summary.failures, vec!["b".to_string()]);

        let mut other = CheckSummary::default();
        other.add_result("c", false);
        summary.merge(&other);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.failures, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Error > Severity::Warn);
        assert!(Severity::Warn > Severity::Info);
        assert!(Severity::Info > Severity::Debug);
        assert_eq!(Severity::Warn.to_string(), "warn");
    }
}
