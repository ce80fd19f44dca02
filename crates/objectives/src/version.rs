//! Acceptance rules for installed versions
//!
//! A rule pairs a version pattern with a verdict. The verdict `OK`
//! accepts any version the pattern matches; any other verdict marks the
//! matched versions as known but rejected, with optional warnings.

use crate::error::{Error, Result};
use regex::Regex;

/// Verdict that marks a matching version as acceptable
pub const ACCEPT_VERDICT: &str = "OK";

/// A declared acceptance rule for a package version
#[derive(Debug, Clone)]
pub struct AcceptanceRule {
    pattern: String,
    regex: Regex,
    verdict: String,
    warnings: Vec<String>,
}

impl AcceptanceRule {
    /// Build a rule, compiling `pattern` as a full-string match
    ///
    /// `package` is only used to name the package in the error when the
    /// pattern does not compile.
    pub fn new(
        package: &str,
        pattern: impl Into<String>,
        verdict: impl Into<String>,
        warnings: Vec<String>,
    ) -> Result<Self> {
        let pattern = pattern.into();
        let regex =
            Regex::new(&format!("^(?:{pattern})$")).map_err(|source| Error::InvalidPattern {
                package: package.to_string(),
                pattern: pattern.clone(),
                source,
            })?;

        Ok(Self {
            pattern,
            regex,
            verdict: verdict.into(),
            warnings,
        })
    }

    /// Pattern as declared
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn verdict(&self) -> &str {
        &self.verdict
    }

    /// Messages to show when a rejected version matches this rule
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Whether a matching version is acceptable
    pub fn is_accepting(&self) -> bool {
        self.verdict == ACCEPT_VERDICT
    }

    /// Check whether the whole of `actual` matches this rule's pattern
    ///
    /// An absent or empty version never matches.
    pub fn matches(&self, actual: Option<&str>) -> bool {
        match actual {
            Some(version) if !version.is_empty() => self.regex.is_match(version),
            _ => false,
        }
    }
}
