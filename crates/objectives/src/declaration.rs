//! Objective declarations
//!
//! Declarations are TOML documents listing the packages a system must
//! carry and which of their versions are acceptable:
//!
//! ```toml
//! organization = "system"
//!
//! [[package]]
//! name = "cordys.esb"
//!
//! [[package.version]]
//! pattern = "D1\\.002\\..*"
//! verdict = "OK"
//!
//! [[package.version]]
//! pattern = "D1\\.001\\..*"
//! verdict = "BROKEN"
//! warnings = ["web gateway regression"]
//! ```
//!
//! Everything is validated while parsing: unknown keys, missing fields
//! and invalid patterns are errors, so a parsed declaration can always
//! be evaluated.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::objective::BoxedObjective;
use crate::package::PackageObjective;
use crate::set::ObjectiveSet;
use crate::version::AcceptanceRule;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeclaration {
    #[serde(default)]
    organization: Option<String>,
    #[serde(default, rename = "package")]
    packages: Vec<RawPackage>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPackage {
    name: String,
    #[serde(default, rename = "version")]
    versions: Vec<RawVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVersion {
    pattern: String,
    verdict: String,
    #[serde(default)]
    warnings: Vec<String>,
}

/// A parsed and validated declaration
#[derive(Debug)]
pub struct Declaration {
    origin: String,
    organization: Option<String>,
    packages: Vec<PackageObjective>,
}

impl Declaration {
    /// Parse a declaration from TOML text
    ///
    /// `origin` names the source in error messages, typically a path.
    pub fn parse(source: &str, origin: &str) -> Result<Self> {
        let raw: RawDeclaration = toml::from_str(source).map_err(|e| Error::Declaration {
            origin: origin.to_string(),
            source: e,
        })?;

        let packages = raw
            .packages
            .into_iter()
            .map(|p| build_package(p, origin))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            origin: origin.to_string(),
            organization: raw.organization,
            packages,
        })
    }

    /// Read and parse a declaration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: PathBuf::from(path),
            source,
        })?;
        log::debug!("Loaded declaration {}", path.display());
        Self::parse(&content, &path.display().to_string())
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Organization the declaration applies to by default
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn packages(&self) -> &[PackageObjective] {
        &self.packages
    }

    /// Turn the declaration into a set of objectives named after its origin
    pub fn into_objectives(self) -> ObjectiveSet {
        let mut set = ObjectiveSet::new(self.origin);
        set.extend(
            self.packages
                .into_iter()
                .map(|p| Box::new(p) as BoxedObjective),
        );
        set
    }
}

fn build_package(raw: RawPackage, origin: &str) -> Result<PackageObjective> {
    if raw.name.trim().is_empty() {
        return Err(Error::EmptyName {
            origin: origin.to_string(),
        });
    }

    let rules = raw
        .versions
        .into_iter()
        .map(|v| AcceptanceRule::new(&raw.name, v.pattern, v.verdict, v.warnings))
        .collect::<Result<Vec<_>>>()?;

    Ok(PackageObjective::new(raw.name, rules))
}
