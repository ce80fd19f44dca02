//! Inventory files as check targets
//!
//! An inventory is a snapshot of the packages deployed on a system,
//! written as TOML or JSON (picked by file extension):
//!
//! ```toml
//! name = "dev"
//!
//! [packages]
//! "cordys.esb" = "D1.002.012"
//! "cordys.broken" = ""
//! ```
//!
//! A package mapped to `""` is installed without a known version.

use anyhow::{Context, Result};
use objectives::{PackageInfo, Target};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    Toml,
    Json,
}

impl InventoryFormat {
    /// Pick the format from the file extension, TOML unless it is `.json`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInventory {
    name: Option<String>,
    #[serde(default)]
    packages: BTreeMap<String, String>,
}

/// Target backed by an inventory file
#[derive(Debug, Clone)]
pub struct InventoryTarget {
    name: String,
    packages: BTreeMap<String, String>,
}

impl InventoryTarget {
    /// Load an inventory file
    ///
    /// The target is named after the file stem unless the file sets `name`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read inventory {}", path.display()))?;
        let fallback = path
            .file_stem()
            .map_or_else(|| "inventory".to_string(), |s| s.to_string_lossy().into_owned());

        Self::parse(&content, InventoryFormat::from_path(path), &fallback)
            .with_context(|| format!("Invalid inventory {}", path.display()))
    }

    pub fn parse(content: &str, format: InventoryFormat, fallback_name: &str) -> Result<Self> {
        let raw: RawInventory = match format {
            InventoryFormat::Toml => toml::from_str(content)?,
            InventoryFormat::Json => serde_json::from_str(content)?,
        };
        let target = Self {
            name: raw.name.unwrap_or_else(|| fallback_name.to_string()),
            packages: raw.packages,
        };
        log::debug!(
            "Inventory {} lists {} package(s)",
            target.name,
            target.packages.len()
        );
        Ok(target)
    }
}

impl Target for InventoryTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn package_info(&self, name: &str) -> Result<Option<PackageInfo>> {
        Ok(self
            .packages
            .get(name)
            .map(|version| PackageInfo::new(name, version.as_str())))
    }
}
