//! stratum configuration
//!
//! Everything lives in `config.toml` inside the config directory (see
//! [`crate::paths`]). A missing file is the same as an empty one.
//!
//! ```toml
//! default_system = "dev"
//!
//! [render]
//! max_include_depth = 16
//!
//! [systems.dev]
//! inventory = "inventory/dev.toml"
//! properties = ["props/common.toml", "props/dev.toml"]
//! variables = { "db.port" = "5432" }
//!
//! [systems.dev.organizations.system]
//! variables = { ldap.root = "o=system" }
//! ```

use anyhow::{Context, Result, bail};
use renderkit::{DEFAULT_FOLDER_PATTERN, DEFAULT_MAX_INCLUDE_DEPTH, RenderOptions};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Variable holding the name of the system being rendered for
pub const SYSTEM_NAME_VAR: &str = "sys.name";

/// Variable holding the name of the organization being rendered for
pub const ORGANIZATION_NAME_VAR: &str = "sys.org.name";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StratumConfig {
    /// System used when a command does not name one
    pub default_system: Option<String>,
    pub render: RenderConfig,
    pub systems: BTreeMap<String, SystemConfig>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub max_include_depth: usize,
    pub default_pattern: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            default_pattern: DEFAULT_FOLDER_PATTERN.to_string(),
        }
    }
}

impl RenderConfig {
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions {
            max_include_depth: self.max_include_depth,
            default_pattern: self.default_pattern.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Snapshot of the packages installed on the system
    pub inventory: Option<String>,
    /// Property files, later files win
    pub properties: Vec<String>,
    pub variables: toml::Table,
    pub organizations: BTreeMap<String, OrganizationConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizationConfig {
    pub properties: Vec<String>,
    pub variables: toml::Table,
}

impl StratumConfig {
    /// Load `config.toml` from the config directory
    pub fn load() -> Result<Self> {
        let path = paths::config_file()?;
        Self::load_from(&path)
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self {
                base_dir,
                ..Self::default()
            });
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.base_dir = base_dir;
        Ok(config)
    }

    /// Resolve the system a command runs against
    ///
    /// An explicit name must be configured. Without one the
    /// `default_system` is used, if there is one.
    pub fn system<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Result<Option<(&'a str, &'a SystemConfig)>> {
        let Some(name) = requested.or(self.default_system.as_deref()) else {
            return Ok(None);
        };
        match self.systems.get(name) {
            Some(system) => Ok(Some((name, system))),
            None => bail!("Unknown system '{}'", name),
        }
    }

    /// Inventory file of a system, resolved against the config directory
    pub fn inventory_path(&self, system: &SystemConfig) -> Option<PathBuf> {
        system
            .inventory
            .as_deref()
            .map(|p| paths::resolve(&self.base_dir, p))
    }

    /// Variables for rendering against a system and organization
    ///
    /// Layers, each overriding the previous one: system property files,
    /// system variables, organization property files, organization
    /// variables, then the built-in `sys.name` and `sys.org.name`.
    pub fn variables(
        &self,
        system: Option<&str>,
        organization: Option<&str>,
    ) -> Result<BTreeMap<String, String>> {
        let mut vars = BTreeMap::new();

        if let Some((name, config)) = self.system(system)? {
            self.load_layer(&mut vars, &config.properties, &config.variables)?;

            if let Some(org) = organization {
                match config.organizations.get(org) {
                    Some(org_config) => {
                        self.load_layer(&mut vars, &org_config.properties, &org_config.variables)?;
                    }
                    None => log::debug!("No settings for organization {org} on {name}"),
                }
            }
            vars.insert(SYSTEM_NAME_VAR.to_string(), name.to_string());
        }

        if let Some(org) = organization {
            vars.insert(ORGANIZATION_NAME_VAR.to_string(), org.to_string());
        }
        Ok(vars)
    }

    fn load_layer(
        &self,
        vars: &mut BTreeMap<String, String>,
        properties: &[String],
        variables: &toml::Table,
    ) -> Result<()> {
        for file in properties {
            let path = paths::resolve(&self.base_dir, file);
            vars.extend(load_properties(&path)?);
        }
        flatten_into(vars, "", variables);
        Ok(())
    }
}

/// Read a TOML property file into dotted keys
pub fn load_properties(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read property file {}", path.display()))?;
    let table: toml::Table = toml::from_str(&content)
        .with_context(|| format!("Invalid property file {}", path.display()))?;

    let mut vars = BTreeMap::new();
    flatten_into(&mut vars, "", &table);
    log::debug!("Loaded {} properties from {}", vars.len(), path.display());
    Ok(vars)
}

fn flatten_into(out: &mut BTreeMap<String, String>, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten_into(out, &key, nested),
            toml::Value::String(s) => {
                out.insert(key, s.clone());
            }
            other => {
                out.insert(key, other.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
default_system = "dev"

[render]
max_include_depth = 8

[systems.dev]
inventory = "inventory/dev.toml"
properties = ["props/common.toml", "props/dev.toml"]
variables = { "db.port" = "5433", retries = 3 }

[systems.dev.organizations.system]
variables = { ldap = { root = "o=system" } }

[systems.prod]
"#;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn write_props(dir: &Path) {
        fs::create_dir_all(dir.join("props")).unwrap();
        fs::write(
            dir.join("props").join("common.toml"),
            "owner = \"ops\"\n\n[db]\nhost = \"localhost\"\nport = 5432\n",
        )
        .unwrap();
        fs::write(dir.join("props").join("dev.toml"), "owner = \"dev-team\"\n").unwrap();
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = StratumConfig::load_from(&tmp.path().join("config.toml")).unwrap();

        assert!(config.default_system.is_none());
        assert!(config.systems.is_empty());
        assert_eq!(config.render.max_include_depth, DEFAULT_MAX_INCLUDE_DEPTH);
        assert_eq!(config.render.default_pattern, DEFAULT_FOLDER_PATTERN);
        assert_eq!(config.base_dir, tmp.path());
    }

    #[test]
    fn test_parse_full_config() {
        let tmp = TempDir::new().unwrap();
        let config = StratumConfig::load_from(&write_config(tmp.path(), SAMPLE)).unwrap();

        assert_eq!(config.default_system.as_deref(), Some("dev"));
        assert_eq!(config.render.max_include_depth, 8);
        assert_eq!(config.render.default_pattern, DEFAULT_FOLDER_PATTERN);
        assert_eq!(config.systems.len(), 2);

        let options = config.render.to_options();
        assert_eq!(options.max_include_depth, 8);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "[systems.dev]\ninventroy = \"x\"\n");
        assert!(StratumConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_system_resolution() {
        let tmp = TempDir::new().unwrap();
        let config = StratumConfig::load_from(&write_config(tmp.path(), SAMPLE)).unwrap();

        let (name, _) = config.system(None).unwrap().unwrap();
        assert_eq!(name, "dev");
        let (name, _) = config.system(Some("prod")).unwrap().unwrap();
        assert_eq!(name, "prod");

        let err = config.system(Some("qa")).unwrap_err();
        assert!(err.to_string().contains("Unknown system 'qa'"));

        let empty = StratumConfig::default();
        assert!(empty.system(None).unwrap().is_none());
    }

    #[test]
    fn test_inventory_path_relative_to_config_dir() {
        let tmp = TempDir::new().unwrap();
        let config = StratumConfig::load_from(&write_config(tmp.path(), SAMPLE)).unwrap();
        let (_, dev) = config.system(Some("dev")).unwrap().unwrap();
        let (_, prod) = config.system(Some("prod")).unwrap().unwrap();

        assert_eq!(
            config.inventory_path(dev),
            Some(tmp.path().join("inventory/dev.toml"))
        );
        assert_eq!(config.inventory_path(prod), None);
    }

    #[test]
    fn test_variables_layering() {
        let tmp = TempDir::new().unwrap();
        write_props(tmp.path());
        let config = StratumConfig::load_from(&write_config(tmp.path(), SAMPLE)).unwrap();

        let vars = config.variables(None, Some("system")).unwrap();
        assert_eq!(vars["db.host"], "localhost");
        // inline variables override property files
        assert_eq!(vars["db.port"], "5433");
        // later property files win
        assert_eq!(vars["owner"], "dev-team");
        assert_eq!(vars["retries"], "3");
        assert_eq!(vars["ldap.root"], "o=system");
        assert_eq!(vars[SYSTEM_NAME_VAR], "dev");
        assert_eq!(vars[ORGANIZATION_NAME_VAR], "system");
    }

    #[test]
    fn test_variables_without_organization() {
        let tmp = TempDir::new().unwrap();
        write_props(tmp.path());
        let config = StratumConfig::load_from(&write_config(tmp.path(), SAMPLE)).unwrap();

        let vars = config.variables(Some("dev"), None).unwrap();
        assert!(!vars.contains_key("ldap.root"));
        assert!(!vars.contains_key(ORGANIZATION_NAME_VAR));
    }

    #[test]
    fn test_variables_without_system() {
        let config = StratumConfig::default();
        let vars = config.variables(None, Some("acme")).unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[ORGANIZATION_NAME_VAR], "acme");
    }

    #[test]
    fn test_missing_property_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let config = StratumConfig::load_from(&write_config(tmp.path(), SAMPLE)).unwrap();
        let err = config.variables(Some("dev"), None).unwrap_err();
        assert!(err.to_string().contains("Could not read property file"));
    }

    #[test]
    fn test_load_properties_flattens_tables() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("p.toml");
        fs::write(
            &path,
            "name = \"x\"\nenabled = true\n[a.b]\nc = \"deep\"\nn = 1\n",
        )
        .unwrap();

        let vars = load_properties(&path).unwrap();
        assert_eq!(vars["name"], "x");
        assert_eq!(vars["enabled"], "true");
        assert_eq!(vars["a.b.c"], "deep");
        assert_eq!(vars["a.b.n"], "1");
    }
}
