//! Workspace configuration (`.tenon/config.toml`).
//!
//! Every field has a default, so a missing file or a partial file both
//! load cleanly. Relative paths resolve against the `.tenon/` directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tenon_core::model::QuotationType;

/// Name of the workspace directory created by `tn init`.
pub const TENON_DIR: &str = ".tenon";

/// The `.tenon/` directory under a workspace root.
#[must_use]
pub fn tenon_dir(root: &Path) -> PathBuf {
    root.join(TENON_DIR)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub quote: QuoteConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file, relative to `.tenon/`.
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Category/material catalog file, relative to `.tenon/`.
    #[serde(default = "default_catalog")]
    pub catalog: String,
    /// Quotation type used when `tn quote` is run without `--type`.
    #[serde(default)]
    pub default_type: Option<QuotationType>,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            default_type: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Recorded as `created_by` when a material list is first saved.
    #[serde(default = "default_created_by")]
    pub created_by: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            created_by: default_created_by(),
        }
    }
}

fn default_database() -> String {
    "tenon.sqlite3".to_owned()
}

fn default_catalog() -> String {
    "catalog.json".to_owned()
}

fn default_created_by() -> String {
    "designer".to_owned()
}

impl Config {
    /// Load `.tenon/config.toml` under the given root, falling back to
    /// defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = tenon_dir(root).join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse config file {}", path.display()))
    }

    /// Serialize this config to TOML (used by `tn init`).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize config")
    }

    /// Absolute-or-workspace-relative path to the database file.
    #[must_use]
    pub fn db_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.store.database)
    }

    /// Absolute-or-workspace-relative path to the catalog file.
    #[must_use]
    pub fn catalog_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.quote.catalog)
    }
}

fn resolve(root: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        tenon_dir(root).join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use std::path::Path;
    use tenon_core::model::QuotationType;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: Config = toml::from_str("").expect("parse empty config");
        assert_eq!(config.store.database, "tenon.sqlite3");
        assert_eq!(config.identity.created_by, "designer");
        assert_eq!(config.quote.default_type, None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            "[quote]\ndefault_type = \"owner\"\n",
        )
        .expect("parse partial config");
        assert_eq!(config.quote.default_type, Some(QuotationType::Owner));
        assert_eq!(config.quote.catalog, "catalog.json");
    }

    #[test]
    fn relative_paths_resolve_under_tenon_dir() {
        let config = Config::default();
        let db = config.db_path(Path::new("/work"));
        assert_eq!(db, Path::new("/work/.tenon/tenon.sqlite3"));
    }

    #[test]
    fn absolute_paths_pass_through() {
        let mut config = Config::default();
        config.store.database = "/var/lib/tenon.sqlite3".to_owned();
        let db = config.db_path(Path::new("/work"));
        assert_eq!(db, Path::new("/var/lib/tenon.sqlite3"));
    }

    #[test]
    fn default_config_roundtrips_through_toml() {
        let rendered = Config::default().to_toml().expect("serialize");
        let parsed: Config = toml::from_str(&rendered).expect("reparse");
        assert_eq!(parsed.store.database, "tenon.sqlite3");
    }
}
