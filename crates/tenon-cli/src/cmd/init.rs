//! `tn init` — create the `.tenon/` workspace skeleton.

use anyhow::{Context as _, Result};
use clap::Args;
use std::path::Path;

use crate::config::{Config, tenon_dir};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.tenon/` already exists.
    #[arg(long)]
    pub force: bool,
}

/// Execute `tn init`. Creates the workspace skeleton:
///
/// ```text
/// .tenon/
///   config.toml       (default workspace config)
///   tenon.sqlite3     (empty store, schema migrated)
///   catalog.json      (empty catalog template, only if absent)
/// ```
///
/// # Errors
///
/// Returns an error if `.tenon/` already exists and `--force` is not set,
/// or if any filesystem or database operation fails.
pub fn run_init(args: &InitArgs, root: &Path) -> Result<()> {
    let dir = tenon_dir(root);

    if dir.exists() && !args.force {
        anyhow::bail!(".tenon/ already exists. Use `tn init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create workspace directory {}", dir.display()))?;

    let config = Config::default();
    let config_path = dir.join("config.toml");
    std::fs::write(&config_path, config.to_toml()?)
        .with_context(|| format!("write config file {}", config_path.display()))?;

    // Opening the store creates the database and migrates the schema.
    tenon_store::open_store(&config.db_path(root))?;

    let catalog_path = config.catalog_path(root);
    if !catalog_path.exists() {
        let empty = tenon_core::catalog::Catalog::default();
        std::fs::write(&catalog_path, serde_json::to_string_pretty(&empty)?)
            .with_context(|| format!("write catalog template {}", catalog_path.display()))?;
    }

    println!("Initialized tenon workspace in {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{InitArgs, run_init};

    #[test]
    fn init_creates_config_store_and_catalog() {
        let dir = tempfile::tempdir().expect("create temp dir");
        run_init(&InitArgs { force: false }, dir.path()).expect("init");

        let tenon = dir.path().join(".tenon");
        assert!(tenon.join("config.toml").exists());
        assert!(tenon.join("tenon.sqlite3").exists());
        assert!(tenon.join("catalog.json").exists());
    }

    #[test]
    fn second_init_requires_force() {
        let dir = tempfile::tempdir().expect("create temp dir");
        run_init(&InitArgs { force: false }, dir.path()).expect("init");
        assert!(run_init(&InitArgs { force: false }, dir.path()).is_err());
        run_init(&InitArgs { force: true }, dir.path()).expect("forced init");
    }
}
