//! `tn save` — persist the designer's current form state.

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use std::path::{Path, PathBuf};

use tenon_core::form::{FormProject, materialize};

use crate::config::Config;
use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Design order number the material list belongs to.
    pub order: String,

    /// JSON form file (array of projects with their line items), `-` for stdin.
    #[arg(long, short = 'f', default_value = "-")]
    pub file: PathBuf,

    /// Record a different author than the configured identity.
    #[arg(long)]
    pub by: Option<String>,
}

/// Execute `tn save <order> --file form.json`.
///
/// The first save creates the material list and moves it to `in_progress`;
/// a save during revision keeps the `revision` status.
///
/// # Errors
///
/// Returns an error if the form cannot be read or parsed, the list is not
/// editable, or the store write fails.
pub fn run_save(args: &SaveArgs, config: &Config, output: OutputMode, root: &Path) -> Result<()> {
    let raw = super::read_input(&args.file)?;
    let projects: Vec<FormProject> =
        serde_json::from_str(&raw).context("parse form JSON (expected an array of projects)")?;
    let state = materialize(&projects);

    let created_by = args.by.as_deref().unwrap_or(&config.identity.created_by);

    let mut lifecycle = super::open_lifecycle(root, config)?;
    let list = lifecycle.save(&args.order, created_by, state, Utc::now())?;
    super::render_summary(output, &list)
}
