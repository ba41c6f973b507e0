//! `tn revise` — pull a submitted quotation back for clerk edits.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;

pub use super::submit::OrderArgs;

use crate::config::Config;
use crate::output::OutputMode;

/// Execute `tn revise <order>`.
///
/// Freezes the current state as the `revision` baseline and reopens the
/// list for editing.
///
/// # Errors
///
/// Returns an error if the list was never submitted, is not currently
/// `submitted`, or the store write fails.
pub fn run_revise(args: &OrderArgs, config: &Config, output: OutputMode, root: &Path) -> Result<()> {
    let mut lifecycle = super::open_lifecycle(root, config)?;
    let list = lifecycle.revise(&args.order, Utc::now())?;
    super::render_summary(output, &list)
}
