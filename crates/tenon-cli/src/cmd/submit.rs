//! `tn submit`, `tn revise`, `tn complete` — status-only transitions.
//!
//! All three share one argument shape; `revise` and `complete` live in
//! sibling modules that re-export [`OrderArgs`].

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use std::path::Path;

use crate::config::Config;
use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Design order number the material list belongs to.
    pub order: String,
}

/// Execute `tn submit <order>`.
///
/// Validates the persisted current state, freezes it as the `submitted`
/// snapshot, and stamps `submitted_at` on the first submission.
///
/// # Errors
///
/// Returns an error for incomplete line items, an invalid transition, or a
/// store failure.
pub fn run_submit(args: &OrderArgs, config: &Config, output: OutputMode, root: &Path) -> Result<()> {
    let mut lifecycle = super::open_lifecycle(root, config)?;
    let list = lifecycle.submit(&args.order, Utc::now())?;
    super::render_summary(output, &list)
}
