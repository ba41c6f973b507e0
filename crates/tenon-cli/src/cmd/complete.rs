//! `tn complete` — close a quotation for good.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;

pub use super::submit::OrderArgs;

use crate::config::Config;
use crate::output::OutputMode;

/// Execute `tn complete <order>`.
///
/// `completed` is terminal; no command reopens the list afterwards.
///
/// # Errors
///
/// Returns an error if the list was never submitted, is not currently
/// `submitted`, or the store write fails.
pub fn run_complete(
    args: &OrderArgs,
    config: &Config,
    output: OutputMode,
    root: &Path,
) -> Result<()> {
    let mut lifecycle = super::open_lifecycle(root, config)?;
    let list = lifecycle.complete(&args.order, Utc::now())?;
    super::render_summary(output, &list)
}
