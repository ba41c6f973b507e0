//! `tn quote` — price a submitted material list from the catalog.

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use std::path::Path;
use std::str::FromStr;

use tenon_core::catalog::Catalog;
use tenon_core::model::QuotationType;

use crate::config::Config;
use crate::output::{CliError, OutputMode};

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Design order number the material list belongs to.
    pub order: String,

    /// Quotation type: `dealer` or `owner`. Defaults to the configured one.
    #[arg(long = "type", value_name = "TYPE")]
    pub quotation_type: Option<String>,
}

/// Execute `tn quote <order> --type dealer`.
///
/// Looks up every line item's unit price for the chosen quotation type
/// (missing catalog prices quote as zero) and stores the priced state.
///
/// # Errors
///
/// Returns an error when no quotation type is given or configured, when
/// the catalog file cannot be read, when the list is not `submitted`, or
/// when the store write fails.
pub fn run_quote(args: &QuoteArgs, config: &Config, output: OutputMode, root: &Path) -> Result<()> {
    let quotation_type = match &args.quotation_type {
        Some(raw) => QuotationType::from_str(raw).map_err(|err| {
            let code = tenon_core::error::ErrorCode::InvalidEnumValue;
            CliError {
                message: err.to_string(),
                code: code.code().to_owned(),
                hint: code.hint().map(str::to_owned),
            }
        })?,
        None => config
            .quote
            .default_type
            .context("no --type given and no [quote] default_type configured")?,
    };

    let catalog_path = config.catalog_path(root);
    let raw = std::fs::read_to_string(&catalog_path)
        .with_context(|| format!("read catalog file {}", catalog_path.display()))?;
    let catalog: Catalog = serde_json::from_str(&raw)
        .with_context(|| format!("parse catalog file {}", catalog_path.display()))?;

    let mut lifecycle = super::open_lifecycle(root, config)?;
    let list = lifecycle.quote(&args.order, &catalog, quotation_type, Utc::now())?;
    super::render_summary(output, &list)
}
