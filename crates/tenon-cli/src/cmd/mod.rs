//! Command handlers for the `tn` binary.

pub mod compare;
pub mod complete;
pub mod init;
pub mod quote;
pub mod revise;
pub mod save;
pub mod show;
pub mod submit;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::Path;

use tenon_core::error::ErrorCode;
use tenon_core::lifecycle::Lifecycle;
use tenon_core::model::MaterialList;
use tenon_store::{Store, open_store};

use crate::config::{Config, tenon_dir};
use crate::output::{CliError, OutputMode, human_kv, render};

/// Open the workspace store and wrap it in the lifecycle engine.
///
/// # Errors
///
/// Fails with `E1001` when the workspace was never initialized, or when
/// the database cannot be opened.
pub fn open_lifecycle(root: &Path, config: &Config) -> Result<Lifecycle<Store>> {
    if !tenon_dir(root).exists() {
        let code = ErrorCode::NotInitialized;
        return Err(CliError {
            message: format!("no {} directory under {}", crate::config::TENON_DIR, root.display()),
            code: code.code().to_owned(),
            hint: code.hint().map(str::to_owned),
        }
        .into());
    }
    let store = open_store(&config.db_path(root))?;
    Ok(Lifecycle::new(store))
}

fn fmt_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One material list as shown after a lifecycle command.
#[derive(Debug, Serialize)]
pub struct ListSummary {
    pub order_number: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotation_type: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

impl From<&MaterialList> for ListSummary {
    fn from(list: &MaterialList) -> Self {
        Self {
            order_number: list.order_number.clone(),
            status: list.status.to_string(),
            quotation_type: list.quotation_type.map(|kind| kind.to_string()),
            created_by: list.created_by.clone(),
            created_at: fmt_ts(list.created_at),
            updated_at: fmt_ts(list.updated_at),
            submitted_at: list.submitted_at.map(fmt_ts),
        }
    }
}

/// Render the post-command summary in the requested output mode.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn render_summary(mode: OutputMode, list: &MaterialList) -> Result<()> {
    let summary = ListSummary::from(list);
    render(mode, &summary, |s, w| {
        human_kv(w, "order", &s.order_number)?;
        human_kv(w, "status", &s.status)?;
        if let Some(ref kind) = s.quotation_type {
            human_kv(w, "quoted as", kind)?;
        }
        human_kv(w, "updated", &s.updated_at)?;
        if let Some(ref at) = s.submitted_at {
            human_kv(w, "submitted", at)?;
        }
        Ok(())
    })
}

/// Read a whole file, or stdin when the path is `-`.
///
/// # Errors
///
/// Propagates I/O failures with the offending path in context.
pub fn read_input(path: &Path) -> Result<String> {
    use anyhow::Context as _;
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
            .context("read form from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read file {}", path.display()))
    }
}
