//! `tn show` — display one material list and its current rows.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use tenon_core::error::LifecycleError;
use tenon_core::lifecycle::MaterialListStore;
use tenon_core::model::{LineItem, Project, Snapshot};

use crate::config::Config;
use crate::output::{OutputMode, human_kv, render};

use super::ListSummary;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Design order number the material list belongs to.
    pub order: String,
}

/// Full detail as emitted in JSON mode.
#[derive(Debug, Serialize)]
struct ShowReport {
    #[serde(flatten)]
    summary: ListSummary,
    projects: Vec<ShowProject>,
}

#[derive(Debug, Serialize)]
struct ShowProject {
    name: String,
    categories: Vec<LineItem>,
}

fn group_by_project(state: Snapshot) -> Vec<ShowProject> {
    state
        .projects
        .iter()
        .map(|project: &Project| ShowProject {
            name: project.name.clone(),
            categories: state
                .categories
                .iter()
                .filter(|item| item.project_id == project.id)
                .cloned()
                .collect(),
        })
        .collect()
}

fn write_human(report: &ShowReport, w: &mut dyn Write) -> io::Result<()> {
    human_kv(w, "order", &report.summary.order_number)?;
    human_kv(w, "status", &report.summary.status)?;
    if let Some(ref kind) = report.summary.quotation_type {
        human_kv(w, "quoted as", kind)?;
    }
    human_kv(w, "created by", &report.summary.created_by)?;
    human_kv(w, "created", &report.summary.created_at)?;
    human_kv(w, "updated", &report.summary.updated_at)?;
    if let Some(ref at) = report.summary.submitted_at {
        human_kv(w, "submitted", at)?;
    }
    for project in &report.projects {
        writeln!(w)?;
        writeln!(w, "{}", project.name)?;
        for item in &project.categories {
            let price = item
                .total_price
                .map_or_else(String::new, |total| format!("  = {total}"));
            writeln!(
                w,
                "  {} / {}  x{} {}{}",
                item.level1_category_name,
                item.level2_category_name,
                item.quantity,
                item.unit,
                price
            )?;
        }
    }
    Ok(())
}

/// Execute `tn show <order>`.
///
/// # Errors
///
/// Returns an error for an unknown order or a store failure.
pub fn run_show(args: &ShowArgs, config: &Config, output: OutputMode, root: &Path) -> Result<()> {
    let lifecycle = super::open_lifecycle(root, config)?;
    let list = lifecycle
        .store()
        .get_by_order(&args.order)?
        .ok_or_else(|| LifecycleError::NotFound(args.order.clone()))?;
    let state = lifecycle.store().load_current(list.id)?;

    let report = ShowReport {
        summary: ListSummary::from(&list),
        projects: group_by_project(state),
    };
    render(output, &report, |report, w| write_human(report, w))
}
