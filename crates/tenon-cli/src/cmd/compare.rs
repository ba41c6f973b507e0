//! `tn compare` — three-way change attribution for a material list.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use tenon_core::compare::{ChangeSource, CompareRow, RowKey, normalized};
use tenon_core::model::Field;

use crate::config::Config;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Design order number the material list belongs to.
    pub order: String,

    /// Also list rows and fields with no change.
    #[arg(long)]
    pub all: bool,
}

/// One field of one row, classified.
#[derive(Debug, Serialize)]
struct FieldReport {
    field: String,
    source: ChangeSource,
    submitted: String,
    revision: String,
    current: String,
}

/// One comparison row as emitted in JSON mode.
#[derive(Debug, Serialize)]
struct RowReport {
    key: RowKey,
    label: String,
    deleted: bool,
    fields: Vec<FieldReport>,
}

fn row_label(row: &CompareRow) -> String {
    let flat = row
        .current
        .as_ref()
        .or(row.submitted.as_ref())
        .or(row.revision.as_ref());
    flat.map_or_else(String::new, |flat| {
        format!(
            "{} / {} / {}",
            flat.project_name, flat.item.level1_category_name, flat.item.level2_category_name
        )
    })
}

fn report_row(row: &CompareRow, include_unchanged: bool) -> RowReport {
    let fields = Field::ALL
        .into_iter()
        .filter_map(|field| {
            let source = row.attribute(field);
            if source == ChangeSource::None && !include_unchanged {
                return None;
            }
            Some(FieldReport {
                field: field.to_string(),
                source,
                submitted: normalized(row.submitted.as_ref().map(|f| f.item.field(field))),
                revision: normalized(row.revision.as_ref().map(|f| f.item.field(field))),
                current: normalized(row.current.as_ref().map(|f| f.item.field(field))),
            })
        })
        .collect();
    RowReport {
        key: row.key.clone(),
        label: row_label(row),
        deleted: row.deleted,
        fields,
    }
}

fn write_human(reports: &[RowReport], w: &mut dyn Write) -> io::Result<()> {
    let mut printed = false;
    for report in reports {
        if report.fields.is_empty() && !report.deleted {
            continue;
        }
        if printed {
            writeln!(w)?;
        }
        printed = true;
        if report.deleted {
            writeln!(w, "{}  [deleted]", report.label)?;
        } else {
            writeln!(w, "{}", report.label)?;
        }
        for field in &report.fields {
            writeln!(
                w,
                "  {:<22} {:>10} | {:>10} | {:>10}  ({})",
                field.field, field.submitted, field.revision, field.current, field.source
            )?;
        }
    }
    if !printed {
        writeln!(w, "no changes")?;
    }
    Ok(())
}

/// Execute `tn compare <order>`.
///
/// Shows, per field, whether the difference came from the revision, from
/// edits after the revision, or both. By default only rows with at least
/// one change (or a deleted row) are listed; `--all` includes everything.
///
/// # Errors
///
/// Returns an error for an unknown order or a store failure. Lists that
/// were never submitted still compare; every non-blank value then reads as
/// a current-side change.
pub fn run_compare(
    args: &CompareArgs,
    config: &Config,
    output: OutputMode,
    root: &Path,
) -> Result<()> {
    let lifecycle = super::open_lifecycle(root, config)?;
    let rows = lifecycle.comparison(&args.order)?;
    let reports: Vec<RowReport> = rows
        .iter()
        .map(|row| report_row(row, args.all))
        .collect();
    render(output, &reports, |reports, w| write_human(reports, w))
}

#[cfg(test)]
mod tests {
    use super::{CompareArgs, report_row, write_human};
    use clap::Parser;
    use tenon_core::compare::{CompareRow, FlatRow, RowKey};
    use tenon_core::model::LineItem;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: CompareArgs,
    }

    fn flat(quantity: f64) -> FlatRow {
        FlatRow {
            project_name: "主卧".to_owned(),
            item: LineItem {
                level1_category_id: 1,
                level1_category_name: "柜体".to_owned(),
                level2_category_id: 11,
                level2_category_name: "衣柜".to_owned(),
                quantity,
                ..LineItem::default()
            },
        }
    }

    #[test]
    fn all_flag_parses() {
        let harness = Harness::parse_from(["compare", "DD-1", "--all"]);
        assert!(harness.args.all);
    }

    #[test]
    fn unchanged_fields_are_filtered_by_default() {
        let row = CompareRow {
            key: RowKey::Match("主卧-1-11".to_owned()),
            current: Some(flat(5.0)),
            submitted: Some(flat(2.0)),
            revision: Some(flat(2.0)),
            deleted: false,
        };
        let report = report_row(&row, false);
        assert_eq!(report.fields.len(), 1);
        assert_eq!(report.fields[0].field, "quantity");
        assert_eq!(report.fields[0].current, "5");

        let full = report_row(&row, true);
        assert_eq!(full.fields.len(), 11);
    }

    #[test]
    fn human_output_marks_deleted_rows() {
        let row = CompareRow {
            key: RowKey::Match("主卧-1-11".to_owned()),
            current: None,
            submitted: Some(flat(2.0)),
            revision: None,
            deleted: true,
        };
        let report = report_row(&row, false);
        let mut buf = Vec::new();
        write_human(&[report], &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("[deleted]"));
    }

    #[test]
    fn empty_report_prints_no_changes() {
        let mut buf = Vec::new();
        write_human(&[], &mut buf).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "no changes\n");
    }
}
