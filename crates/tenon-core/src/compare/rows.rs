//! Row alignment across the three compared versions.
//!
//! Raw ids are not comparable across current/submitted/revision (snapshots
//! are captured by value and a revision may carry a re-minted id space), so
//! logical identity is the structural triple
//! `(project_name, level1_category_id, level2_category_id)`. The triple is
//! deliberately lossy: two physical rows sharing it are indistinguishable,
//! and the viewer's attribution semantics depend on exactly this key.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::attribute::{ChangeSource, attribute};
use crate::model::{Field, LineItem, Snapshot};

/// A line item flattened out of its project, stamped with the project name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub project_name: String,
    pub item: LineItem,
}

/// How a comparison row is identified in the union of keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    /// The structural matching key, shared across versions.
    Match(String),
    /// Positional fallback for a current-side row whose key parts are all
    /// blank. Such rows are kept (never dropped) but match nothing.
    Index(usize),
}

/// One renderable comparison row: the zero-or-one row from each version
/// gathered under one logical key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRow {
    pub key: RowKey,
    pub current: Option<FlatRow>,
    pub submitted: Option<FlatRow>,
    pub revision: Option<FlatRow>,
    /// Present in an old version but gone from current.
    pub deleted: bool,
}

impl CompareRow {
    /// Classify one field of this row.
    #[must_use]
    pub fn attribute(&self, field: Field) -> ChangeSource {
        attribute(
            field,
            self.submitted.as_ref().map(|row| &row.item),
            self.revision.as_ref().map(|row| &row.item),
            self.current.as_ref().map(|row| &row.item),
        )
    }
}

/// Render the structural matching key for a row.
///
/// Unset category ids (0) render as empty segments so a wholly blank row
/// yields the invalid key `"--"`, which routes it to positional fallback.
#[must_use]
pub fn match_key(row: &FlatRow) -> String {
    format!(
        "{}-{}-{}",
        row.project_name,
        id_segment(row.item.level1_category_id),
        id_segment(row.item.level2_category_id),
    )
}

fn id_segment(id: i64) -> String {
    if id == 0 { String::new() } else { id.to_string() }
}

fn key_is_valid(key: &str) -> bool {
    !key.trim().is_empty() && key != "--"
}

/// Flatten a snapshot into rows: projects joined to their line items on
/// `project_id`, in project order then item order.
#[must_use]
pub fn flatten_snapshot(snapshot: &Snapshot) -> Vec<FlatRow> {
    let mut rows = Vec::with_capacity(snapshot.categories.len());
    for project in &snapshot.projects {
        for category in snapshot
            .categories
            .iter()
            .filter(|category| category.project_id == project.id)
        {
            rows.push(FlatRow {
                project_name: project.name.clone(),
                item: category.clone(),
            });
        }
    }
    rows
}

/// Assemble the three-way comparison rows.
///
/// The output order is the insertion order of the union of keys: current
/// rows first, then submitted, then revision. Keys are never dropped or
/// duplicated; current rows with blank keys survive under positional
/// fallback keys.
#[must_use]
pub fn build_comparison_rows(
    current: &[FlatRow],
    submitted: Option<&Snapshot>,
    revision: Option<&Snapshot>,
) -> Vec<CompareRow> {
    let submitted_rows = submitted.map(flatten_snapshot).unwrap_or_default();
    let revision_rows = revision.map(flatten_snapshot).unwrap_or_default();

    let mut keys: Vec<RowKey> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, row) in current.iter().enumerate() {
        let key = match_key(row);
        if key_is_valid(&key) {
            if seen.insert(key.clone()) {
                keys.push(RowKey::Match(key));
            }
        } else {
            keys.push(RowKey::Index(index));
        }
    }
    for row in submitted_rows.iter().chain(revision_rows.iter()) {
        let key = match_key(row);
        if key_is_valid(&key) && seen.insert(key.clone()) {
            keys.push(RowKey::Match(key));
        }
    }

    keys.into_iter()
        .map(|key| {
            let (current_row, submitted_row, revision_row) = match &key {
                RowKey::Match(wanted) => (
                    find_by_key(current, wanted),
                    find_by_key(&submitted_rows, wanted),
                    find_by_key(&revision_rows, wanted),
                ),
                // the key was blank, so there is nothing to match against
                RowKey::Index(index) => (current.get(*index).cloned(), None, None),
            };
            let deleted =
                current_row.is_none() && (submitted_row.is_some() || revision_row.is_some());
            CompareRow {
                key,
                current: current_row,
                submitted: submitted_row,
                revision: revision_row,
                deleted,
            }
        })
        .collect()
}

fn find_by_key(rows: &[FlatRow], wanted: &str) -> Option<FlatRow> {
    rows.iter().find(|row| match_key(row) == wanted).cloned()
}
