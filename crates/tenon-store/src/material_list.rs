//! SQLite-backed [`MaterialListStore`].
//!
//! Reads map rows to the typed `tenon-core` model (never raw rows at the
//! API boundary). [`Store::apply`] runs the whole planned transition in
//! one transaction: the `updated_at` compare-and-swap, the lifecycle
//! column updates, the current-row replacement, and the snapshot write
//! commit together or not at all.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use tenon_core::error::LifecycleError;
use tenon_core::lifecycle::{MaterialListStore, Transition};
use tenon_core::model::{
    LineItem, MaterialList, Project, QuotationType, Snapshot, SnapshotKind, Status,
};

use crate::{Store, snapshot};

/// Timestamp encoding used everywhere in the store. Microsecond precision
/// keeps the compare-and-swap token stable across a write/read cycle.
pub(crate) fn fmt_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .with_context(|| format!("malformed stored timestamp {raw:?}"))
}

fn store_err(err: impl std::fmt::Display) -> LifecycleError {
    LifecycleError::Store(err.to_string())
}

const LIST_COLUMNS: &str = "id, order_number, status, quotation_type, \
     created_by, created_at, updated_at, submitted_at";

fn row_to_material_list(row: &Row<'_>) -> Result<MaterialList> {
    let status: String = row.get("status").context("read status column")?;
    let quotation_type: Option<String> = row
        .get("quotation_type")
        .context("read quotation_type column")?;
    let created_at: String = row.get("created_at").context("read created_at column")?;
    let updated_at: String = row.get("updated_at").context("read updated_at column")?;
    let submitted_at: Option<String> = row
        .get("submitted_at")
        .context("read submitted_at column")?;

    Ok(MaterialList {
        id: row.get("id").context("read id column")?,
        order_number: row
            .get("order_number")
            .context("read order_number column")?,
        status: Status::from_str(&status).context("decode status column")?,
        quotation_type: quotation_type
            .as_deref()
            .map(QuotationType::from_str)
            .transpose()
            .context("decode quotation_type column")?,
        created_by: row.get("created_by").context("read created_by column")?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
        submitted_at: submitted_at.as_deref().map(parse_ts).transpose()?,
    })
}

fn row_to_line_item(row: &Row<'_>) -> rusqlite::Result<LineItem> {
    Ok(LineItem {
        id: row.get(0)?,
        project_id: row.get(1)?,
        level1_category_id: row.get(2)?,
        level1_category_name: row.get(3)?,
        level2_category_id: row.get(4)?,
        level2_category_name: row.get(5)?,
        height: row.get(6)?,
        width: row.get(7)?,
        quantity: row.get(8)?,
        unit: row.get(9)?,
        material_id: row.get(10)?,
        material_name: row.get(11)?,
        color_id: row.get(12)?,
        color_name: row.get(13)?,
        remark: row.get(14)?,
        unit_price: row.get(15)?,
        total_price: row.get(16)?,
    })
}

fn load_current_inner(conn: &Connection, material_list_id: i64) -> Result<Snapshot> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, sort_order FROM quotation_projects
             WHERE material_list_id = ?1
             ORDER BY sort_order, id",
        )
        .context("prepare project query")?;
    let projects = stmt
        .query_map(params![material_list_id], |row| {
            Ok(Project {
                id: row.get(0)?,
                name: row.get(1)?,
                sort_order: row.get(2)?,
            })
        })
        .context("query projects")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("decode project rows")?;

    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.project_id,
                    c.level1_category_id, c.level1_category_name,
                    c.level2_category_id, c.level2_category_name,
                    c.height, c.width, c.quantity, c.unit,
                    c.material_id, c.material_name, c.color_id, c.color_name,
                    c.remark, c.unit_price, c.total_price
             FROM quotation_categories c
             JOIN quotation_projects p ON p.id = c.project_id
             WHERE p.material_list_id = ?1
             ORDER BY p.sort_order, p.id, c.id",
        )
        .context("prepare line-item query")?;
    let categories = stmt
        .query_map(params![material_list_id], row_to_line_item)
        .context("query line items")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("decode line-item rows")?;

    Ok(Snapshot {
        projects,
        categories,
    })
}

/// Replace the current projects and line items wholesale.
///
/// Row ids are reissued by SQLite on every replace; identity across edits
/// comes from the category-id match key, not from row ids.
fn replace_current_rows(conn: &Connection, material_list_id: i64, state: &Snapshot) -> Result<()> {
    conn.execute(
        "DELETE FROM quotation_projects WHERE material_list_id = ?1",
        params![material_list_id],
    )
    .context("clear current projects")?;

    let mut project_ids: HashMap<i64, i64> = HashMap::with_capacity(state.projects.len());
    for project in &state.projects {
        conn.execute(
            "INSERT INTO quotation_projects (material_list_id, name, sort_order)
             VALUES (?1, ?2, ?3)",
            params![material_list_id, project.name, project.sort_order],
        )
        .with_context(|| format!("insert project {:?}", project.name))?;
        project_ids.insert(project.id, conn.last_insert_rowid());
    }

    for item in &state.categories {
        let project_id = project_ids
            .get(&item.project_id)
            .with_context(|| format!("line item references unknown project {}", item.project_id))?;
        conn.execute(
            "INSERT INTO quotation_categories (
                 project_id,
                 level1_category_id, level1_category_name,
                 level2_category_id, level2_category_name,
                 height, width, quantity, unit,
                 material_id, material_name, color_id, color_name,
                 remark, unit_price, total_price
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                project_id,
                item.level1_category_id,
                item.level1_category_name,
                item.level2_category_id,
                item.level2_category_name,
                item.height,
                item.width,
                item.quantity,
                item.unit,
                item.material_id,
                item.material_name,
                item.color_id,
                item.color_name,
                item.remark,
                item.unit_price,
                item.total_price,
            ],
        )
        .context("insert line item")?;
    }

    Ok(())
}

fn apply_inner(conn: &mut Connection, transition: &Transition) -> Result<MaterialList, LifecycleError> {
    let tx = conn.transaction().map_err(store_err)?;

    let stored_updated_at: Option<String> = tx
        .query_row(
            "SELECT updated_at FROM material_lists WHERE id = ?1",
            params![transition.material_list_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(store_err)?;
    let stored_updated_at = stored_updated_at.ok_or_else(|| {
        LifecycleError::NotFound(format!("material list #{}", transition.material_list_id))
    })?;

    if parse_ts(&stored_updated_at).map_err(store_err)? != transition.expected_updated_at {
        return Err(LifecycleError::Conflict);
    }

    tx.execute(
        "UPDATE material_lists SET
             status = COALESCE(?2, status),
             quotation_type = COALESCE(?3, quotation_type),
             submitted_at = COALESCE(?4, submitted_at),
             updated_at = ?5
         WHERE id = ?1",
        params![
            transition.material_list_id,
            transition.new_status.map(|status| status.to_string()),
            transition.quotation_type.map(|kind| kind.to_string()),
            transition.submitted_at.map(fmt_ts),
            fmt_ts(transition.now),
        ],
    )
    .map_err(store_err)?;

    if let Some(state) = &transition.replace_current {
        replace_current_rows(&tx, transition.material_list_id, state).map_err(store_err)?;
    }

    if let Some((kind, state)) = &transition.write_snapshot {
        snapshot::write(&tx, transition.material_list_id, *kind, state, transition.now)
            .map_err(store_err)?;
    }

    let list = tx
        .query_row(
            &format!("SELECT {LIST_COLUMNS} FROM material_lists WHERE id = ?1"),
            params![transition.material_list_id],
            |row| Ok(row_to_material_list(row)),
        )
        .map_err(store_err)?
        .map_err(store_err)?;

    tx.commit().map_err(store_err)?;

    debug!(
        material_list_id = transition.material_list_id,
        status = %list.status,
        "transition applied"
    );
    Ok(list)
}

impl MaterialListStore for Store {
    fn get_by_order(&self, order_number: &str) -> Result<Option<MaterialList>, LifecycleError> {
        self.conn
            .query_row(
                &format!("SELECT {LIST_COLUMNS} FROM material_lists WHERE order_number = ?1"),
                params![order_number],
                |row| Ok(row_to_material_list(row)),
            )
            .optional()
            .map_err(store_err)?
            .transpose()
            .map_err(store_err)
    }

    fn create(
        &mut self,
        order_number: &str,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<MaterialList, LifecycleError> {
        self.conn
            .execute(
                "INSERT INTO material_lists
                     (order_number, status, created_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![
                    order_number,
                    Status::NotStarted.to_string(),
                    created_by,
                    fmt_ts(now),
                ],
            )
            .map_err(store_err)?;

        let id = self.conn.last_insert_rowid();
        debug!(material_list_id = id, order_number, "material list created");

        // Round-trip through fmt_ts so the in-memory token matches the
        // stored one on the next compare-and-swap.
        let now = parse_ts(&fmt_ts(now)).map_err(store_err)?;
        Ok(MaterialList {
            id,
            order_number: order_number.to_owned(),
            status: Status::NotStarted,
            quotation_type: None,
            created_by: created_by.to_owned(),
            created_at: now,
            updated_at: now,
            submitted_at: None,
        })
    }

    fn load_current(&self, material_list_id: i64) -> Result<Snapshot, LifecycleError> {
        load_current_inner(&self.conn, material_list_id).map_err(store_err)
    }

    fn load_snapshot(
        &self,
        material_list_id: i64,
        kind: SnapshotKind,
    ) -> Result<Option<Snapshot>, LifecycleError> {
        snapshot::load(&self.conn, material_list_id, kind).map_err(store_err)
    }

    fn apply(&mut self, transition: &Transition) -> Result<MaterialList, LifecycleError> {
        apply_inner(&mut self.conn, transition)
    }
}

#[cfg(test)]
mod tests {
    use super::{fmt_ts, parse_ts};
    use chrono::{TimeZone, Utc};

    #[test]
    fn timestamps_roundtrip_at_micros() {
        let at = Utc.with_ymd_and_hms(2024, 3, 14, 9, 26, 53).unwrap()
            + chrono::Duration::microseconds(589_793);
        assert_eq!(parse_ts(&fmt_ts(at)).expect("parse"), at);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_ts("yesterday").is_err());
    }
}
