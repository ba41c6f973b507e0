//! JSON-blob persistence for lifecycle snapshots.
//!
//! A snapshot is a frozen copy of a material list's projects and line
//! items. It is written once per `(material_list_id, kind)` and a later
//! capture of the same kind overwrites it in place, so the table never
//! holds more than two rows per list.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tenon_core::model::{Snapshot, SnapshotKind};

use crate::material_list::fmt_ts;

/// Upsert one snapshot for the given list and kind.
///
/// # Errors
///
/// Returns an error if serialization or the SQL write fails.
pub fn write(
    conn: &Connection,
    material_list_id: i64,
    kind: SnapshotKind,
    snapshot: &Snapshot,
    at: DateTime<Utc>,
) -> Result<()> {
    let payload = serde_json::to_string(snapshot).context("serialize snapshot payload")?;
    conn.execute(
        "INSERT INTO snapshots (material_list_id, kind, payload_json, snapshot_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(material_list_id, kind) DO UPDATE SET
             payload_json = excluded.payload_json,
             snapshot_at = excluded.snapshot_at",
        params![material_list_id, kind.to_string(), payload, fmt_ts(at)],
    )
    .context("upsert snapshot")?;
    Ok(())
}

/// Load one snapshot, or `None` if that kind was never captured.
///
/// # Errors
///
/// Returns an error if the query or payload decoding fails.
pub fn load(
    conn: &Connection,
    material_list_id: i64,
    kind: SnapshotKind,
) -> Result<Option<Snapshot>> {
    let payload: Option<String> = conn
        .query_row(
            "SELECT payload_json FROM snapshots
             WHERE material_list_id = ?1 AND kind = ?2",
            params![material_list_id, kind.to_string()],
            |row| row.get(0),
        )
        .optional()
        .context("query snapshot")?;

    payload
        .map(|json| serde_json::from_str(&json).context("decode snapshot payload"))
        .transpose()
}
