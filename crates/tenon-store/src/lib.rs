//! SQLite persistence for tenon.
//!
//! Runtime defaults are intentionally conservative:
//! - `journal_mode = WAL` to allow concurrent readers while a writer commits
//! - `busy_timeout = 5s` to reduce transient lock failures under contention
//! - `foreign_keys = ON` so project/line-item/snapshot rows cannot dangle
//!
//! The store is the transactional boundary of the lifecycle: a planned
//! [`tenon_core::lifecycle::Transition`] is applied in one SQLite
//! transaction — status, current rows, and snapshot together — guarded by
//! the `updated_at` compare-and-swap.

pub mod material_list;
pub mod migrations;
pub mod schema;
pub mod snapshot;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::{path::Path, time::Duration};

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A handle over one SQLite database holding material lists, their current
/// rows, and their snapshots.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Borrow the underlying connection (queries in tests and tooling).
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Open (or create) the store database, apply runtime pragmas, and migrate
/// the schema to the latest version.
///
/// # Errors
///
/// Returns an error if opening/configuring/migrating the database fails.
pub fn open_store(path: &Path) -> Result<Store> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create store directory {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("open store database {}", path.display()))?;

    configure_connection(&conn).context("configure sqlite pragmas")?;
    migrations::migrate(&mut conn).context("apply store migrations")?;

    Ok(Store { conn })
}

/// Open an in-memory store (tests).
///
/// # Errors
///
/// Returns an error if configuring or migrating the database fails.
pub fn open_in_memory() -> Result<Store> {
    let mut conn = Connection::open_in_memory().context("open in-memory store")?;
    configure_connection(&conn).context("configure sqlite pragmas")?;
    migrations::migrate(&mut conn).context("apply store migrations")?;
    Ok(Store { conn })
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}
