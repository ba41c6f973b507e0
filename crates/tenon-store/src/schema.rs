//! Canonical SQLite schema for the tenon store.
//!
//! The schema is normalized for queryability:
//! - `material_lists` keeps the lifecycle record for each design order
//! - `quotation_projects` / `quotation_categories` hold the *current*
//!   (mutable) projects and line items
//! - `snapshots` holds the two immutable JSON-blob captures per list,
//!   keyed by kind so a re-capture overwrites in place
//! - `store_meta` tracks the schema version

/// Migration v1: lifecycle record, current rows, snapshots, metadata.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS material_lists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    order_number TEXT NOT NULL UNIQUE CHECK (length(trim(order_number)) > 0),
    status TEXT NOT NULL DEFAULT 'not_started'
        CHECK (status IN ('not_started', 'in_progress', 'revision', 'submitted', 'completed')),
    quotation_type TEXT
        CHECK (quotation_type IS NULL OR quotation_type IN ('dealer', 'owner')),
    created_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    submitted_at TEXT
);

CREATE TABLE IF NOT EXISTS quotation_projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    material_list_id INTEGER NOT NULL REFERENCES material_lists(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_quotation_projects_list
    ON quotation_projects(material_list_id, sort_order);

CREATE TABLE IF NOT EXISTS quotation_categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES quotation_projects(id) ON DELETE CASCADE,
    level1_category_id INTEGER NOT NULL DEFAULT 0,
    level1_category_name TEXT NOT NULL DEFAULT '',
    level2_category_id INTEGER NOT NULL DEFAULT 0,
    level2_category_name TEXT NOT NULL DEFAULT '',
    height REAL,
    width REAL,
    quantity REAL NOT NULL DEFAULT 0,
    unit TEXT NOT NULL DEFAULT '',
    material_id INTEGER,
    material_name TEXT,
    color_id INTEGER,
    color_name TEXT,
    remark TEXT,
    unit_price REAL,
    total_price REAL
);

CREATE INDEX IF NOT EXISTS idx_quotation_categories_project
    ON quotation_categories(project_id);

CREATE TABLE IF NOT EXISTS snapshots (
    material_list_id INTEGER NOT NULL REFERENCES material_lists(id) ON DELETE CASCADE,
    kind TEXT NOT NULL CHECK (kind IN ('submitted', 'revision')),
    payload_json TEXT NOT NULL,
    snapshot_at TEXT NOT NULL,
    PRIMARY KEY (material_list_id, kind)
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL
);

INSERT OR IGNORE INTO store_meta (id, schema_version) VALUES (1, 1);
";
