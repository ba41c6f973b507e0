//! Domain model: the material-list record, its lifecycle status, and the
//! hierarchical project/line-item shape the comparison engine operates on.

pub mod line_item;
pub mod material_list;

pub use line_item::{Field, FieldValue, LineItem, Project};
pub use material_list::{
    InvalidTransition, MaterialList, QuotationType, Snapshot, SnapshotKind, Status,
};
