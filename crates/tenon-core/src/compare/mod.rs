//! Three-way comparison of a material list's current state against its
//! `submitted` and `revision` snapshots.
//!
//! The pipeline is: flatten each version into [`rows::FlatRow`]s, align them
//! across versions by the structural [`rows::match_key`], then classify every
//! field of every aligned row with [`attribute::attribute`] so the viewer can
//! show *who* changed a value without merging anything.

pub mod attribute;
pub mod normalize;
pub mod rows;

pub use attribute::{ChangeSource, attribute};
pub use normalize::{is_blank, normalized, normalized_eq};
pub use rows::{CompareRow, FlatRow, RowKey, build_comparison_rows, flatten_snapshot, match_key};
