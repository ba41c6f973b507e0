//! tenon-core library.
//!
//! Domain model and pure logic for the quotation ("material list") attached
//! to a furniture design order: the lifecycle state machine that governs
//! save/submit/revise/complete transitions and the three-way comparison that
//! attributes every field change to the version that made it.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::LifecycleError`] inside the core; callers at
//!   I/O boundaries wrap with `anyhow::Result`.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod catalog;
pub mod compare;
pub mod error;
pub mod form;
pub mod lifecycle;
pub mod model;
pub mod validate;
