//! Domain logic for the missionboard campaign dashboard.
//!
//! This crate has no I/O. Campaign records are passed in by the caller and
//! every function here is a pure transformation over them, so the store
//! layer, the board session and the HTTP handlers all share one definition
//! of bucketing and reordering.

pub mod campaign;
pub mod error;
pub mod partition;
pub mod reorder;
pub mod roles;
pub mod types;
pub mod validation;
