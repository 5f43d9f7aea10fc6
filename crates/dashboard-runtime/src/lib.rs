//! Runtime layer for the viewing dashboard.
//!
//! Owns the single current dataset and the interactive filter state, and
//! turns them into render-ready snapshots.

pub mod session;

pub use dashboard_core as core;
pub use dashboard_data as data;
pub use session::{DashboardSession, DashboardSnapshot, Filters};
