//! Reusable line-level widgets shared by the dashboard panels.

pub mod bar;
pub mod header;
pub mod metrics;
