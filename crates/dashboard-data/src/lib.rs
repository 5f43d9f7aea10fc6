//! Data layer for the viewing dashboard.
//!
//! Reads the exported CSV tables (from a directory or a `.zip` export),
//! normalizes and classifies viewing rows, and computes every aggregate the
//! renderer draws.

pub mod aggregator;
pub mod classifier;
pub mod loader;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;

pub use dashboard_core as core;
pub use pipeline::{build_dataset, Dataset, LoadStats};
