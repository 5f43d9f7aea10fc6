//! Shared foundation for the viewing dashboard.
//!
//! Holds the record types flowing through the pipeline, the error taxonomy,
//! the fixed policy constants, CLI settings, display formatting, time parsing
//! helpers and the ISO country-code lookup table.

pub mod countries;
pub mod error;
pub mod formatting;
pub mod models;
pub mod policy;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
