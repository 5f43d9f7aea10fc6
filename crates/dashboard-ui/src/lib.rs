//! Terminal UI layer for the viewing dashboard.
//!
//! Provides themes, the header and bar components, chart panels, the
//! hour × weekday heatmap, the plain-text report and the interactive event
//! loop built on top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod dashboard_view;
pub mod heatmap;
pub mod report;
pub mod themes;

pub use dashboard_runtime as runtime;
