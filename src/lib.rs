//! State model for a workflow run grid: runs as columns, a collapsible task
//! hierarchy as rows, one status cell per (run, task).

pub mod config;
pub mod error;
pub mod grid;
pub mod model;
pub mod render;
pub mod store;
