//! Common utilities shared by the xfdashboard crates.
//!
//! - **Warnings** - deduplicated diagnostics routed through `tracing`
//! - **Paths** - XDG directory resolution and search-path helpers

pub mod paths;
pub mod warning;
