//! Map view controller for FTTH network dashboards
//!
//! This crate plots customers, ODPs (optical distribution points) and ODCs
//! (optical distribution cabinets) from a dashboard backend onto a map
//! widget, and drives the controls around it.
//!
//! # Features
//!
//! - Concurrent loading of network counters and the three marker categories
//! - Atomic per-category marker rebuilds; failed loads keep the last good set
//! - Stale responses from overlapping refreshes are discarded
//! - Layer toggles (ODP+ODC, customers) and a customer status filter
//! - Map widget and presentation reached only through the [`map::MapSurface`]
//!   and [`display::Display`] ports

pub mod client;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod logging;
pub mod map;

// Test support modules
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export main types for convenience
pub use config::NetMapConfig;
pub use controller::{LoadOutcome, MapSnapshot, MapViewController, RefreshReport, StatusFilter};
pub use error::{NetMapError, Result};
