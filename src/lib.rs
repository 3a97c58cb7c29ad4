//! Helios plasma & magnetic field data against the interplanetary shock
//! catalogue
//!
//! A two-stage offline pipeline:
//! 1. `helios-ingest` merges the fixed-layout instrument files into a single
//!    time-sorted measurement table and normalizes the shock catalogue, both
//!    persisted as CSV,
//! 2. `shock-plots` reads the CSV tables back and renders, for each shock, a
//!    multi-panel figure of the plasma and field variables around the shock
//!    time, with gap-reconstruction overlays.

pub mod error;
pub mod helios;
pub mod plot;
pub mod series;
pub mod shocks;
pub mod variable;

pub use error::Error;
pub use helios::{DataLoader, DataSet};
pub use plot::EventPlotter;
pub use series::TimeSeries;
pub use shocks::{Shock, ShockList};
pub use variable::Variable;

/// Timestamp format of the persisted CSV tables
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
