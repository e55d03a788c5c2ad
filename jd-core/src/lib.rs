//! Core types for the JalDrishti drought toolkit.
//!
//! - [`classifier`] maps rainfall and temperature to a [`SeverityTier`].
//! - [`severity`] holds the single tier descriptor table.
//! - [`names`] folds boundary-source state names onto canonical keys.
//! - [`repository`] is the read-only per-year, per-state seed table.
//! - [`observation`] is the measurement record passed between layers.

pub mod classifier;
pub mod names;
pub mod observation;
pub mod repository;
pub mod severity;

pub use classifier::classify;
pub use observation::{ImpactEstimate, Observation, Provenance};
pub use repository::{MetricsRepository, StateRecord, YearSlice};
pub use severity::{Rgb, SeverityDescriptor, SeverityTier};
