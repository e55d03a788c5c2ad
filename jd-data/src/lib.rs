//! Presentation-side processing for JalDrishti.
//!
//! Everything here is computed from an [`Observation`](jd_core::Observation)
//! or a year slice of the metrics repository: card metrics, the alert gauge,
//! map popups and styling, synthetic observations and the CSV report.

pub mod alert;
pub mod derived;
pub mod metrics;
pub mod popup;
pub mod report;
pub mod synthesis;

pub use alert::{alert_status, check_extreme_drought, AlertStatus, DroughtAlert};
pub use derived::{build_derived, states_affected, DerivedMetrics, ImpactDetail};
pub use metrics::{fill_percentage, MetricKind};
pub use popup::{popup_for_region, style_for_region, PopupFields, RegionStyle};
pub use report::{build_report, build_report_at, render_csv, write_report, Report};
pub use synthesis::{initial_observation, observation_from_weather, simulated_observation, WeatherReading};
