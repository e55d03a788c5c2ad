//! Dashboard metric kinds and their presentation scales.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrics shown on the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Rainfall,
    Temperature,
    Reservoir,
    /// Pseudo-metric plotted from the severity tier, not a physical quantity.
    DroughtSeverity,
    Population,
    Agriculture,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Rainfall,
        MetricKind::Temperature,
        MetricKind::Reservoir,
        MetricKind::DroughtSeverity,
        MetricKind::Population,
        MetricKind::Agriculture,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Rainfall => "Monthly Rainfall",
            MetricKind::Temperature => "Temperature",
            MetricKind::Reservoir => "Reservoir Level",
            MetricKind::DroughtSeverity => "Drought Severity",
            MetricKind::Population => "Population at Risk",
            MetricKind::Agriculture => "Agricultural Impact",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::Rainfall => "mm",
            MetricKind::Temperature => "°C",
            MetricKind::Reservoir => "%",
            MetricKind::DroughtSeverity => "—",
            MetricKind::Population => "Millions",
            MetricKind::Agriculture => "%",
        }
    }

    /// Value at which the card bar is drawn full.
    pub fn max_scale(self) -> f64 {
        match self {
            MetricKind::Rainfall => 200.0,
            MetricKind::Temperature => 50.0,
            MetricKind::Reservoir => 100.0,
            MetricKind::DroughtSeverity => 100.0,
            MetricKind::Population => 500.0,
            MetricKind::Agriculture => 100.0,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `min(100, 100 * value / max_scale)`, floored at zero.
pub fn fill_percentage(value: f64, max_scale: f64) -> f64 {
    (100.0 * value / max_scale).clamp(0.0, 100.0)
}
