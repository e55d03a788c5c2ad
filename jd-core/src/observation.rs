use serde::{Deserialize, Serialize};

/// Rainfall used when a location has no repository entry (mm/month).
pub const DEFAULT_RAINFALL_MM: f64 = 50.0;
/// Temperature used when a location has no repository entry (°C).
pub const DEFAULT_TEMPERATURE_C: f64 = 32.0;
/// Reservoir level used when a location has no repository entry (%).
pub const DEFAULT_RESERVOIR_PCT: f64 = 60.0;
/// Groundwater depth used when a location has no repository entry (m).
pub const DEFAULT_GROUNDWATER_M: f64 = 20.0;

/// Where an observation came from.
///
/// Callers branch on this rather than on the human readable status string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Fetched from the weather service during the last refresh.
    Live,
    /// Synthesised locally, usually because the fetch failed.
    Simulated { reason: String },
    /// Was live, but has outlived the refresh window.
    Stale,
    /// Seed data from the metrics repository.
    Seed,
}

impl Provenance {
    pub fn is_live(&self) -> bool {
        matches!(self, Provenance::Live)
    }

    pub fn simulated(reason: impl Into<String>) -> Self {
        Provenance::Simulated {
            reason: reason.into(),
        }
    }
}

/// Estimated human and agricultural exposure for a live observation.
///
/// Only the dashboard's live card carries these; seed records do not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    /// Population at risk, in millions.
    pub population_millions: f64,
    /// Sown crop area under water stress, in percent.
    pub agriculture_pct: f64,
}

/// One location's measurements at one point in time.
///
/// Replaced wholesale on each refresh; nothing mutates an observation in
/// place once it has been built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Monthly rainfall in millimetres.
    pub rainfall_mm: f64,
    /// Ambient temperature in °C.
    pub temperature_c: f64,
    /// Live storage as a percentage of capacity (0-100).
    pub reservoir_pct: f64,
    /// Depth to groundwater in metres.
    pub groundwater_depth_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactEstimate>,
    pub provenance: Provenance,
}

impl Observation {
    pub fn new(
        rainfall_mm: f64,
        temperature_c: f64,
        reservoir_pct: f64,
        groundwater_depth_m: f64,
        provenance: Provenance,
    ) -> Self {
        Self {
            rainfall_mm,
            temperature_c,
            reservoir_pct,
            groundwater_depth_m,
            impact: None,
            provenance,
        }
    }

    /// The observation substituted when a location misses the repository,
    /// so map and card rendering never stall on a missing state.
    pub fn fallback() -> Self {
        Self::new(
            DEFAULT_RAINFALL_MM,
            DEFAULT_TEMPERATURE_C,
            DEFAULT_RESERVOIR_PCT,
            DEFAULT_GROUNDWATER_M,
            Provenance::Seed,
        )
    }

    pub fn with_impact(mut self, impact: ImpactEstimate) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }
}
