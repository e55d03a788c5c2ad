//! Presentation aggregates computed from a single observation.

use crate::metrics::{fill_percentage, MetricKind};
use jd_core::{classify, ImpactEstimate, Observation, Provenance, SeverityDescriptor, SeverityTier};
use serde::Serialize;
use std::collections::BTreeMap;

/// 30-year monthly rainfall normal used for departure figures (mm).
pub const RAINFALL_NORMAL_MM: f64 = 70.0;
/// Below this monthly rainfall the card reads "below normal".
pub const BELOW_NORMAL_RAINFALL_MM: f64 = 40.0;
/// Baseline for the temperature anomaly (°C).
pub const TEMPERATURE_BASELINE_C: f64 = 32.0;
/// National live storage in BCM per reservoir percentage point.
pub const BCM_PER_RESERVOIR_PCT: f64 = 2.5;
/// Reservoir level under which storage is reported as declining.
pub const RESERVOIR_DECLINE_PCT: f64 = 50.0;

/// Card back-face figures that need an impact estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactDetail {
    /// Population under acute water stress, millions.
    pub acute_stress_millions: f64,
    pub districts_affected: f64,
    pub kharif_exposure_pct: f64,
    /// Estimated crop loss in crore rupees.
    pub crop_loss_crore: f64,
}

impl ImpactDetail {
    fn new(impact: &ImpactEstimate) -> Self {
        ImpactDetail {
            acute_stress_millions: (impact.population_millions * 0.3).round(),
            districts_affected: (impact.population_millions / 2.0).round(),
            kharif_exposure_pct: (impact.agriculture_pct * 1.1).round(),
            crop_loss_crore: (impact.agriculture_pct * 120.0).round(),
        }
    }
}

/// Rough count of states under stress at a tier, as shown on the card.
pub fn states_affected(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::Extreme => "8+",
        SeverityTier::Severe => "5",
        SeverityTier::Moderate | SeverityTier::Normal => "3",
    }
}

/// Everything the metric cards need, derived from one observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub tier: SeverityTier,
    pub descriptor: &'static SeverityDescriptor,
    /// Bar fill per metric, each in [0, 100]. Population and agriculture
    /// only appear when the observation carries an impact estimate.
    pub fill_percentages: BTreeMap<MetricKind, f64>,
    pub badge_tier: SeverityTier,
    /// Shortfall against [`RAINFALL_NORMAL_MM`], never negative.
    pub rainfall_deficit_mm: f64,
    /// Rounded percent departure from normal; positive means a deficit.
    pub rainfall_departure_pct: f64,
    pub rainfall_below_normal: bool,
    /// Apparent temperature, `temperature * 1.08`, whole degrees.
    pub heat_index_c: f64,
    /// Difference from the 32 °C baseline, one decimal place.
    pub temperature_anomaly_c: f64,
    pub reservoir_storage_bcm: f64,
    pub reservoir_declining: bool,
    pub states_affected: &'static str,
    pub impact_detail: Option<ImpactDetail>,
    pub provenance: Provenance,
}

impl DerivedMetrics {
    pub fn fill(&self, metric: MetricKind) -> Option<f64> {
        self.fill_percentages.get(&metric).copied()
    }

    pub fn badge_class(&self) -> &'static str {
        self.badge_tier.descriptor().badge_class
    }
}

/// Builds the derived metrics for an observation. Pure; borrows only.
pub fn build_derived(observation: &Observation) -> DerivedMetrics {
    let tier = classify(observation.rainfall_mm, observation.temperature_c);
    let descriptor = tier.descriptor();

    let mut fill_percentages = BTreeMap::new();
    let mut put = |metric: MetricKind, value: f64| {
        fill_percentages.insert(metric, fill_percentage(value, metric.max_scale()));
    };
    put(MetricKind::Rainfall, observation.rainfall_mm);
    put(MetricKind::Temperature, observation.temperature_c);
    put(MetricKind::Reservoir, observation.reservoir_pct);
    put(MetricKind::DroughtSeverity, descriptor.card_scale);
    if let Some(impact) = observation.impact {
        put(MetricKind::Population, impact.population_millions);
        put(MetricKind::Agriculture, impact.agriculture_pct);
    }

    DerivedMetrics {
        tier,
        descriptor,
        fill_percentages,
        badge_tier: tier,
        rainfall_deficit_mm: (RAINFALL_NORMAL_MM - observation.rainfall_mm).max(0.0),
        rainfall_departure_pct: ((RAINFALL_NORMAL_MM - observation.rainfall_mm) / RAINFALL_NORMAL_MM
            * 100.0)
            .round(),
        rainfall_below_normal: observation.rainfall_mm < BELOW_NORMAL_RAINFALL_MM,
        heat_index_c: (observation.temperature_c * 1.08).round(),
        temperature_anomaly_c: ((observation.temperature_c - TEMPERATURE_BASELINE_C) * 10.0)
            .round()
            / 10.0,
        reservoir_storage_bcm: (observation.reservoir_pct * BCM_PER_RESERVOIR_PCT).round(),
        reservoir_declining: observation.reservoir_pct < RESERVOIR_DECLINE_PCT,
        states_affected: states_affected(tier),
        impact_detail: observation.impact.as_ref().map(ImpactDetail::new),
        provenance: observation.provenance.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(rainfall: f64, temp: f64, reservoir: f64, groundwater: f64) -> Observation {
        Observation::new(rainfall, temp, reservoir, groundwater, Provenance::Live)
    }

    #[test]
    fn test_rajasthan_is_extreme() {
        let derived = build_derived(&observation(15.0, 42.0, 28.0, 45.0));
        assert_eq!(derived.tier, SeverityTier::Extreme);
        assert_eq!(derived.badge_tier, SeverityTier::Extreme);
        assert_eq!(derived.badge_class(), "badge-extreme");
        assert_eq!(derived.descriptor.label, "Extreme");
        assert_eq!(derived.fill(MetricKind::DroughtSeverity), Some(100.0));
        assert_eq!(derived.fill(MetricKind::Rainfall), Some(7.5));
        assert_eq!(derived.fill(MetricKind::Temperature), Some(84.0));
        assert_eq!(derived.fill(MetricKind::Reservoir), Some(28.0));
    }

    #[test]
    fn test_rainfall_fill_clamps() {
        let derived = build_derived(&observation(500.0, 30.0, 90.0, 12.0));
        assert_eq!(derived.fill(MetricKind::Rainfall), Some(100.0));
        assert_eq!(derived.rainfall_deficit_mm, 0.0);
    }

    #[test]
    fn test_drought_bar_uses_presentation_scale() {
        let cases = [
            (observation(180.0, 30.0, 90.0, 12.0), 20.0),
            (observation(30.0, 30.0, 60.0, 20.0), 50.0),
            (observation(10.0, 30.0, 60.0, 20.0), 75.0),
            (observation(10.0, 45.0, 60.0, 20.0), 100.0),
        ];
        for (obs, expected) in cases {
            assert_eq!(build_derived(&obs).fill(MetricKind::DroughtSeverity), Some(expected));
        }
    }

    #[test]
    fn test_impact_metrics_only_when_present() {
        let bare = build_derived(&observation(45.0, 36.0, 52.0, 20.0));
        assert_eq!(bare.fill(MetricKind::Population), None);
        assert_eq!(bare.fill(MetricKind::Agriculture), None);

        let with_impact = observation(45.0, 36.0, 52.0, 20.0).with_impact(ImpactEstimate {
            population_millions: 34.0,
            agriculture_pct: 28.0,
        });
        let derived = build_derived(&with_impact);
        assert_eq!(derived.fill(MetricKind::Population), Some(6.8));
        assert_eq!(derived.fill(MetricKind::Agriculture), Some(28.0));
    }

    #[test]
    fn test_every_fill_in_range() {
        let derived = build_derived(&observation(-30.0, 80.0, 140.0, 5.0));
        for (metric, pct) in &derived.fill_percentages {
            assert!((0.0..=100.0).contains(pct), "{metric} = {pct}");
        }
    }

    #[test]
    fn test_rainfall_departure() {
        let derived = build_derived(&observation(15.0, 42.0, 28.0, 45.0));
        assert_eq!(derived.rainfall_deficit_mm, 55.0);
        assert_eq!(derived.rainfall_departure_pct, 79.0);
    }

    #[test]
    fn test_temperature_details() {
        let derived = build_derived(&observation(15.0, 42.0, 28.0, 45.0));
        assert_eq!(derived.heat_index_c, 45.0);
        assert_eq!(derived.temperature_anomaly_c, 10.0);

        let mild = build_derived(&observation(60.0, 33.46, 60.0, 20.0));
        assert_eq!(mild.temperature_anomaly_c, 1.5);
        let cool = build_derived(&observation(60.0, 30.44, 60.0, 20.0));
        assert_eq!(cool.temperature_anomaly_c, -1.6);
    }

    #[test]
    fn test_reservoir_details() {
        let low = build_derived(&observation(15.0, 42.0, 28.0, 45.0));
        assert_eq!(low.reservoir_storage_bcm, 70.0);
        assert!(low.reservoir_declining);

        let full = build_derived(&observation(180.0, 30.0, 90.0, 12.0));
        assert_eq!(full.reservoir_storage_bcm, 225.0);
        assert!(!full.reservoir_declining);
        assert!(!build_derived(&observation(80.0, 30.0, 50.0, 20.0)).reservoir_declining);
    }

    #[test]
    fn test_rainfall_status() {
        assert!(build_derived(&observation(39.0, 30.0, 60.0, 20.0)).rainfall_below_normal);
        assert!(!build_derived(&observation(40.0, 30.0, 60.0, 20.0)).rainfall_below_normal);
    }

    #[test]
    fn test_states_affected_per_tier() {
        assert_eq!(build_derived(&observation(15.0, 42.0, 28.0, 45.0)).states_affected, "8+");
        assert_eq!(build_derived(&observation(10.0, 30.0, 60.0, 20.0)).states_affected, "5");
        assert_eq!(build_derived(&observation(30.0, 30.0, 60.0, 20.0)).states_affected, "3");
        assert_eq!(build_derived(&observation(180.0, 30.0, 90.0, 12.0)).states_affected, "3");
    }

    #[test]
    fn test_impact_detail() {
        assert_eq!(build_derived(&observation(45.0, 36.0, 52.0, 20.0)).impact_detail, None);

        let with_impact = observation(45.0, 36.0, 52.0, 20.0).with_impact(ImpactEstimate {
            population_millions: 34.0,
            agriculture_pct: 28.0,
        });
        let detail = build_derived(&with_impact).impact_detail.unwrap();
        assert_eq!(detail.acute_stress_millions, 10.0);
        assert_eq!(detail.districts_affected, 17.0);
        assert_eq!(detail.kharif_exposure_pct, 31.0);
        assert_eq!(detail.crop_loss_crore, 3360.0);
    }

    #[test]
    fn test_provenance_carried_through() {
        let simulated = observation(45.0, 36.0, 52.0, 20.0)
            .with_provenance(Provenance::simulated("Invalid API key"));
        let derived = build_derived(&simulated);
        assert_eq!(derived.provenance, Provenance::simulated("Invalid API key"));
    }

    #[test]
    fn test_serializes_for_presentation() {
        let derived = build_derived(&observation(15.0, 42.0, 28.0, 45.0));
        let json = serde_json::to_value(&derived).unwrap();
        assert_eq!(json["tier"], "EXTREME");
        assert_eq!(json["descriptor"]["color"], "#ef4444");
        assert_eq!(json["fill_percentages"]["drought_severity"], 100.0);
    }
}
