//! Map payloads: popup fields and choropleth styling per region.
//!
//! Popups fall back to the default observation when a region has no data;
//! choropleth styling does not, it marks the region as having no data.

use jd_core::names;
use jd_core::{classify, MetricsRepository, Observation, Rgb, SeverityDescriptor, SeverityTier};
use serde::Serialize;

/// Disclaimer attached to regions inside the pre-2019 Jammu & Kashmir polygon.
pub const UNDIVIDED_BOUNDARY_NOTE: &str =
    "Map shows pre-2019 boundary. J&K and Ladakh are now separate UTs.";

/// Fill colour for regions without data.
pub const NO_DATA_COLOR: Rgb = Rgb::new(0x1a, 0x3a, 0x50);
pub const NO_DATA_OPACITY: f64 = 0.3;

/// Fields rendered in a region's map popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupFields {
    pub name: String,
    pub rainfall_mm: f64,
    pub temperature_c: f64,
    pub reservoir_pct: f64,
    pub groundwater_depth_m: f64,
    pub tier: SeverityTier,
    pub tier_label: &'static str,
    pub color: Rgb,
    /// False when the values are the default observation.
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_note: Option<&'static str>,
}

impl PopupFields {
    pub fn new(canonical_name: &str, observation: &Observation, has_data: bool) -> Self {
        let tier = classify(observation.rainfall_mm, observation.temperature_c);
        let descriptor = tier.descriptor();
        PopupFields {
            name: canonical_name.to_string(),
            rainfall_mm: observation.rainfall_mm,
            temperature_c: observation.temperature_c,
            reservoir_pct: observation.reservoir_pct,
            groundwater_depth_m: observation.groundwater_depth_m,
            tier,
            tier_label: descriptor.label,
            color: descriptor.color,
            has_data,
            boundary_note: names::inside_undivided_boundary(canonical_name)
                .then_some(UNDIVIDED_BOUNDARY_NOTE),
        }
    }

    /// (name, rainfall, temperature, reservoir, groundwater, tier label)
    pub fn as_tuple(&self) -> (&str, f64, f64, f64, f64, &'static str) {
        (
            &self.name,
            self.rainfall_mm,
            self.temperature_c,
            self.reservoir_pct,
            self.groundwater_depth_m,
            self.tier_label,
        )
    }
}

/// Popup for a raw boundary name in `year`.
pub fn popup_for_region(repo: &MetricsRepository, year: i32, raw_name: &str) -> PopupFields {
    let (canonical, observation) = repo.lookup_raw(year, raw_name);
    match observation {
        Some(observation) => PopupFields::new(canonical, &observation, true),
        None => PopupFields::new(canonical, &repo.lookup_or_default(year, canonical), false),
    }
}

/// Popups for every state in a year, in name order. Used for the marker
/// fallback when boundary data is unavailable.
pub fn popups_for_year(repo: &MetricsRepository, year: i32) -> Vec<PopupFields> {
    repo.slice(year)
        .map(|slice| {
            slice
                .records()
                .map(|record| PopupFields::new(&record.canonical_name, &record.observation(), true))
                .collect()
        })
        .unwrap_or_default()
}

/// Choropleth style for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionStyle {
    Classified {
        tier: SeverityTier,
        descriptor: &'static SeverityDescriptor,
    },
    NoData,
}

impl RegionStyle {
    pub fn fill_color(&self) -> Rgb {
        match self {
            RegionStyle::Classified { descriptor, .. } => descriptor.color,
            RegionStyle::NoData => NO_DATA_COLOR,
        }
    }

    pub fn fill_opacity(&self) -> f64 {
        match self {
            RegionStyle::Classified { descriptor, .. } => descriptor.fill_opacity,
            RegionStyle::NoData => NO_DATA_OPACITY,
        }
    }
}

pub fn style_for_region(repo: &MetricsRepository, year: i32, raw_name: &str) -> RegionStyle {
    match repo.lookup_raw(year, raw_name) {
        (_, Some(observation)) => {
            let tier = classify(observation.rainfall_mm, observation.temperature_c);
            RegionStyle::Classified {
                tier,
                descriptor: tier.descriptor(),
            }
        }
        (_, None) => RegionStyle::NoData,
    }
}
