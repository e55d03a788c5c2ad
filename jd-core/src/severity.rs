//! Drought severity tiers and their presentation descriptors.
//!
//! Every tier-to-colour, tier-to-label and tier-to-scale mapping in the
//! workspace goes through [`SeverityTier::descriptor`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Drought risk classification, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityTier {
    Normal,
    Moderate,
    Severe,
    Extreme,
}

/// An sRGB colour, rendered as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Static presentation data for one tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityDescriptor {
    pub tier: SeverityTier,
    /// Title-case label, e.g. "Extreme".
    pub label: &'static str,
    pub color: Rgb,
    /// Choropleth fill opacity in [0, 1].
    pub fill_opacity: f64,
    /// CSS class for the metric card badge.
    pub badge_class: &'static str,
    /// CSS modifier for the alert gauge label.
    pub css_class: &'static str,
    /// Value plotted on the drought card bar (0-100). A presentation
    /// scale only; unrelated to the classifier thresholds.
    pub card_scale: f64,
    /// Width of the alert gauge fill, in percent.
    pub gauge_fill_pct: f64,
}

impl SeverityDescriptor {
    /// Opacity while the region is hovered.
    pub fn hover_opacity(&self) -> f64 {
        (self.fill_opacity + 0.15).min(1.0)
    }
}

/// One descriptor per tier, indexed by `SeverityTier as usize`.
pub static DESCRIPTORS: [SeverityDescriptor; 4] = [
    SeverityDescriptor {
        tier: SeverityTier::Normal,
        label: "Normal",
        color: Rgb::new(0x22, 0xc5, 0x5e),
        fill_opacity: 0.35,
        badge_class: "badge-normal",
        css_class: "normal",
        card_scale: 20.0,
        gauge_fill_pct: 15.0,
    },
    SeverityDescriptor {
        tier: SeverityTier::Moderate,
        label: "Moderate",
        color: Rgb::new(0xfa, 0xcc, 0x15),
        fill_opacity: 0.50,
        badge_class: "badge-moderate",
        css_class: "moderate",
        card_scale: 50.0,
        gauge_fill_pct: 40.0,
    },
    SeverityDescriptor {
        tier: SeverityTier::Severe,
        label: "Severe",
        color: Rgb::new(0xf9, 0x73, 0x16),
        fill_opacity: 0.60,
        badge_class: "badge-severe",
        css_class: "severe",
        card_scale: 75.0,
        gauge_fill_pct: 70.0,
    },
    SeverityDescriptor {
        tier: SeverityTier::Extreme,
        label: "Extreme",
        color: Rgb::new(0xef, 0x44, 0x44),
        fill_opacity: 0.70,
        badge_class: "badge-extreme",
        css_class: "extreme",
        card_scale: 100.0,
        gauge_fill_pct: 100.0,
    },
];

impl SeverityTier {
    pub const ALL: [SeverityTier; 4] = [
        SeverityTier::Normal,
        SeverityTier::Moderate,
        SeverityTier::Severe,
        SeverityTier::Extreme,
    ];

    pub fn descriptor(self) -> &'static SeverityDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    /// Upper-case code as shown in badges and report status columns.
    pub fn code(self) -> &'static str {
        match self {
            SeverityTier::Normal => "NORMAL",
            SeverityTier::Moderate => "MODERATE",
            SeverityTier::Severe => "SEVERE",
            SeverityTier::Extreme => "EXTREME",
        }
    }

    /// Parses a tier code case-insensitively ("extreme", "EXTREME").
    pub fn from_code(code: &str) -> Option<Self> {
        SeverityTier::ALL
            .into_iter()
            .find(|tier| tier.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_descriptor_per_tier() {
        for tier in SeverityTier::ALL {
            let matching = DESCRIPTORS.iter().filter(|d| d.tier == tier).count();
            assert_eq!(matching, 1, "{tier} should have one descriptor");
            assert_eq!(tier.descriptor().tier, tier);
        }
    }

    #[test]
    fn test_descriptor_colours() {
        assert_eq!(SeverityTier::Normal.descriptor().color.to_hex(), "#22c55e");
        assert_eq!(SeverityTier::Moderate.descriptor().color.to_hex(), "#facc15");
        assert_eq!(SeverityTier::Severe.descriptor().color.to_hex(), "#f97316");
        assert_eq!(SeverityTier::Extreme.descriptor().color.to_hex(), "#ef4444");
    }

    #[test]
    fn test_opacities_stay_in_unit_range() {
        for descriptor in DESCRIPTORS.iter() {
            assert!((0.0..=1.0).contains(&descriptor.fill_opacity));
            assert!(descriptor.hover_opacity() <= 1.0);
        }
        assert!((SeverityTier::Extreme.descriptor().hover_opacity() - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_codes_and_labels() {
        assert_eq!(SeverityTier::Extreme.code(), "EXTREME");
        assert_eq!(SeverityTier::Extreme.label(), "Extreme");
        assert_eq!(SeverityTier::from_code("severe"), Some(SeverityTier::Severe));
        assert_eq!(SeverityTier::from_code("unknown"), None);
        assert!(SeverityTier::Normal < SeverityTier::Extreme);
    }
}
