//! Alert gauge state and the extreme-drought trigger.

use jd_core::{classify, Observation, Rgb, SeverityTier};
use serde::Serialize;

/// Region label used when the alert was raised from the live card.
pub const DETECTED_REGION: &str = "Detected Region";

/// State of the alert gauge for the current observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertStatus {
    pub tier: SeverityTier,
    pub gauge_fill_pct: f64,
    pub color: Rgb,
    /// e.g. "Severe Risk"
    pub label: String,
    pub css_class: &'static str,
    pub critical: bool,
    pub status_text: &'static str,
}

/// Raised when an observation classifies as EXTREME.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroughtAlert {
    pub tier: SeverityTier,
    pub region: String,
    /// Modal text.
    pub message: String,
    /// Shorter line for the alert feed.
    pub feed_message: String,
}

pub fn alert_status(observation: &Observation) -> AlertStatus {
    let tier = classify(observation.rainfall_mm, observation.temperature_c);
    let descriptor = tier.descriptor();
    let critical = tier == SeverityTier::Extreme;
    AlertStatus {
        tier,
        gauge_fill_pct: descriptor.gauge_fill_pct,
        color: descriptor.color,
        label: format!("{} Risk", descriptor.label),
        css_class: descriptor.css_class,
        critical,
        status_text: if critical {
            "🚨 Critical Alert Active"
        } else {
            "Monitoring Active"
        },
    }
}

/// Returns an alert only for EXTREME conditions.
pub fn check_extreme_drought(observation: &Observation, region: &str) -> Option<DroughtAlert> {
    let tier = classify(observation.rainfall_mm, observation.temperature_c);
    if tier != SeverityTier::Extreme {
        return None;
    }
    Some(DroughtAlert {
        tier,
        region: region.to_string(),
        message: format!(
            "Critical conditions detected — Rainfall: {}mm/month, Temperature: {}°C. \
             Immediate water conservation measures required.",
            observation.rainfall_mm, observation.temperature_c
        ),
        feed_message: format!(
            "Rainfall {}mm, Temp {}°C — Auto-triggered",
            observation.rainfall_mm, observation.temperature_c
        ),
    })
}
