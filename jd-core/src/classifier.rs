//! Threshold classification of drought severity.
//!
//! Conditions are evaluated in priority order because they overlap. A single
//! extreme condition (dry *or* hot) is only SEVERE; EXTREME needs both.

use crate::severity::SeverityTier;

/// Rainfall below this (mm/month) is an extreme deficit.
pub const EXTREME_RAINFALL_THRESHOLD: f64 = 20.0;
/// Rainfall below this (mm/month) is a moderate deficit.
pub const SEVERE_RAINFALL_THRESHOLD: f64 = 40.0;
/// Temperature above this (°C) is extreme heat.
pub const EXTREME_TEMP_THRESHOLD: f64 = 40.0;
/// Temperature above this (°C) is elevated heat.
pub const SEVERE_TEMP_THRESHOLD: f64 = 36.0;

/// Classifies a (rainfall, temperature) pair into a severity tier.
///
/// Total over all inputs; no validation is performed.
///
/// - EXTREME: rainfall < 20 and temperature > 40
/// - SEVERE: rainfall < 20 or temperature > 40
/// - MODERATE: rainfall < 40 or temperature > 36
/// - NORMAL: otherwise
pub fn classify(rainfall_mm: f64, temperature_c: f64) -> SeverityTier {
    let very_dry = rainfall_mm < EXTREME_RAINFALL_THRESHOLD;
    let very_hot = temperature_c > EXTREME_TEMP_THRESHOLD;
    if very_dry && very_hot {
        SeverityTier::Extreme
    } else if very_dry || very_hot {
        SeverityTier::Severe
    } else if rainfall_mm < SEVERE_RAINFALL_THRESHOLD || temperature_c > SEVERE_TEMP_THRESHOLD {
        SeverityTier::Moderate
    } else {
        SeverityTier::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_extreme_conditions() {
        assert_eq!(classify(15.0, 42.0), SeverityTier::Extreme);
        assert_eq!(classify(-5.0, 1000.0), SeverityTier::Extreme);
        assert_eq!(classify(19.99, 40.01), SeverityTier::Extreme);
    }

    #[test]
    fn test_single_extreme_condition_is_only_severe() {
        // dry alone
        assert_eq!(classify(10.0, 25.0), SeverityTier::Severe);
        assert_eq!(classify(19.0, 40.0), SeverityTier::Severe);
        // hot alone
        assert_eq!(classify(100.0, 41.0), SeverityTier::Severe);
        assert_eq!(classify(20.0, 45.0), SeverityTier::Severe);
    }

    #[test]
    fn test_moderate_band() {
        assert_eq!(classify(25.0, 30.0), SeverityTier::Moderate);
        assert_eq!(classify(39.9, 20.0), SeverityTier::Moderate);
        assert_eq!(classify(80.0, 37.0), SeverityTier::Moderate);
        assert_eq!(classify(80.0, 40.0), SeverityTier::Moderate);
    }

    #[test]
    fn test_boundaries_are_strict() {
        assert_eq!(classify(20.0, 40.0), SeverityTier::Moderate);
        assert_eq!(classify(40.0, 36.0), SeverityTier::Normal);
        assert_eq!(classify(40.0, 36.5), SeverityTier::Moderate);
    }

    #[test]
    fn test_normal() {
        assert_eq!(classify(180.0, 30.0), SeverityTier::Normal);
        assert_eq!(classify(45.0, 34.0), SeverityTier::Normal);
    }

    #[test]
    fn test_classify_is_pure() {
        for (rainfall, temp) in [(15.0, 42.0), (22.0, 38.0), (60.0, 33.0), (12.0, 10.0)] {
            assert_eq!(classify(rainfall, temp), classify(rainfall, temp));
        }
    }
}
