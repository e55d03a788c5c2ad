//! Building observations from weather readings, or from nothing at all.
//!
//! When the weather fetch fails the dashboard keeps rendering with a
//! randomised observation inside fixed ranges. The result is always tagged
//! [`Provenance::Simulated`] so callers can tell it apart from live data.

use jd_core::observation::DEFAULT_GROUNDWATER_M;
use jd_core::{ImpactEstimate, Observation, Provenance};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hours in a 30-day month; scales a one-hour rain rate to a monthly total.
const HOURS_PER_MONTH: f64 = 720.0;

/// The subset of a current-weather response the dashboard uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Rain over the last hour, if the service reported any.
    pub rain_1h_mm: Option<f64>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

/// Maps a live weather reading onto an observation.
///
/// Rainfall is the hourly rate scaled to a month; a dry hour is replaced by
/// a random 20-79 mm. Humidity stands in for reservoir level, clamped to
/// 20-95 %. Groundwater is not reported and uses the default depth.
pub fn observation_from_weather<R: Rng>(reading: &WeatherReading, rng: &mut R) -> Observation {
    let monthly = (reading.rain_1h_mm.unwrap_or(0.0) * HOURS_PER_MONTH).round();
    let rainfall_mm = if monthly > 0.0 {
        monthly
    } else {
        f64::from(rng.gen_range(20..80_i32))
    };
    Observation::new(
        rainfall_mm,
        reading.temperature_c.round(),
        reading.humidity_pct.clamp(20.0, 95.0),
        DEFAULT_GROUNDWATER_M,
        Provenance::Live,
    )
    .with_impact(ImpactEstimate {
        population_millions: (30.0 + rng.gen::<f64>() * 100.0).round(),
        agriculture_pct: (20.0 + rng.gen::<f64>() * 50.0).round(),
    })
}

/// A randomised observation used when no live data is available.
///
/// Ranges: rainfall 15-94 mm, temperature 30-41 °C, reservoir 30-79 %,
/// groundwater 10-55 m, population 20-100 M, agriculture 15-60 %.
pub fn simulated_observation<R: Rng>(rng: &mut R, reason: &str) -> Observation {
    Observation::new(
        f64::from(rng.gen_range(15..95_i32)),
        f64::from(rng.gen_range(30..42_i32)),
        f64::from(rng.gen_range(30..80_i32)),
        f64::from(rng.gen_range(10..=55_i32)),
        Provenance::simulated(reason),
    )
    .with_impact(ImpactEstimate {
        population_millions: (20.0 + rng.gen::<f64>() * 80.0).round(),
        agriculture_pct: (15.0 + rng.gen::<f64>() * 45.0).round(),
    })
}

/// The live card's value before the first refresh completes.
pub fn initial_observation() -> Observation {
    Observation::new(
        45.0,
        36.0,
        52.0,
        DEFAULT_GROUNDWATER_M,
        Provenance::simulated("awaiting first refresh"),
    )
    .with_impact(ImpactEstimate {
        population_millions: 34.0,
        agriculture_pct: 28.0,
    })
}
