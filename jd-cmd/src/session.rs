//! The live observation and its refresh cycle.
//!
//! A [`Session`] owns the single current observation. Each refresh fetches
//! the weather for a city, maps it to an observation (or substitutes a
//! simulated one when the fetch fails) and swaps it in whole. Only one
//! refresh runs at a time; a refresh requested while another is in flight
//! is dropped.

use crate::weather::{FetchError, WeatherSource};
use chrono::{DateTime, Local, Utc};
use jd_core::{Observation, Provenance};
use jd_data::{initial_observation, observation_from_weather, simulated_observation, WeatherReading};
use jd_utils::dates::format_clock;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Updated(Observation),
    /// Another refresh was already running.
    Skipped,
}

#[derive(Debug, Clone)]
struct Current {
    city: String,
    observation: Observation,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Clears the in-flight flag when dropped, including on cancellation.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Session {
    source: Arc<dyn WeatherSource>,
    interval: Duration,
    current: Mutex<Current>,
    in_flight: AtomicBool,
}

impl Session {
    pub fn new(source: Arc<dyn WeatherSource>, city: &str, interval: Duration) -> Self {
        Session {
            source,
            interval,
            current: Mutex::new(Current {
                city: city.to_string(),
                observation: initial_observation(),
                refreshed_at: None,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn city(&self) -> String {
        self.lock().city.clone()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.lock().refreshed_at
    }

    /// Fetch and replace the current observation for `city`.
    pub async fn refresh(&self, city: &str) -> RefreshOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            info!("Refresh for {} skipped; another refresh is in flight", city);
            return RefreshOutcome::Skipped;
        };

        let fetched = self.source.current(city).await;
        let observation = observe(city, fetched);

        let mut current = self.lock();
        current.city = city.to_string();
        current.observation = observation.clone();
        current.refreshed_at = Some(Utc::now());
        RefreshOutcome::Updated(observation)
    }

    pub fn current(&self) -> Observation {
        self.current_at(Utc::now())
    }

    /// The current observation as seen at `now`; live data older than twice
    /// the refresh interval is reported as stale.
    pub fn current_at(&self, now: DateTime<Utc>) -> Observation {
        let current = self.lock();
        let observation = current.observation.clone();
        match current.refreshed_at {
            Some(at) if observation.provenance.is_live() && self.is_stale(at, now) => {
                observation.with_provenance(Provenance::Stale)
            }
            _ => observation,
        }
    }

    fn is_stale(&self, refreshed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match (now - refreshed_at).to_std() {
            Ok(age) => age > self.interval * 2,
            Err(_) => false,
        }
    }

    pub fn status_line(&self) -> String {
        self.status_line_at(Utc::now())
    }

    pub fn status_line_at(&self, now: DateTime<Utc>) -> String {
        let observation = self.current_at(now);
        let current = self.lock();
        match &observation.provenance {
            Provenance::Live => {
                let at = current.refreshed_at.unwrap_or(now).with_timezone(&Local);
                format!("✓ Live data loaded for {} at {}", current.city, format_clock(&at))
            }
            Provenance::Simulated { reason } => format!("⚠ Using simulated data ({})", reason),
            Provenance::Stale => format!("⏳ Data for {} is stale", current.city),
            Provenance::Seed => format!("Showing seed data for {}", current.city),
        }
    }
}

fn observe(city: &str, fetched: Result<WeatherReading, FetchError>) -> Observation {
    let mut rng = rand::thread_rng();
    match fetched {
        Ok(reading) => {
            info!("Live weather loaded for {}", city);
            observation_from_weather(&reading, &mut rng)
        }
        Err(err) => {
            warn!("Weather fetch for {} failed, using simulated data: {}", city, err);
            simulated_observation(&mut rng, &err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct FixedSource(WeatherReading);

    #[async_trait]
    impl WeatherSource for FixedSource {
        async fn current(&self, _city: &str) -> Result<WeatherReading, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct UnauthorizedSource;

    #[async_trait]
    impl WeatherSource for UnauthorizedSource {
        async fn current(&self, _city: &str) -> Result<WeatherReading, FetchError> {
            Err(FetchError::Unauthorized)
        }
    }

    /// Holds every fetch until released.
    struct GatedSource {
        release: Notify,
    }

    #[async_trait]
    impl WeatherSource for GatedSource {
        async fn current(&self, _city: &str) -> Result<WeatherReading, FetchError> {
            self.release.notified().await;
            Ok(hot_dry())
        }
    }

    fn hot_dry() -> WeatherReading {
        WeatherReading {
            rain_1h_mm: Some(0.02),
            temperature_c: 42.2,
            humidity_pct: 15.0,
        }
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new(Arc::new(UnauthorizedSource), "Delhi", Duration::from_secs(300));
        assert_eq!(session.current(), initial_observation());
        assert_eq!(session.refreshed_at(), None);
        assert_eq!(
            session.status_line(),
            "⚠ Using simulated data (awaiting first refresh)"
        );
    }

    #[tokio::test]
    async fn test_live_refresh() {
        let session = Session::new(
            Arc::new(FixedSource(hot_dry())),
            "Delhi",
            Duration::from_secs(300),
        );
        let RefreshOutcome::Updated(observation) = session.refresh("Jaipur").await else {
            panic!("refresh was skipped");
        };
        assert_eq!(observation.rainfall_mm, 14.0);
        assert_eq!(observation.temperature_c, 42.0);
        assert_eq!(observation.reservoir_pct, 20.0);
        assert_eq!(observation.provenance, Provenance::Live);
        assert_eq!(session.city(), "Jaipur");
        assert!(session
            .status_line()
            .starts_with("✓ Live data loaded for Jaipur at "));
        assert!(!session.is_refreshing());
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_simulated() {
        let session = Session::new(Arc::new(UnauthorizedSource), "Delhi", Duration::from_secs(300));
        let RefreshOutcome::Updated(observation) = session.refresh("Delhi").await else {
            panic!("refresh was skipped");
        };
        assert_eq!(observation.provenance, Provenance::simulated("Invalid API key"));
        assert!((15.0..=94.0).contains(&observation.rainfall_mm));
        assert_eq!(session.status_line(), "⚠ Using simulated data (Invalid API key)");
    }

    #[tokio::test]
    async fn test_live_data_goes_stale() {
        let session = Session::new(
            Arc::new(FixedSource(hot_dry())),
            "Delhi",
            Duration::from_secs(60),
        );
        session.refresh("Delhi").await;
        let at = session.refreshed_at().unwrap();

        let fresh = session.current_at(at + chrono::Duration::seconds(120));
        assert_eq!(fresh.provenance, Provenance::Live);

        let old = at + chrono::Duration::seconds(121);
        assert_eq!(session.current_at(old).provenance, Provenance::Stale);
        assert_eq!(session.status_line_at(old), "⏳ Data for Delhi is stale");
    }

    #[tokio::test]
    async fn test_simulated_data_never_goes_stale() {
        let session = Session::new(Arc::new(UnauthorizedSource), "Delhi", Duration::from_secs(1));
        session.refresh("Delhi").await;
        let later = Utc::now() + chrono::Duration::hours(1);
        assert!(matches!(
            session.current_at(later).provenance,
            Provenance::Simulated { .. }
        ));
    }

    #[tokio::test]
    async fn test_overlapping_refresh_is_dropped() {
        let source = Arc::new(GatedSource {
            release: Notify::new(),
        });
        let session = Arc::new(Session::new(source.clone(), "Delhi", Duration::from_secs(300)));

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.refresh("Delhi").await }
        });
        while !session.is_refreshing() {
            tokio::task::yield_now().await;
        }

        assert_eq!(session.refresh("Mumbai").await, RefreshOutcome::Skipped);

        source.release.notify_one();
        let outcome = first.await.unwrap();
        assert!(matches!(outcome, RefreshOutcome::Updated(_)));
        assert_eq!(session.city(), "Delhi");
        assert!(!session.is_refreshing());
    }
}
