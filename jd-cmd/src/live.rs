//! Commands that talk to the weather service.

use crate::config::WeatherArgs;
use crate::lookup::seed_year;
use crate::session::{RefreshOutcome, Session};
use chrono::{Local, NaiveDate};
use jd_core::{MetricsRepository, Observation};
use jd_data::alert::DETECTED_REGION;
use jd_data::{alert_status, build_derived, build_report, check_extreme_drought, write_report};
use log::{info, warn};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

fn session_for(city: &str, weather: &WeatherArgs) -> anyhow::Result<Arc<Session>> {
    let source = weather.source()?;
    Ok(Arc::new(Session::new(Arc::new(source), city, weather.interval())))
}

fn raise_alert(observation: &Observation) {
    if let Some(alert) = check_extreme_drought(observation, DETECTED_REGION) {
        warn!("{} in {}: {}", alert.tier.label(), alert.region, alert.message);
    }
}

/// One refresh; prints derived metrics, the alert gauge and the status line.
pub async fn run_fetch(city: &str, weather: &WeatherArgs) -> anyhow::Result<()> {
    let session = session_for(city, weather)?;
    session.refresh(city).await;
    let observation = session.current();
    raise_alert(&observation);

    let payload = json!({
        "city": city,
        "observation": observation,
        "derived": build_derived(&observation),
        "alert": alert_status(&observation),
        "status": session.status_line(),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Refresh, then write the CSV report for `city` into `output_dir`. The
/// filename carries `date`, today by default.
pub async fn run_export(
    city: &str,
    year: Option<i32>,
    date: Option<NaiveDate>,
    output_dir: &Path,
    weather: &WeatherArgs,
) -> anyhow::Result<()> {
    let repo = MetricsRepository::embedded();
    let year = seed_year(repo, year)?;
    let Some(snapshot) = repo.slice(year) else {
        anyhow::bail!("No seed metrics available for {}", year);
    };

    let session = session_for(city, weather)?;
    session.refresh(city).await;
    info!("{}", session.status_line());

    let report = build_report(&session.current(), city, snapshot);
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let path = write_report(output_dir, city, &date, &report)?;
    println!("{}", path.display());
    Ok(())
}

/// Refresh every interval. Ticks that land while a refresh is still running
/// are dropped by the session.
pub async fn run_watch(city: &str, weather: &WeatherArgs, count: Option<u64>) -> anyhow::Result<()> {
    anyhow::ensure!(weather.interval_secs > 0, "--interval-secs must be positive");
    let session = session_for(city, weather)?;
    info!(
        "Watching {} every {}s",
        city,
        weather.interval().as_secs()
    );
    watch(session, city, weather.interval(), count).await
}

/// Waits for every spawned refresh before returning, so the last tick
/// cannot cut short a refresh that is still in flight.
async fn watch(
    session: Arc<Session>,
    city: &str,
    interval: Duration,
    count: Option<u64>,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(interval);
    let mut refreshes = JoinSet::new();
    let mut ticks = 0u64;

    loop {
        ticker.tick().await;
        ticks += 1;

        while let Some(finished) = refreshes.try_join_next() {
            finished?;
        }

        let session = session.clone();
        let city = city.to_string();
        refreshes.spawn(async move {
            if let RefreshOutcome::Updated(_) = session.refresh(&city).await {
                let observation = session.current();
                info!("{}", session.status_line());
                raise_alert(&observation);
            }
        });

        if count.is_some_and(|limit| ticks >= limit) {
            break;
        }
    }

    while let Some(finished) = refreshes.join_next().await {
        finished?;
    }
    Ok(())
}
