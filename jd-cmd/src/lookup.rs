//! Offline commands: classification, name resolution and seed lookups.

use anyhow::anyhow;
use jd_core::{
    classify, names, ImpactEstimate, MetricsRepository, Observation, Provenance, SeverityTier,
};
use jd_data::popup::popups_for_year;
use jd_data::{alert_status, build_derived, popup_for_region, style_for_region, PopupFields};
use log::info;
use serde_json::json;
use std::collections::BTreeMap;

pub fn run_classify(rainfall_mm: f64, temperature_c: f64) -> anyhow::Result<()> {
    let tier = classify(rainfall_mm, temperature_c);
    println!("{}\t{}", tier.code(), tier.label());
    Ok(())
}

/// `KEY=VALUE` argument for a boundary feature property.
pub fn parse_property(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{arg}'"))
}

/// Canonical name for a raw name, or for a feature given its properties.
pub fn resolve_raw(name: Option<&str>, properties: &[(String, String)]) -> String {
    match name {
        Some(name) => names::resolve(name).to_string(),
        None => {
            let props: BTreeMap<&str, &str> = properties
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            names::resolve_feature(|key| props.get(key).copied()).to_string()
        }
    }
}

pub fn run_resolve(name: Option<&str>, properties: &[(String, String)]) -> anyhow::Result<()> {
    let canonical = resolve_raw(name, properties);
    if !names::is_canonical(&canonical) {
        info!("'{}' is not a known state or union territory", canonical);
    }
    println!("{}", canonical);
    Ok(())
}

/// `year`, or the latest seed year when none was given.
pub(crate) fn seed_year(repo: &MetricsRepository, year: Option<i32>) -> anyhow::Result<i32> {
    year.or_else(|| repo.latest_year())
        .ok_or_else(|| anyhow!("No seed metrics available"))
}

/// Popup fields and map styling for a raw region name as JSON.
pub fn run_state(raw_name: &str, year: Option<i32>) -> anyhow::Result<()> {
    let repo = MetricsRepository::embedded();
    let year = seed_year(repo, year)?;
    let style = style_for_region(repo, year, raw_name);
    let payload = json!({
        "year": repo.resolve_year(year),
        "popup": popup_for_region(repo, year, raw_name),
        "style": {
            "fill_color": style.fill_color(),
            "fill_opacity": style.fill_opacity(),
            "classification": style,
        },
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Popups for every state in a year, optionally only those at one tier.
pub fn state_popups(year: Option<i32>, tier: Option<&str>) -> anyhow::Result<Vec<PopupFields>> {
    let repo = MetricsRepository::embedded();
    let year = seed_year(repo, year)?;
    let tier = tier
        .map(|code| {
            SeverityTier::from_code(code).ok_or_else(|| anyhow!("Unknown severity tier '{}'", code))
        })
        .transpose()?;
    Ok(popups_for_year(repo, year)
        .into_iter()
        .filter(|popup| tier.map_or(true, |tier| popup.tier == tier))
        .collect())
}

pub fn run_all_states(year: Option<i32>, tier: Option<&str>) -> anyhow::Result<()> {
    let popups = state_popups(year, tier)?;
    println!("{}", serde_json::to_string_pretty(&popups)?);
    Ok(())
}

pub fn run_derive(
    rainfall_mm: f64,
    temperature_c: f64,
    reservoir_pct: f64,
    groundwater_depth_m: f64,
    population_millions: Option<f64>,
    agriculture_pct: Option<f64>,
) -> anyhow::Result<()> {
    let mut observation = Observation::new(
        rainfall_mm,
        temperature_c,
        reservoir_pct,
        groundwater_depth_m,
        Provenance::simulated("entered manually"),
    );
    if let (Some(population_millions), Some(agriculture_pct)) = (population_millions, agriculture_pct) {
        observation = observation.with_impact(ImpactEstimate {
            population_millions,
            agriculture_pct,
        });
    }
    let payload = json!({
        "derived": build_derived(&observation),
        "alert": alert_status(&observation),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
