use crate::classifier::classify;
use crate::names;
use crate::observation::{Observation, Provenance};
use crate::severity::SeverityTier;
use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Embedded per-year, per-state seed metrics.
pub static SEED_CSV: &str = include_str!("../../fixtures/state_metrics.csv");

static EMBEDDED: LazyLock<MetricsRepository> = LazyLock::new(|| {
    MetricsRepository::parse_metrics_csv(SEED_CSV).expect("embedded state_metrics.csv is valid")
});

/// One row of the seed CSV.
#[derive(Debug, Deserialize)]
struct SeedRow {
    year: i32,
    state: String,
    rainfall_mm: f64,
    temperature_c: f64,
    reservoir_pct: f64,
    groundwater_m: f64,
}

/// Seed observations for one state in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub canonical_name: String,
    pub rainfall_mm: f64,
    pub temperature_c: f64,
    pub reservoir_pct: f64,
    pub groundwater_depth_m: f64,
}

impl StateRecord {
    pub fn observation(&self) -> Observation {
        Observation::new(
            self.rainfall_mm,
            self.temperature_c,
            self.reservoir_pct,
            self.groundwater_depth_m,
            Provenance::Seed,
        )
    }

    /// Severity recomputed from this record's rainfall and temperature.
    pub fn tier(&self) -> SeverityTier {
        classify(self.rainfall_mm, self.temperature_c)
    }
}

impl From<SeedRow> for StateRecord {
    fn from(row: SeedRow) -> Self {
        StateRecord {
            canonical_name: row.state,
            rainfall_mm: row.rainfall_mm,
            temperature_c: row.temperature_c,
            reservoir_pct: row.reservoir_pct,
            groundwater_depth_m: row.groundwater_m,
        }
    }
}

/// All state records for a single year, keyed by canonical name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YearSlice {
    pub year: i32,
    states: BTreeMap<String, StateRecord>,
}

impl YearSlice {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            states: BTreeMap::new(),
        }
    }

    pub fn from_records<I>(year: i32, records: I) -> Self
    where
        I: IntoIterator<Item = StateRecord>,
    {
        let mut slice = YearSlice::new(year);
        for record in records {
            slice.insert(record);
        }
        slice
    }

    pub fn get(&self, canonical_name: &str) -> Option<&StateRecord> {
        self.states.get(canonical_name)
    }

    /// Records in canonical-name order.
    pub fn records(&self) -> impl Iterator<Item = &StateRecord> {
        self.states.values()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn insert(&mut self, record: StateRecord) {
        if let Some(previous) = self.states.insert(record.canonical_name.clone(), record) {
            warn!(
                "Duplicate seed entry for {} in {}; keeping the later row",
                previous.canonical_name, self.year
            );
        }
    }
}

/// Read-only table of year -> canonical state -> record.
///
/// Built once from seed data; no mutation is exposed afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsRepository {
    years: BTreeMap<i32, YearSlice>,
}

impl MetricsRepository {
    /// The process-wide repository parsed from [`SEED_CSV`].
    pub fn embedded() -> &'static MetricsRepository {
        &EMBEDDED
    }

    /// Parse a CSV string of seed metrics.
    ///
    /// Expected CSV columns: year, state, rainfall_mm, temperature_c,
    /// reservoir_pct, groundwater_m
    pub fn parse_metrics_csv(csv_object: &str) -> Result<MetricsRepository, csv::Error> {
        let mut years: BTreeMap<i32, YearSlice> = BTreeMap::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(csv_object.as_bytes());
        for row in rdr.deserialize::<SeedRow>() {
            let row = row?;
            let year = row.year;
            years
                .entry(year)
                .or_insert_with(|| YearSlice::new(year))
                .insert(row.into());
        }
        Ok(MetricsRepository { years })
    }

    /// Years present, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// The effective "current" year.
    pub fn latest_year(&self) -> Option<i32> {
        self.years.keys().next_back().copied()
    }

    /// Returns `year` if present, otherwise the latest available year.
    pub fn resolve_year(&self, year: i32) -> Option<i32> {
        if self.years.contains_key(&year) {
            return Some(year);
        }
        let latest = self.latest_year()?;
        info!("No metrics for {}, falling back to {}", year, latest);
        Some(latest)
    }

    /// The slice for `year`, falling back to the latest year.
    pub fn slice(&self, year: i32) -> Option<&YearSlice> {
        self.resolve_year(year)
            .and_then(|resolved| self.years.get(&resolved))
    }

    pub fn record(&self, year: i32, canonical_name: &str) -> Option<&StateRecord> {
        self.slice(year)?.get(canonical_name)
    }

    /// Seed observation for a canonical state, or `None` when the state has
    /// no entry in the (resolved) year.
    pub fn lookup(&self, year: i32, canonical_name: &str) -> Option<Observation> {
        self.record(year, canonical_name)
            .map(StateRecord::observation)
    }

    /// Like [`lookup`](Self::lookup) but substitutes the documented default
    /// observation on a miss.
    pub fn lookup_or_default(&self, year: i32, canonical_name: &str) -> Observation {
        self.lookup(year, canonical_name).unwrap_or_else(|| {
            warn!(
                "No metrics for '{}' in {}, using default observation",
                canonical_name, year
            );
            Observation::fallback()
        })
    }

    /// Resolves a raw boundary name first, then looks it up.
    pub fn lookup_raw<'a>(&self, year: i32, raw_name: &'a str) -> (&'a str, Option<Observation>) {
        let canonical = names::resolve(raw_name);
        (canonical, self.lookup(year, canonical))
    }
}
