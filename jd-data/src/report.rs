//! CSV report of the current observation plus a year's state-wise table.

use crate::metrics::MetricKind;
use anyhow::{anyhow, Context};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use jd_core::{classify, Observation, YearSlice};
use jd_utils::dates::format_export_timestamp;
use jd_utils::files::report_filename;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const FILLER: &str = "—";

pub const SUMMARY_HEADER: [&str; 4] = ["Metric", "Value", "Unit", "Status"];

const BULK_COLUMNS: [&str; 5] = [
    "Rainfall (mm)",
    "Temp (°C)",
    "Reservoir (%)",
    "Groundwater (m)",
    "Drought Severity",
];

/// Ordered report rows. Rows before `bulk_start` form the summary section;
/// the bulk section starts with its own header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    rows: Vec<Vec<String>>,
    bulk_start: usize,
}

impl Report {
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header plus metadata and metric rows.
    pub fn summary(&self) -> &[Vec<String>] {
        &self.rows[..self.bulk_start - 1]
    }

    /// Bulk header followed by one row per state.
    pub fn bulk(&self) -> &[Vec<String>] {
        &self.rows[self.bulk_start..]
    }

    pub fn to_csv(&self) -> anyhow::Result<String> {
        render_csv(&self.rows)
    }
}

fn row<I, S>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: ToString,
{
    cells.into_iter().map(|c| c.to_string()).collect()
}

/// Builds the report stamped with the local time.
pub fn build_report(observation: &Observation, location: &str, snapshot: &YearSlice) -> Report {
    build_report_at(observation, location, snapshot, &Local::now())
}

pub fn build_report_at<Tz: TimeZone>(
    observation: &Observation,
    location: &str,
    snapshot: &YearSlice,
    exported_at: &DateTime<Tz>,
) -> Report
where
    Tz::Offset: std::fmt::Display,
{
    let tier = classify(observation.rainfall_mm, observation.temperature_c);
    let code = tier.code();

    let stamp = format_export_timestamp(exported_at);

    let mut rows = vec![
        row(SUMMARY_HEADER),
        row(["Location", location, FILLER, FILLER]),
        row(["Export Date", stamp.as_str(), FILLER, FILLER]),
    ];

    let metric_row = |metric: MetricKind, value: f64| {
        vec![
            metric.label().to_string(),
            value.to_string(),
            metric.unit().to_string(),
            code.to_string(),
        ]
    };
    rows.push(metric_row(MetricKind::Rainfall, observation.rainfall_mm));
    rows.push(metric_row(MetricKind::Temperature, observation.temperature_c));
    rows.push(metric_row(MetricKind::Reservoir, observation.reservoir_pct));
    rows.push(row([
        "Groundwater Depth".to_string(),
        observation.groundwater_depth_m.to_string(),
        "m".to_string(),
        code.to_string(),
    ]));
    rows.push(row([
        MetricKind::DroughtSeverity.label(),
        tier.label(),
        FILLER,
        code,
    ]));
    if let Some(impact) = observation.impact {
        rows.push(metric_row(MetricKind::Population, impact.population_millions));
        rows.push(metric_row(MetricKind::Agriculture, impact.agriculture_pct));
    }

    rows.push(Vec::new());
    let bulk_start = rows.len();

    let mut bulk_header = vec![format!("State-wise Data ({})", snapshot.year)];
    bulk_header.extend(BULK_COLUMNS.iter().map(|c| c.to_string()));
    rows.push(bulk_header);
    for record in snapshot.records() {
        rows.push(row([
            record.canonical_name.clone(),
            record.rainfall_mm.to_string(),
            record.temperature_c.to_string(),
            record.reservoir_pct.to_string(),
            record.groundwater_depth_m.to_string(),
            record.tier().label().to_string(),
        ]));
    }

    Report { rows, bulk_start }
}

/// Every cell double-quoted, records joined by `\n`, no trailing newline.
/// An empty row renders as an empty line.
pub fn render_csv(rows: &[Vec<String>]) -> anyhow::Result<String> {
    let mut lines = Vec::with_capacity(rows.len());
    for cells in rows {
        if cells.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(cells)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("failed to flush csv row: {}", e.error()))?;
        let mut line = String::from_utf8(bytes)?;
        if line.ends_with('\n') {
            line.pop();
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Writes the report into `dir` under the standard filename.
pub fn write_report(
    dir: &Path,
    location: &str,
    date: &NaiveDate,
    report: &Report,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(report_filename(location, date));
    let body = report.to_csv()?;
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote report for {} to {}", location, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jd_core::{ImpactEstimate, MetricsRepository, Provenance};

    fn rajasthan() -> Observation {
        Observation::new(15.0, 42.0, 28.0, 45.0, Provenance::Live)
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_rajasthan_report_has_extreme_row() {
        let slice = MetricsRepository::embedded().slice(2025).unwrap();
        let report = build_report_at(&rajasthan(), "Rajasthan", slice, &fixed_time());
        let expected: Vec<String> = row(["Drought Severity", "Extreme", "—", "EXTREME"]);
        assert!(report.rows().contains(&expected));
        assert_eq!(report.summary()[1], row(["Location", "Rajasthan", "—", "—"]));
        assert_eq!(
            report.summary()[2],
            row(["Export Date", "01/06/2025, 10:30:00", "—", "—"])
        );
        assert_eq!(
            report.summary()[3],
            row(["Monthly Rainfall", "15", "mm", "EXTREME"])
        );
    }

    #[test]
    fn test_bulk_section_has_one_row_per_state() {
        let repo = MetricsRepository::embedded();
        for year in repo.years() {
            let slice = repo.slice(year).unwrap();
            let report = build_report_at(&rajasthan(), "Delhi", slice, &fixed_time());
            assert_eq!(report.bulk().len(), slice.len() + 1);
            assert_eq!(report.bulk()[0][0], format!("State-wise Data ({year})"));
        }
    }

    #[test]
    fn test_rows_match_section_header_width() {
        let slice = MetricsRepository::embedded().slice(2024).unwrap();
        let observation = rajasthan().with_impact(ImpactEstimate {
            population_millions: 34.0,
            agriculture_pct: 28.0,
        });
        let report = build_report_at(&observation, "Delhi", slice, &fixed_time());
        let summary = report.summary();
        assert_eq!(summary.len(), 10);
        assert!(summary.iter().all(|r| r.len() == summary[0].len()));
        let bulk = report.bulk();
        assert!(bulk.iter().all(|r| r.len() == bulk[0].len()));
    }

    #[test]
    fn test_impact_rows_only_when_present() {
        let slice = MetricsRepository::embedded().slice(2023).unwrap();
        let report = build_report_at(&rajasthan(), "Delhi", slice, &fixed_time());
        assert_eq!(report.summary().len(), 8);
        assert!(!report
            .rows()
            .iter()
            .any(|r| r.first().is_some_and(|c| c == "Population at Risk")));
    }

    #[test]
    fn test_state_tier_is_recomputed() {
        let slice = YearSlice::from_records(
            2025,
            [jd_core::StateRecord {
                canonical_name: "Kerala".to_string(),
                rainfall_mm: 10.0,
                temperature_c: 45.0,
                reservoir_pct: 90.0,
                groundwater_depth_m: 12.0,
            }],
        );
        let report = build_report_at(&rajasthan(), "Kerala", &slice, &fixed_time());
        assert_eq!(
            report.bulk()[1],
            row(["Kerala", "10", "45", "90", "12", "Extreme"])
        );
    }

    #[test]
    fn test_render_csv_quotes_everything() {
        let rows = vec![
            row(["Metric", "Value"]),
            Vec::new(),
            row(["Say \"hi\"", "1.5"]),
        ];
        let csv = render_csv(&rows).unwrap();
        assert_eq!(csv, "\"Metric\",\"Value\"\n\n\"Say \"\"hi\"\"\",\"1.5\"");
    }

    #[test]
    fn test_write_report() {
        let dir = std::env::temp_dir().join(format!("jd-report-test-{}", std::process::id()));
        let slice = MetricsRepository::embedded().slice(2023).unwrap();
        let report = build_report_at(&rajasthan(), "Rajasthan", slice, &fixed_time());
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let path = write_report(&dir, "Rajasthan", &date, &report).unwrap();
        assert!(path.ends_with("JalDrishti_Report_Rajasthan_2025-06-01.csv"));
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("\"Metric\",\"Value\",\"Unit\",\"Status\"\n"));
        assert!(!body.ends_with('\n'));
        fs::remove_dir_all(&dir).unwrap();
    }
}
