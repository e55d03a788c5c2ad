//! Shared utility functions for JalDrishti crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, NaiveDate, TimeZone};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Export timestamp as written into report metadata rows,
    /// day-first like the Indian locale: "19/10/2026, 14:05:09".
    pub fn format_export_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        at.format("%d/%m/%Y, %H:%M:%S").to_string()
    }

    /// Short wall-clock time for status lines, "14:05".
    pub fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        at.format("%H:%M").to_string()
    }

}

/// Report file naming
pub mod files {
    use chrono::NaiveDate;

    /// Product name used as the report filename prefix.
    pub const PRODUCT_NAME: &str = "JalDrishti";

    /// `<product>_Report_<location>_<YYYY-MM-DD>.csv`
    ///
    /// Path separators in the location are replaced so the name stays a
    /// single path component.
    pub fn report_filename(location: &str, date: &NaiveDate) -> String {
        let location: String = location
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
            .collect();
        format!(
            "{}_Report_{}_{}.csv",
            PRODUCT_NAME,
            location,
            super::dates::format_date(date)
        )
    }

}
