//! Date and date-time formatting of condition values.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use thiserror::Error;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats date-typed condition values. Unparseable input is returned unchanged.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, value: &str) -> String;
    fn format_datetime(&self, value: &str) -> String;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid date format pattern: {pattern}")]
pub struct InvalidDateFormat {
    pub pattern: String,
}

/// strftime-based formatter.
///
/// Accepts RFC 3339 timestamps (rendered in their own offset), naive
/// date-times and plain dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChronoDateFormatter {
    date_format: String,
    datetime_format: String,
}

enum Parsed {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    Date(NaiveDate),
}

impl ChronoDateFormatter {
    pub fn new(
        date_format: impl Into<String>,
        datetime_format: impl Into<String>,
    ) -> Result<Self, InvalidDateFormat> {
        let date_format = date_format.into();
        let datetime_format = datetime_format.into();
        check_pattern(&date_format)?;
        check_pattern(&datetime_format)?;
        Ok(Self {
            date_format,
            datetime_format,
        })
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }

    fn render(&self, parsed: Parsed, pattern: &str, date_only: bool) -> Option<String> {
        let mut out = String::new();
        let result = match parsed {
            Parsed::Zoned(dt) if date_only => write!(out, "{}", dt.date_naive().format(pattern)),
            Parsed::Zoned(dt) => write!(out, "{}", dt.format(pattern)),
            Parsed::Naive(dt) if date_only => write!(out, "{}", dt.date().format(pattern)),
            Parsed::Naive(dt) => write!(out, "{}", dt.format(pattern)),
            Parsed::Date(date) if date_only => write!(out, "{}", date.format(pattern)),
            Parsed::Date(date) => {
                let midnight = date.and_hms_opt(0, 0, 0)?;
                write!(out, "{}", midnight.format(pattern))
            }
        };
        result.ok().map(|_| out)
    }
}

impl Default for ChronoDateFormatter {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl DateFormatter for ChronoDateFormatter {
    fn format_date(&self, value: &str) -> String {
        parse(value)
            .and_then(|parsed| self.render(parsed, &self.date_format, true))
            .unwrap_or_else(|| value.to_string())
    }

    fn format_datetime(&self, value: &str) -> String {
        parse(value)
            .and_then(|parsed| self.render(parsed, &self.datetime_format, false))
            .unwrap_or_else(|| value.to_string())
    }
}

fn parse(value: &str) -> Option<Parsed> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(Parsed::Zoned(dt));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(Parsed::Naive(dt));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(Parsed::Date)
}

fn check_pattern(pattern: &str) -> Result<(), InvalidDateFormat> {
    let invalid = pattern.trim().is_empty()
        || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
    if invalid {
        return Err(InvalidDateFormat {
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}
