//! Time-of-day, date-time and calendar-date formatting
//!
//! Formats use `strftime` syntax. An empty format renders ISO 8601 text. A
//! format chrono cannot render (unknown specifier, or a date specifier applied
//! to a time of day) is reported as [`SerializeError::InvalidFormat`] instead of
//! panicking.

use std::fmt::{Display, Write};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SerializeError};

const ISO_TIME: &str = "%H:%M:%S%.f";
const ISO_DATE: &str = "%Y-%m-%d";
const ISO_NAIVE_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f";
const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

fn or_iso<'a>(format: &'a str, iso: &'static str) -> &'a str {
	if format.is_empty() { iso } else { format }
}

/// Format a time of day; the time zone context does not apply to it
pub fn format_time(value: &NaiveTime, format: &str) -> Result<String> {
	render(value.format(or_iso(format, ISO_TIME)), "time", format)
}

/// Convert into `tz` when given, then format
pub fn format_datetime(value: &DateTime<FixedOffset>, format: &str, tz: Option<&Tz>) -> Result<String> {
	let pattern = or_iso(format, ISO_DATETIME);
	match tz {
		Some(tz) => render(value.with_timezone(tz).format(pattern), "datetime", format),
		None => render(value.format(pattern), "datetime", format),
	}
}

/// Format a naive date-time, taken as UTC when it has to be converted into `tz`
///
/// Without a time zone an empty format renders the date-time without an offset.
pub fn format_naive_datetime(value: &NaiveDateTime, format: &str, tz: Option<&Tz>) -> Result<String> {
	match tz {
		Some(tz) => {
			let utc = Utc.from_utc_datetime(value);
			let pattern = or_iso(format, ISO_DATETIME);
			render(utc.with_timezone(tz).format(pattern), "datetime", format)
		}
		None => render(value.format(or_iso(format, ISO_NAIVE_DATETIME)), "datetime", format),
	}
}

pub fn format_date(value: &NaiveDate, format: &str) -> Result<String> {
	render(value.format(or_iso(format, ISO_DATE)), "date", format)
}

fn render(formatted: impl Display, kind: &'static str, format: &str) -> Result<String> {
	let mut out = String::new();
	write!(out, "{formatted}").map_err(|_| SerializeError::invalid_format(kind, format))?;
	Ok(out)
}
