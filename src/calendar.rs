//! Gregorian calendar helpers with ISO-8601 (Monday-first) week numbering.
//!
//! Everything here works on civil dates; nothing reads the system clock or locale.

use jiff::{
	Span,
	civil::{Date, ISOWeekDate, Weekday},
};

use crate::error::{ConfigError, Result};

/// Monday of ISO week 1 of the given ISO week-year.
///
/// Week 1 is the week containing the year's first Thursday, so this can fall in late December of the previous calendar year
/// (e.g. week 1 of 2026 starts on 2025-12-29).
pub fn first_monday_of_iso_week1(year: i16) -> Result<Date> {
	ISOWeekDate::new(year, 1, Weekday::Monday)
		.map(|iso| iso.date())
		.map_err(|_| ConfigError::overflow(format!("looking up ISO week 1 of {year}")))
}

/// First Monday on or after January 1st of the given calendar year.
///
/// Older rule, kept selectable as [`crate::config::EpochRule::FirstMonday`]. Differs from [`first_monday_of_iso_week1`] whenever Jan 1 is a Tuesday, Wednesday or Thursday.
pub fn first_monday_on_or_after_jan1(year: i16) -> Result<Date> {
	let jan1 = Date::new(year, 1, 1).map_err(|_| ConfigError::overflow(format!("building January 1st of {year}")))?;
	let days_to_monday = (8 - iso_weekday(jan1)) % 7;
	add_days(jan1, days_to_monday as i64)
}

/// Monday=1 .. Sunday=7.
pub fn iso_weekday(date: Date) -> u8 {
	date.weekday().to_monday_one_offset() as u8
}

/// Converts a Sunday=1 .. Saturday=7 weekday number (as used by most platform calendars) to ISO numbering.
pub fn iso_weekday_from_sunday_one(weekday: u8) -> Result<u8> {
	if !(1..=7).contains(&weekday) {
		return Err(ConfigError::WeekdayOutOfRange(weekday));
	}
	Ok(((weekday + 5) % 7) + 1)
}

/// Monday of the week `date` is in. Idempotent.
pub fn snap_to_monday(date: Date) -> Date {
	let back = (iso_weekday(date) - 1) as i64;
	date.saturating_sub(Span::new().days(back))
}

pub fn iso_week_number(date: Date) -> u8 {
	date.iso_week_date().week() as u8
}

/// ISO week-year; differs from the calendar year around New Year.
pub fn iso_week_year(date: Date) -> i16 {
	date.iso_week_date().year()
}

/// Whole days from `from` to `to`; negative when `to` precedes `from`.
pub fn days_between(from: Date, to: Date) -> Result<i64> {
	let span = from.until(to).map_err(|_| ConfigError::overflow(format!("counting days from {from} to {to}")))?;
	Ok(span.get_days() as i64)
}

pub fn add_days(date: Date, days: i64) -> Result<Date> {
	let span = Span::new().try_days(days).map_err(|_| ConfigError::overflow(format!("building a span of {days} days")))?;
	date.checked_add(span).map_err(|_| ConfigError::overflow(format!("adding {days} days to {date}")))
}
