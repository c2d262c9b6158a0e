//! Sprint resolution: which sprint a day falls in, and where inside it.

use std::sync::Mutex;

use jiff::civil::Date;
use serde::Serialize;
use tracing::debug;

use crate::{
	calendar::{add_days, days_between, iso_week_number, iso_week_year, iso_weekday, snap_to_monday},
	error::{ConfigError, Result},
	workdays::{WeekTable, WeekdaySet, last_working_day_offset, next_working_day_offset},
};

/// Longest sprint we accept. A sprint has to fit into jiff's date range many times over.
pub const MAX_SPRINT_LENGTH_WEEKS: u32 = 520;

/// Accepts `1..=MAX_SPRINT_LENGTH_WEEKS`.
pub fn validate_sprint_length(weeks: u32) -> Result<u32> {
	match (1..=MAX_SPRINT_LENGTH_WEEKS).contains(&weeks) {
		true => Ok(weeks),
		false => Err(ConfigError::InvalidSprintLength(weeks)),
	}
}

/// Validated sprint rules. Cheap to copy; pass a fresh one into every [`resolve`] call.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct SprintConfig {
	epoch: Date,
	sprint_length_weeks: u32,
	working_weekdays: WeekdaySet,
}

impl SprintConfig {
	/// Snaps `epoch` to its Monday. Rejects zero-length (or absurdly long) sprints.
	pub fn new(epoch: Date, sprint_length_weeks: u32, working_weekdays: WeekdaySet) -> Result<Self> {
		Ok(Self {
			epoch: snap_to_monday(epoch),
			sprint_length_weeks: validate_sprint_length(sprint_length_weeks)?,
			working_weekdays,
		})
	}

	pub fn epoch(&self) -> Date {
		self.epoch
	}

	pub fn sprint_length_weeks(&self) -> u32 {
		self.sprint_length_weeks
	}

	pub fn working_weekdays(&self) -> WeekdaySet {
		self.working_weekdays
	}

	pub fn calendar_days_per_sprint(&self) -> u32 {
		self.sprint_length_weeks * 7
	}

	pub fn total_working_days(&self) -> u32 {
		self.sprint_length_weeks * self.working_weekdays.len()
	}
}

/// Everything there is to know about the sprint a given day falls in. Built by [`resolve`], never mutated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SprintDescriptor {
	/// 1-based sprint number since the epoch.
	pub index: u32,
	/// Monday the sprint starts on.
	pub start_date: Date,
	/// Last *working* day of the sprint, not necessarily its last calendar day.
	pub end_date: Date,
	/// Position of the day among the sprint's working days, pinned into `1..=total_working_days`.
	pub current_working_day: u32,
	/// Working days in `[start_date, day]`, including the day itself. Unpinned, so 0 before the first working day.
	pub working_days_elapsed: u32,
	pub total_working_days: u32,
	pub is_non_working_day: bool,
	/// The day itself when it is a working day, otherwise the next one. Lies in the following sprint after the last working day.
	pub next_working_date: Date,
	/// Calendar days since `start_date`.
	pub day_offset: u32,
	pub sprint_length_weeks: u32,
}

impl SprintDescriptor {
	pub fn week_in_sprint(&self) -> u32 {
		self.day_offset / 7 + 1
	}

	pub fn total_weeks(&self) -> u32 {
		self.sprint_length_weeks
	}

	/// Fraction of working days done, in `(0, 1]`.
	pub fn progress(&self) -> f64 {
		self.current_working_day as f64 / self.total_working_days as f64
	}

	pub fn remaining_working_days(&self) -> u32 {
		self.total_working_days - self.current_working_day
	}

	pub fn start_week(&self) -> u8 {
		iso_week_number(self.start_date)
	}

	pub fn end_week(&self) -> u8 {
		iso_week_number(self.end_date)
	}

	/// `2026 CW02–CW03`, or `2025 CW52–2026 CW01` when the sprint crosses into a new ISO week-year.
	pub fn label(&self) -> String {
		let (start_year, end_year) = (iso_week_year(self.start_date), iso_week_year(self.end_date));
		if start_year == end_year {
			format!("{start_year} CW{:02}–CW{:02}", self.start_week(), self.end_week())
		} else {
			format!("{start_year} CW{:02}–{end_year} CW{:02}", self.start_week(), self.end_week())
		}
	}
}

/// Resolves the sprint `now` falls in.
///
/// Days before the epoch are reported as day 1 of sprint #1 rather than as an error or a negative sprint.
/// The only failure is date overflow, for epochs at the very edge of the supported range.
pub fn resolve(now: Date, config: &SprintConfig) -> Result<SprintDescriptor> {
	let epoch = snap_to_monday(config.epoch);
	let set = config.working_weekdays;
	let calendar_days_per_sprint = config.calendar_days_per_sprint();
	let total_working_days = config.total_working_days();

	let delta = days_between(epoch, now)?;
	if delta < 0 {
		debug!(%now, %epoch, "day precedes the epoch, pinning to sprint #1");
	}
	let days_since_epoch = delta.max(0);

	let sprint_index = days_since_epoch / calendar_days_per_sprint as i64;
	let day_offset = (days_since_epoch % calendar_days_per_sprint as i64) as u32;

	let start_date = add_days(epoch, sprint_index * calendar_days_per_sprint as i64)?;
	let start_weekday = iso_weekday(start_date);
	let end_date = add_days(start_date, last_working_day_offset(calendar_days_per_sprint, start_weekday, set) as i64)?;

	let working_days_elapsed = WeekTable::new(start_weekday, set).count_through(day_offset);
	let current_working_day = working_days_elapsed.clamp(1, total_working_days);
	let next_working_date = add_days(start_date, next_working_day_offset(day_offset, start_weekday, set) as i64)?;

	let index = u32::try_from(sprint_index + 1).map_err(|_| ConfigError::overflow(format!("numbering the sprint containing {now}")))?;

	let descriptor = SprintDescriptor {
		index,
		start_date,
		end_date,
		current_working_day,
		working_days_elapsed,
		total_working_days,
		is_non_working_day: !set.contains(iso_weekday(now)),
		next_working_date,
		day_offset,
		sprint_length_weeks: config.sprint_length_weeks,
	};
	debug!(?descriptor, "resolved sprint");
	Ok(descriptor)
}

/// First and last calendar day of sprint `index` (1-based).
pub fn sprint_bounds(index: u32, config: &SprintConfig) -> Result<(Date, Date)> {
	let index = index.max(1) as i64;
	let days = config.calendar_days_per_sprint() as i64;
	let start = add_days(snap_to_monday(config.epoch), (index - 1) * days)?;
	Ok((start, add_days(start, days - 1)?))
}

/// Descriptors for the first day of each of `count` sprints, starting with the one containing `from`.
///
/// Fails up front if the last of them would lie outside the supported date range.
pub fn upcoming(from: Date, count: usize, config: &SprintConfig) -> Result<Vec<SprintDescriptor>> {
	if count == 0 {
		return Ok(Vec::new());
	}
	let first = resolve(from, config)?.index;
	let last = u32::try_from(count - 1)
		.ok()
		.and_then(|n| first.checked_add(n))
		.ok_or_else(|| ConfigError::overflow(format!("listing {count} sprints from {from}")))?;
	sprint_bounds(last, config)?;

	(first..=last)
		.map(|index| {
			let (start, _) = sprint_bounds(index, config)?;
			resolve(start, config)
		})
		.collect()
}

/// Remembers the last resolution.
///
/// Purely an optimisation for shells that re-render often; safe to share between threads.
#[derive(Debug, Default)]
pub struct SprintMemo {
	last: Mutex<Option<(Date, SprintConfig, SprintDescriptor)>>,
}

impl SprintMemo {
	pub fn resolve(&self, now: Date, config: &SprintConfig) -> Result<SprintDescriptor> {
		let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		if let Some((day, cached_config, descriptor)) = last.as_ref()
			&& *day == now
			&& cached_config == config
		{
			return Ok(descriptor.clone());
		}
		let descriptor = resolve(now, config)?;
		*last = Some((now, *config, descriptor.clone()));
		Ok(descriptor)
	}
}
