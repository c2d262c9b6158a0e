//! Working weekday sets and the per-sprint working-day arithmetic.
//!
//! Offsets are calendar days counted from the first day of a sprint (offset 0). The weekday of an offset is
//! `((start_iso_weekday - 1 + offset) % 7) + 1`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

const NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Non-empty set of ISO weekdays (1=Monday .. 7=Sunday).
#[derive(Clone, Copy, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "WeekdaySetRepr", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
	pub const MONDAY_TO_FRIDAY: Self = Self(0b001_1111);

	pub fn new(weekdays: impl IntoIterator<Item = u8>) -> Result<Self> {
		let mut bits = 0u8;
		for wd in weekdays {
			if !(1..=7).contains(&wd) {
				return Err(ConfigError::WeekdayOutOfRange(wd));
			}
			bits |= 1 << (wd - 1);
		}
		match bits {
			0 => Err(ConfigError::EmptyWorkingWeekdays),
			_ => Ok(Self(bits)),
		}
	}

	pub fn contains(&self, iso_weekday: u8) -> bool {
		(1..=7).contains(&iso_weekday) && self.0 & (1 << (iso_weekday - 1)) != 0
	}

	pub fn len(&self) -> u32 {
		self.0.count_ones()
	}

	pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
		(1..=7).filter(|wd| self.contains(*wd))
	}
}

impl Default for WeekdaySet {
	fn default() -> Self {
		Self::MONDAY_TO_FRIDAY
	}
}

impl fmt::Debug for WeekdaySet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl fmt::Display for WeekdaySet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names = self.iter().map(|wd| NAMES[(wd - 1) as usize]).collect::<Vec<_>>();
		write!(f, "{}", names.join(","))
	}
}

fn parse_weekday(s: &str) -> Result<u8> {
	let s = s.trim();
	if let Ok(n) = s.parse::<u8>() {
		return Ok(n);
	}
	let lower = s.to_ascii_lowercase();
	const FULL: [&str; 7] = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];
	FULL.iter()
		.position(|full| lower.len() >= 2 && full.starts_with(&lower))
		.map(|i| i as u8 + 1)
		.ok_or_else(|| ConfigError::UnknownWeekday(s.to_owned()))
}

/// Accepts `1,2,3`, `mon,wed,fri`, `mon-fri` and mixtures thereof.
impl FromStr for WeekdaySet {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self> {
		let mut weekdays = Vec::new();
		for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
			match part.split_once('-') {
				Some((from, to)) => {
					let (from, to) = (parse_weekday(from)?, parse_weekday(to)?);
					if from > to {
						return Err(ConfigError::UnknownWeekday(part.to_owned()));
					}
					weekdays.extend(from..=to);
				}
				None => weekdays.push(parse_weekday(part)?),
			}
		}
		Self::new(weekdays)
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeekdaySetRepr {
	List(Vec<u8>),
	Single(u8),
	Text(String),
}

impl TryFrom<WeekdaySetRepr> for WeekdaySet {
	type Error = ConfigError;

	fn try_from(repr: WeekdaySetRepr) -> Result<Self> {
		match repr {
			WeekdaySetRepr::List(list) => Self::new(list),
			WeekdaySetRepr::Single(wd) => Self::new([wd]),
			WeekdaySetRepr::Text(s) => s.parse(),
		}
	}
}

impl From<WeekdaySet> for Vec<u8> {
	fn from(set: WeekdaySet) -> Self {
		set.iter().collect()
	}
}

/// ISO weekday of the calendar day `offset` days after a day whose weekday is `start_iso_weekday`.
pub fn weekday_at(start_iso_weekday: u8, offset: u32) -> u8 {
	((start_iso_weekday as u64 - 1 + offset as u64) % 7) as u8 + 1
}

/// Cumulative working-day counts for one week, anchored at a start weekday.
///
/// `cumulative[i]` is the number of working days among offsets `0..=i`, so any offset resolves in O(1).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WeekTable {
	cumulative: [u32; 7],
	per_week: u32,
}

impl WeekTable {
	pub fn new(start_iso_weekday: u8, set: WeekdaySet) -> Self {
		let mut cumulative = [0; 7];
		let mut running = 0;
		for (i, slot) in cumulative.iter_mut().enumerate() {
			if set.contains(weekday_at(start_iso_weekday, i as u32)) {
				running += 1;
			}
			*slot = running;
		}
		Self { cumulative, per_week: set.len() }
	}

	/// Working days among offsets `0..=offset`.
	pub fn count_through(&self, offset: u32) -> u32 {
		(offset / 7) * self.per_week + self.cumulative[(offset % 7) as usize]
	}
}

/// Offset of the last working day in a sprint of `calendar_days_in_sprint` days.
///
/// Falls back to the last calendar day if no offset qualifies, which a non-empty set rules out for any sprint of a week or more.
pub fn last_working_day_offset(calendar_days_in_sprint: u32, start_iso_weekday: u8, set: WeekdaySet) -> u32 {
	let last = calendar_days_in_sprint.saturating_sub(1);
	(0..calendar_days_in_sprint)
		.rev()
		.find(|offset| set.contains(weekday_at(start_iso_weekday, *offset)))
		.unwrap_or(last)
}

/// Number of working days in `[0, offset]`, inclusive of the day at `offset` itself.
pub fn working_day_index(offset: u32, start_iso_weekday: u8, set: WeekdaySet) -> u32 {
	WeekTable::new(start_iso_weekday, set).count_through(offset)
}

/// First working offset at or after `offset`. Always within 6 days of it, so it can point past the end of the sprint.
pub fn next_working_day_offset(offset: u32, start_iso_weekday: u8, set: WeekdaySet) -> u32 {
	(offset..=offset.saturating_add(6))
		.find(|o| set.contains(weekday_at(start_iso_weekday, *o)))
		.unwrap_or(offset)
}
