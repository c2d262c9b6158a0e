//! Rendering a [`SprintDescriptor`] into status-bar, tooltip and menu text.
//!
//! Pure string builders. What to show on days off is decided here, not by the resolver.

use clap::ValueEnum;
use jiff::{civil::Date, fmt::strtime};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use tracing::warn;

use crate::sprint::SprintDescriptor;

const BAR_WIDTH: u32 = 10;
const BAR_FILLED: char = '▓';
const BAR_EMPTY: char = '░';

/// What to show as the day number when today is not a working day.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NonWorkingDisplay {
	/// "Day off" instead of a number.
	#[default]
	ShowLabel,
	/// The last working day that has passed.
	ShowPrevious,
	/// The working day coming up next.
	///
	/// Stays within the current sprint: after its last working day this shows the final day (`10/10`), same as
	/// [`Self::ShowPrevious`]. [`SprintDescriptor::next_working_date`] has the actual date.
	ShowNext,
}

/// Words used in rendered text. Override them to localise the output.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Labels {
	#[default("Sprint".to_owned())]
	pub sprint: String,
	#[default("Day".to_owned())]
	pub day: String,
	#[default("Day off".to_owned())]
	pub day_off: String,
	#[default("Week".to_owned())]
	pub week: String,
	#[default("of".to_owned())]
	pub of: String,
	#[default("working days left".to_owned())]
	pub working_days_left: String,
	#[default("CW".to_owned())]
	pub calendar_week: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct DisplayOptions {
	#[default(true)]
	pub show_emoji: bool,
	#[default(true)]
	pub show_sprint_number: bool,
	#[default(true)]
	pub show_day_count: bool,
	pub non_working_display: NonWorkingDisplay,
	/// Prefixed to the sprint name in tooltip and menu header, e.g. `Platform` → `Platform Sprint 4`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub team_name: Option<String>,
	/// strftime-style.
	#[default("%d.%m.".to_owned())]
	pub date_format: String,
	pub labels: Labels,
}

impl DisplayOptions {
	fn emoji(&self, emoji: &str) -> String {
		match self.show_emoji {
			true => format!("{emoji} "),
			false => String::new(),
		}
	}

	fn sprint_name(&self, index: u32) -> String {
		match &self.team_name {
			Some(team) if !team.is_empty() => format!("{team} {} {index}", self.labels.sprint),
			_ => format!("{} {index}", self.labels.sprint),
		}
	}
}

/// Formats with a strftime pattern; an unusable pattern falls back to ISO-8601.
pub fn format_date(date: Date, format: &str) -> String {
	match strtime::format(format, date) {
		Ok(s) => s,
		Err(e) => {
			warn!(format, error = %e, "unusable date format, falling back to ISO-8601");
			date.to_string()
		}
	}
}

fn bar(filled: u32) -> String {
	let filled = filled.min(BAR_WIDTH);
	let mut s = String::with_capacity((BAR_WIDTH * 3) as usize);
	s.extend(std::iter::repeat_n(BAR_FILLED, filled as usize));
	s.extend(std::iter::repeat_n(BAR_EMPTY, (BAR_WIDTH - filled) as usize));
	s
}

/// Ten blocks, `floor(progress * 10)` of them filled.
pub fn progress_bar(progress: f64) -> String {
	let progress = progress.clamp(0.0, 1.0);
	bar((progress * BAR_WIDTH as f64).floor() as u32)
}

/// Same as [`progress_bar`] but in integer arithmetic, so `7/10` renders exactly 7 blocks.
pub fn sprint_progress_bar(sprint: &SprintDescriptor) -> String {
	bar(sprint.current_working_day * BAR_WIDTH / sprint.total_working_days)
}

pub fn progress_percent(sprint: &SprintDescriptor) -> u32 {
	sprint.current_working_day * 100 / sprint.total_working_days
}

/// Day number to show for `mode`, or `None` when the day-off label should be shown instead.
pub fn displayed_day(sprint: &SprintDescriptor, mode: NonWorkingDisplay) -> Option<u32> {
	if !sprint.is_non_working_day {
		return Some(sprint.current_working_day);
	}
	match mode {
		NonWorkingDisplay::ShowLabel => None,
		NonWorkingDisplay::ShowPrevious => Some(sprint.current_working_day),
		NonWorkingDisplay::ShowNext => Some((sprint.working_days_elapsed + 1).min(sprint.total_working_days)),
	}
}

/// `ISO-year CWxx–CWyy`, with the calendar-week word taken from the labels.
pub fn iso_label(sprint: &SprintDescriptor, opts: &DisplayOptions) -> String {
	sprint.label().replace("CW", &opts.labels.calendar_week)
}

/// Short text for a status bar: `🏃 Sprint 3 · Day 4/10`.
pub fn status_line(sprint: &SprintDescriptor, opts: &DisplayOptions) -> String {
	let mut head = opts.emoji("🏃");
	if opts.show_sprint_number {
		head.push_str(&format!("{} {}", opts.labels.sprint, sprint.index));
	}
	let head = head.trim_end().to_owned();

	let day = match opts.show_day_count {
		false => String::new(),
		true => match displayed_day(sprint, opts.non_working_display) {
			Some(day) => format!("{} {day}/{}", opts.labels.day, sprint.total_working_days),
			None => format!("{}{}", opts.emoji("🎉"), opts.labels.day_off),
		},
	};

	match (head.is_empty(), day.is_empty()) {
		(true, true) => opts.labels.sprint.clone(),
		(false, true) => head,
		(true, false) => day,
		(false, false) => format!("{head} · {day}"),
	}
}

fn week_span(sprint: &SprintDescriptor, opts: &DisplayOptions) -> String {
	let cw = &opts.labels.calendar_week;
	format!("{cw} {} – {cw} {}", sprint.start_week(), sprint.end_week())
}

/// Three lines: name with calendar weeks, date range, working days left.
pub fn tooltip(sprint: &SprintDescriptor, opts: &DisplayOptions) -> String {
	let cw = &opts.labels.calendar_week;
	format!(
		"{} ({cw}{}–{cw}{})\n{}–{}\n{} {}",
		opts.sprint_name(sprint.index),
		sprint.start_week(),
		sprint.end_week(),
		format_date(sprint.start_date, &opts.date_format),
		format_date(sprint.end_date, &opts.date_format),
		sprint.remaining_working_days(),
		opts.labels.working_days_left,
	)
}

/// Menu items, top to bottom: header, calendar weeks, date range, week, day, remaining days, progress.
pub fn menu_lines(sprint: &SprintDescriptor, opts: &DisplayOptions) -> Vec<String> {
	let labels = &opts.labels;
	let day_line = match displayed_day(sprint, opts.non_working_display) {
		Some(day) => format!("{}{} {day} {} {}", opts.emoji("⏱️"), labels.day, labels.of, sprint.total_working_days),
		None => format!("{}{}", opts.emoji("🎉"), labels.day_off),
	};
	vec![
		opts.sprint_name(sprint.index),
		format!("{}{}", opts.emoji("📅"), week_span(sprint, opts)),
		format!(
			"{}{} – {}",
			opts.emoji("📆"),
			format_date(sprint.start_date, &opts.date_format),
			format_date(sprint.end_date, &opts.date_format)
		),
		format!("{}{} {} {} {}", opts.emoji("📊"), labels.week, sprint.week_in_sprint(), labels.of, sprint.total_weeks()),
		day_line,
		format!("{}{} {}", opts.emoji("⏳"), sprint.remaining_working_days(), labels.working_days_left),
		format!("{} {}%", sprint_progress_bar(sprint), progress_percent(sprint)),
	]
}
