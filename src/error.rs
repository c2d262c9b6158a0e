//! Error types for sprint configuration.
//!
//! Uses miette for diagnostics, so the shell can print a code and a hint next to the offending value.

use miette::Diagnostic;

/// Configuration invariant violations.
///
/// These are only ever produced while building a [`crate::SprintConfig`] or while doing
/// date arithmetic on one; a validated config always resolves.
#[derive(Clone, Debug, Diagnostic, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
	#[error("working weekday set is empty")]
	#[diagnostic(code(sprint::config::empty_weekdays), help("list at least one ISO weekday, e.g. `1,2,3,4,5` or `mon-fri`"))]
	EmptyWorkingWeekdays,

	#[error("weekday {0} is out of range")]
	#[diagnostic(code(sprint::config::weekday_range), help("ISO weekdays are numbered 1 (Monday) through 7 (Sunday)"))]
	WeekdayOutOfRange(u8),

	#[error("unknown weekday `{0}`")]
	#[diagnostic(code(sprint::config::unknown_weekday), help("use numbers 1-7 or names like `mon`, `tue`, `sunday`; ranges like `mon-fri` are allowed"))]
	UnknownWeekday(String),

	#[error("sprint length of {0} weeks is invalid")]
	#[diagnostic(code(sprint::config::sprint_length), help("sprint length must be at least 1 week"))]
	InvalidSprintLength(u32),

	#[error("refresh interval of {0} minutes is invalid")]
	#[diagnostic(code(sprint::config::refresh_interval), help("use 1 to 10080 minutes (one week); 15, 30 and 60 are typical"))]
	InvalidRefreshInterval(u64),

	#[error("date arithmetic overflowed while {context}")]
	#[diagnostic(code(sprint::config::overflow), help("move the epoch closer to the dates you are querying"))]
	ArithmeticOverflow { context: String },
}

impl ConfigError {
	pub(crate) fn overflow(context: impl Into<String>) -> Self {
		Self::ArithmeticOverflow { context: context.into() }
	}
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
