//! Settings: where the sprint rules and display preferences come from.
//!
//! Sources, later ones overriding earlier ones:
//! - built-in defaults
//! - `$XDG_CONFIG_HOME/sprint/config.toml` (or an explicit `--config` path)
//! - `SPRINT_<SECTION>__<FIELD>` environment variables, e.g. `SPRINT_SPRINT__LENGTH_WEEKS=3`
//!
//! None of this is needed by the calculator itself; it only ever sees the [`SprintConfig`] built from here.

use std::{
	path::{Path, PathBuf},
	time::Duration,
};

use clap::ValueEnum;
use jiff::civil::Date;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use tracing::debug;

use crate::{
	calendar::{first_monday_of_iso_week1, first_monday_on_or_after_jan1, iso_week_year},
	display::DisplayOptions,
	error::ConfigError,
	sprint::{SprintConfig, validate_sprint_length},
	workdays::WeekdaySet,
};

pub static EXE_NAME: &str = "sprint";
const CONFIG_FILENAME: &str = "config.toml";
const ENV_PREFIX: &str = "SPRINT";
/// One week.
pub const MAX_REFRESH_MINUTES: u64 = 7 * 24 * 60;

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum SettingsError {
	#[error("failed to read {path}")]
	#[diagnostic(code(sprint::settings::read))]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("{path} is not valid TOML")]
	#[diagnostic(code(sprint::settings::toml))]
	Toml {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("settings are malformed or have a field of the wrong type")]
	#[diagnostic(code(sprint::settings::load))]
	Load(#[from] config::ConfigError),

	#[error(transparent)]
	#[diagnostic(transparent)]
	Invalid(#[from] ConfigError),
}

/// How the epoch is picked when none is configured explicitly.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EpochRule {
	/// Monday of ISO week 1 of the current ISO week-year.
	#[default]
	IsoWeek1,
	/// First Monday on or after January 1st; days before it belong to last year's count.
	FirstMonday,
}

impl EpochRule {
	/// Epoch that counting restarts from for the year `today` is in.
	pub fn epoch_for(self, today: Date) -> Result<Date, ConfigError> {
		match self {
			Self::IsoWeek1 => first_monday_of_iso_week1(iso_week_year(today)),
			Self::FirstMonday => {
				let this_year = first_monday_on_or_after_jan1(today.year())?;
				if today >= this_year {
					return Ok(this_year);
				}
				debug!(%today, %this_year, "before this year's first Monday, counting from last year's");
				first_monday_on_or_after_jan1(today.year() - 1)
			}
		}
	}
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct SprintSettings {
	/// Explicit start of sprint #1. When unset, derived from `epoch_rule` and today's date.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub epoch: Option<Date>,
	pub epoch_rule: EpochRule,
	#[default(2)]
	pub length_weeks: u32,
	pub working_weekdays: WeekdaySet,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct RefreshSettings {
	/// How often `watch` re-renders. 15, 30 and 60 are the usual picks.
	#[default(60)]
	pub interval_minutes: u64,
}

/// `1..=MAX_REFRESH_MINUTES` minutes as a timer period.
pub fn refresh_period(minutes: u64) -> Result<Duration, ConfigError> {
	match (1..=MAX_REFRESH_MINUTES).contains(&minutes) {
		true => Ok(Duration::from_secs(minutes * 60)),
		false => Err(ConfigError::InvalidRefreshInterval(minutes)),
	}
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AppConfig {
	pub sprint: SprintSettings,
	pub display: DisplayOptions,
	pub refresh: RefreshSettings,
}

impl AppConfig {
	/// Loads from `path` if given (must exist), otherwise from the XDG config file if there is one, then applies env overrides.
	///
	/// Returns the config together with warnings about keys in the file that nothing reads.
	pub fn load(path: Option<&Path>) -> Result<(Self, Vec<String>), SettingsError> {
		let (file, required) = match path {
			Some(p) => (Some(p.to_path_buf()), true),
			None => (default_config_path(), false),
		};

		let mut builder = config::Config::builder();
		let mut warnings = Vec::new();
		if let Some(file) = &file {
			if required || file.exists() {
				warnings = unknown_keys_in_file(file)?;
			}
			debug!(path = %file.display(), required, "reading settings file");
			builder = builder.add_source(config::File::new(&file.to_string_lossy(), config::FileFormat::Toml).required(required));
		}
		let builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__").try_parsing(true));

		let app: AppConfig = builder.build()?.try_deserialize()?;
		app.validate()?;
		Ok((app, warnings))
	}

	/// Checks what can be checked without knowing today's date.
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_sprint_length(self.sprint.length_weeks)?;
		refresh_period(self.refresh.interval_minutes)?;
		Ok(())
	}

	/// Builds the calculator's input. `today` only matters when the epoch is derived from a rule.
	pub fn sprint_config(&self, today: Date) -> Result<SprintConfig, ConfigError> {
		let epoch = match self.sprint.epoch {
			Some(epoch) => epoch,
			None => self.sprint.epoch_rule.epoch_for(today)?,
		};
		SprintConfig::new(epoch, self.sprint.length_weeks, self.sprint.working_weekdays)
	}

	pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
		toml::to_string_pretty(self)
	}
}

pub fn default_config_path() -> Option<PathBuf> {
	xdg::BaseDirectories::with_prefix(EXE_NAME).find_config_file(CONFIG_FILENAME)
}

const KNOWN_KEYS: &[(&str, &[&str])] = &[
	("sprint", &["epoch", "epoch_rule", "length_weeks", "working_weekdays"]),
	(
		"display",
		&["show_emoji", "show_sprint_number", "show_day_count", "non_working_display", "team_name", "date_format", "labels"],
	),
	("display.labels", &["sprint", "day", "day_off", "week", "of", "working_days_left", "calendar_week"]),
	("refresh", &["interval_minutes"]),
];

fn unknown_keys_in_file(path: &Path) -> Result<Vec<String>, SettingsError> {
	let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read { path: path.to_path_buf(), source })?;
	let table: toml::Table = toml::from_str(&content).map_err(|source| SettingsError::Toml { path: path.to_path_buf(), source })?;
	Ok(unknown_keys(&table))
}

/// Warnings for sections and fields that would be silently ignored.
pub fn unknown_keys(table: &toml::Table) -> Vec<String> {
	fn walk(prefix: &str, table: &toml::Table, out: &mut Vec<String>) {
		let Some((_, fields)) = KNOWN_KEYS.iter().find(|(section, _)| *section == prefix) else {
			return;
		};
		for (key, value) in table {
			if !fields.contains(&key.as_str()) {
				out.push(format!("warning: unknown configuration field '[{prefix}].{key}' will be ignored"));
			} else if let toml::Value::Table(sub) = value {
				walk(&format!("{prefix}.{key}"), sub, out);
			}
		}
	}

	let mut out = Vec::new();
	for (key, value) in table {
		match (KNOWN_KEYS.iter().any(|(section, _)| *section == key.as_str()), value) {
			(true, toml::Value::Table(sub)) => walk(key, sub, &mut out),
			(true, _) => out.push(format!("warning: configuration key '{key}' should be a section")),
			(false, _) => out.push(format!("warning: unknown configuration section '[{key}]' will be ignored")),
		}
	}
	out
}

/// Get/set access to the sprint rules, as a settings UI would use it.
///
/// Setters validate before storing; a rejected value leaves the previous one in place.
pub trait SettingsStore {
	fn get(&self) -> &SprintSettings;
	fn set_epoch(&mut self, epoch: Option<Date>);
	fn set_epoch_rule(&mut self, rule: EpochRule);
	fn set_length_weeks(&mut self, weeks: u32) -> Result<(), ConfigError>;
	fn set_working_weekdays(&mut self, weekdays: &[u8]) -> Result<(), ConfigError>;
	fn reset_to_defaults(&mut self);
}

/// In-process store over an [`AppConfig`].
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
	app: AppConfig,
}

impl MemorySettings {
	pub fn new(app: AppConfig) -> Self {
		Self { app }
	}

	pub fn app(&self) -> &AppConfig {
		&self.app
	}

	pub fn into_app(self) -> AppConfig {
		self.app
	}
}

impl SettingsStore for MemorySettings {
	fn get(&self) -> &SprintSettings {
		&self.app.sprint
	}

	fn set_epoch(&mut self, epoch: Option<Date>) {
		self.app.sprint.epoch = epoch;
	}

	fn set_epoch_rule(&mut self, rule: EpochRule) {
		self.app.sprint.epoch_rule = rule;
	}

	fn set_length_weeks(&mut self, weeks: u32) -> Result<(), ConfigError> {
		self.app.sprint.length_weeks = validate_sprint_length(weeks)?;
		Ok(())
	}

	fn set_working_weekdays(&mut self, weekdays: &[u8]) -> Result<(), ConfigError> {
		self.app.sprint.working_weekdays = WeekdaySet::new(weekdays.iter().copied())?;
		Ok(())
	}

	fn reset_to_defaults(&mut self) {
		self.app.sprint = SprintSettings::default();
	}
}
