use std::{path::PathBuf, sync::Mutex};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use jiff::{Zoned, civil::Date};
use serde::Serialize;
use sprint::{
	DisplayOptions, NonWorkingDisplay, SprintDescriptor, WeekdaySet,
	config::{AppConfig, EpochRule, MemorySettings, SettingsStore},
	display, sprint as calc,
};
use tracing_subscriber::{EnvFilter, prelude::*};

mod shell_init;
mod watch;

#[derive(Parser)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
	/// Settings file. Defaults to $XDG_CONFIG_HOME/sprint/config.toml
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	#[clap(flatten)]
	overrides: Overrides,
}

/// One-off overrides of the settings file.
#[derive(Args, Clone, Debug, Default)]
struct Overrides {
	/// Pretend today is this date (YYYY-MM-DD)
	#[arg(long, global = true)]
	date: Option<Date>,
	/// Start of sprint #1; snapped back to its Monday
	#[arg(long, global = true)]
	epoch: Option<Date>,
	#[arg(long, global = true)]
	epoch_rule: Option<EpochRule>,
	/// Sprint length in weeks
	#[arg(long, global = true)]
	weeks: Option<u32>,
	/// Working weekdays, e.g. `mon-fri` or `1,2,3,4`
	#[arg(long, global = true)]
	weekdays: Option<WeekdaySet>,
	/// What to show on days that are not working days
	#[arg(long, global = true)]
	non_working: Option<NonWorkingDisplay>,
	#[arg(long, global = true)]
	no_emoji: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Short status line, for a status bar
	Status,
	/// Sprint name, date range and days left
	Tooltip,
	/// Everything, one item per line
	Menu,
	/// Single-line JSON with the descriptor plus `text`/`tooltip`/`percentage` (waybar custom module format)
	Json,
	/// The sprints starting from the current one
	Upcoming {
		#[arg(default_value_t = 4)]
		count: usize,
	},
	/// Re-render on an interval
	Watch(watch::WatchArgs),
	/// Print effective settings as TOML
	Settings {
		/// Reset the sprint rules to their defaults before printing
		#[arg(long)]
		defaults: bool,
	},
	/// Shell aliases and completions
	Init(shell_init::ShellInitArgs),
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Format {
	#[default]
	Status,
	Tooltip,
	Menu,
	Json,
}

#[derive(Serialize)]
struct JsonView<'a> {
	text: String,
	tooltip: String,
	percentage: u32,
	label: String,
	week_in_sprint: u32,
	remaining_working_days: u32,
	#[serde(flatten)]
	sprint: &'a SprintDescriptor,
}

pub fn render(format: Format, sprint: &SprintDescriptor, opts: &DisplayOptions) -> Result<String> {
	Ok(match format {
		Format::Status => display::status_line(sprint, opts),
		Format::Tooltip => display::tooltip(sprint, opts),
		Format::Menu => display::menu_lines(sprint, opts).join("\n"),
		Format::Json => serde_json::to_string(&JsonView {
			text: display::status_line(sprint, opts),
			tooltip: display::tooltip(sprint, opts),
			percentage: display::progress_percent(sprint),
			label: display::iso_label(sprint, opts),
			week_in_sprint: sprint.week_in_sprint(),
			remaining_working_days: sprint.remaining_working_days(),
			sprint,
		})?,
	})
}

/// Today in the system time zone, unless pinned with `--date`.
pub fn today(pinned: Option<Date>) -> Date {
	pinned.unwrap_or_else(|| Zoned::now().date())
}

/// Applies command-line overrides on top of the loaded settings. Invalid values are reported and the configured ones kept.
fn apply_overrides(app: AppConfig, overrides: &Overrides) -> AppConfig {
	let mut store = MemorySettings::new(app);
	if let Some(epoch) = overrides.epoch {
		store.set_epoch(Some(epoch));
	}
	if let Some(rule) = overrides.epoch_rule {
		store.set_epoch_rule(rule);
		if overrides.epoch.is_none() {
			store.set_epoch(None);
		}
	}
	if let Some(weeks) = overrides.weeks
		&& let Err(e) = store.set_length_weeks(weeks)
	{
		eprintln!("warning: ignoring --weeks {weeks}: {e}; keeping {}", store.get().length_weeks);
	}

	let mut app = store.into_app();
	// already validated by clap when parsing the `WeekdaySet`
	if let Some(weekdays) = overrides.weekdays {
		app.sprint.working_weekdays = weekdays;
	}
	if let Some(mode) = overrides.non_working {
		app.display.non_working_display = mode;
	}
	if overrides.no_emoji {
		app.display.show_emoji = false;
	}
	app
}

fn init_tracing() -> Result<()> {
	let default_directives = option_env!("LOG_DIRECTIVES").unwrap_or("warn");
	let stderr = tracing_subscriber::fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_filter(EnvFilter::try_from_env("SPRINT_LOG").unwrap_or_else(|_| EnvFilter::new(default_directives)));

	// Integration tests set this to inspect what happened
	let json = match std::env::var_os("SPRINT_TRACE_FILE") {
		Some(path) => {
			let file = std::fs::OpenOptions::new()
				.create(true)
				.append(true)
				.open(&path)
				.wrap_err_with(|| format!("Failed to open trace file at {path:?}"))?;
			Some(tracing_subscriber::fmt::layer().json().with_writer(Mutex::new(file)).with_filter(EnvFilter::new("sprint=debug")))
		}
		None => None,
	};

	tracing_subscriber::registry().with(stderr).with(json).init();
	Ok(())
}

fn main() -> Result<()> {
	color_eyre::install()?;
	init_tracing()?;
	let cli = Cli::parse();

	let (app, warnings) = AppConfig::load(cli.config.as_deref()).wrap_err("Failed to load settings")?;
	for w in &warnings {
		eprintln!("{w}");
	}
	let app = apply_overrides(app, &cli.overrides);
	let pinned = cli.overrides.date;

	let format = match cli.command {
		Commands::Status => Format::Status,
		Commands::Tooltip => Format::Tooltip,
		Commands::Menu => Format::Menu,
		Commands::Json => Format::Json,
		Commands::Upcoming { count } => {
			let today = today(pinned);
			let config = app.sprint_config(today)?;
			for sprint in calc::upcoming(today, count, &config)? {
				println!("{}\t{}\t{} – {}", display::iso_label(&sprint, &app.display), sprint.index, sprint.start_date, sprint.end_date);
			}
			return Ok(());
		}
		Commands::Watch(args) => return watch::main(&app, pinned, args),
		Commands::Settings { defaults } => {
			let shown = match defaults {
				true => {
					let mut store = MemorySettings::new(app);
					store.reset_to_defaults();
					store.into_app()
				}
				false => app,
			};
			print!("{}", shown.to_toml()?);
			return Ok(());
		}
		Commands::Init(args) => {
			shell_init::output(args);
			return Ok(());
		}
	};

	let today = today(pinned);
	let config = app.sprint_config(today)?;
	let sprint = calc::resolve(today, &config)?;
	println!("{}", render(format, &sprint, &app.display)?);
	Ok(())
}
