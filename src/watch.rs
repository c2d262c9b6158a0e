use clap::Args;
use color_eyre::eyre::Result;
use jiff::civil::Date;
use sprint::{
	SprintMemo,
	config::{AppConfig, refresh_period},
};
use tracing::{debug, info};

use crate::{Format, render, today};

#[derive(Args, Clone, Debug)]
pub struct WatchArgs {
	/// Minutes between renders, at most a week. Defaults to `refresh.interval_minutes` from settings (15, 30 or 60 are typical)
	#[arg(short, long)]
	interval: Option<u64>,
	#[arg(short, long, default_value = "status")]
	format: Format,
	/// Stop after this many renders
	#[arg(long)]
	count: Option<u64>,
}

pub fn main(app: &AppConfig, pinned: Option<Date>, args: WatchArgs) -> Result<()> {
	let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
	runtime.block_on(run(app, pinned, args))
}

async fn run(app: &AppConfig, pinned: Option<Date>, args: WatchArgs) -> Result<()> {
	let minutes = args.interval.unwrap_or(app.refresh.interval_minutes);
	let mut ticker = tokio::time::interval(refresh_period(minutes)?);
	let memo = SprintMemo::default();
	let mut rendered = 0u64;
	info!(minutes, "watching");

	loop {
		tokio::select! {
			_ = ticker.tick() => {
				// the epoch rule depends on the date, so the config is rebuilt every tick
				let today = today(pinned);
				let config = app.sprint_config(today)?;
				let sprint = memo.resolve(today, &config)?;
				println!("{}", render(args.format, &sprint, &app.display)?);
				rendered += 1;
				debug!(rendered, %today, "rendered");
				if args.count.is_some_and(|n| rendered >= n) {
					return Ok(());
				}
			}
			_ = tokio::signal::ctrl_c() => {
				info!("interrupted");
				return Ok(());
			}
		}
	}
}
