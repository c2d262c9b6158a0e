//! Shared test fixtures for integration tests.
//!
//! Every run gets its own XDG directories, so a real `~/.config/sprint/config.toml` never leaks in.

use std::{
	fs,
	path::{Path, PathBuf},
	process::{Command, Output},
};

use rstest::fixture;
use tempfile::TempDir;

pub struct SprintTestContext {
	temp_dir: TempDir,
	/// Passed as `--config` when set.
	pub config_file: Option<PathBuf>,
}

impl SprintTestContext {
	pub fn new() -> Self {
		Self {
			temp_dir: tempfile::tempdir().unwrap(),
			config_file: None,
		}
	}

	/// Context whose settings file holds `config_content`.
	pub fn with_config(config_content: &str) -> Self {
		let mut ctx = Self::new();
		let config_file = ctx.temp_dir.path().join("config.toml");
		fs::write(&config_file, config_content).unwrap();
		ctx.config_file = Some(config_file);
		ctx
	}

	pub fn dir(&self) -> &Path {
		self.temp_dir.path()
	}

	pub fn command(&self, args: &[&str]) -> Command {
		let mut cmd = Command::new(env!("CARGO_BIN_EXE_sprint"));
		cmd.env_clear()
			.env("HOME", self.dir())
			.env("XDG_CONFIG_HOME", self.dir().join("config"))
			.env("NO_COLOR", "1");
		if let Some(config_file) = &self.config_file {
			cmd.arg("--config").arg(config_file);
		}
		cmd.args(args);
		cmd
	}

	pub fn run(&self, args: &[&str]) -> Output {
		self.command(args).output().unwrap()
	}

	/// Runs and returns trimmed stdout, panicking with stderr on failure.
	pub fn stdout(&self, args: &[&str]) -> String {
		let output = self.run(args);
		assert!(output.status.success(), "sprint {args:?} failed:\n{}", String::from_utf8_lossy(&output.stderr));
		String::from_utf8(output.stdout).unwrap().trim_end().to_owned()
	}
}

#[fixture]
pub fn ctx() -> SprintTestContext {
	SprintTestContext::new()
}
