use std::process::Command;

/// Short commit hash for `--version`; tarball builds have no checkout.
fn git_hash() -> String {
	Command::new("git")
		.args(["rev-parse", "--short", "HEAD"])
		.output()
		.ok()
		.filter(|o| o.status.success())
		.and_then(|o| String::from_utf8(o.stdout).ok())
		.map(|s| s.trim().to_owned())
		.unwrap_or_else(|| "unknown".to_owned())
}

/// Default `tracing` filter baked in for local builds, overridable at runtime with `SPRINT_LOG`.
fn log_directives() -> Option<String> {
	let path = ".cargo/log_directives";
	println!("cargo:rerun-if-changed={path}");
	std::fs::read_to_string(path).ok().map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

fn main() {
	println!("cargo:rustc-env=GIT_HASH={}", git_hash());
	if let Some(directives) = log_directives() {
		println!("cargo:rustc-env=LOG_DIRECTIVES={directives}");
	}
}
