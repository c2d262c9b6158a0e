use insta::assert_snapshot;
use rstest::rstest;

use crate::fixtures::{SprintTestContext, ctx};

const EPOCH: [&str; 2] = ["--epoch", "2026-01-05"];

fn args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
	EPOCH.iter().copied().chain(extra.iter().copied()).collect()
}

#[rstest]
#[case("2026-01-05", "🏃 Sprint 1 · Day 1/10")]
#[case("2026-01-07", "🏃 Sprint 1 · Day 3/10")]
#[case("2026-01-10", "🏃 Sprint 1 · 🎉 Day off")]
#[case("2026-01-16", "🏃 Sprint 1 · Day 10/10")]
#[case("2026-01-19", "🏃 Sprint 2 · Day 1/10")]
#[case("2025-12-26", "🏃 Sprint 1 · Day 1/10")]
fn status_line(ctx: SprintTestContext, #[case] date: &str, #[case] expected: &str) {
	assert_eq!(ctx.stdout(&args(&["--date", date, "status"])), expected);
}

#[rstest]
#[case("show-label", "Sprint 1 · Day off")]
#[case("show-previous", "Sprint 1 · Day 5/10")]
#[case("show-next", "Sprint 1 · Day 6/10")]
fn weekend_modes(ctx: SprintTestContext, #[case] mode: &str, #[case] expected: &str) {
	assert_eq!(ctx.stdout(&args(&["--date", "2026-01-10", "--no-emoji", "--non-working", mode, "status"])), expected);
}

#[rstest]
fn four_day_week(ctx: SprintTestContext) {
	let out = ctx.stdout(&args(&["--date", "2026-01-09", "--weeks", "1", "--weekdays", "mon-thu", "--no-emoji", "--non-working", "show-previous", "status"]));
	assert_eq!(out, "Sprint 1 · Day 4/4");
}

#[rstest]
fn json_descriptor(ctx: SprintTestContext) {
	let out = ctx.stdout(&args(&["--date", "2026-01-21", "json"]));
	assert_eq!(out.lines().count(), 1, "waybar wants one line per update");
	let v: serde_json::Value = serde_json::from_str(&out).unwrap();
	assert_eq!(v["index"], 2);
	assert_eq!(v["start_date"], "2026-01-19");
	assert_eq!(v["end_date"], "2026-01-30");
	assert_eq!(v["current_working_day"], 3);
	assert_eq!(v["total_working_days"], 10);
	assert_eq!(v["is_non_working_day"], false);
	assert_eq!(v["next_working_date"], "2026-01-21");
	assert_eq!(v["percentage"], 30);
	assert_eq!(v["label"], "2026 CW04–CW05");
	assert_eq!(v["text"], "🏃 Sprint 2 · Day 3/10");
}

#[rstest]
fn tooltip_and_menu(ctx: SprintTestContext) {
	assert_snapshot!(ctx.stdout(&args(&["--date", "2026-01-14", "tooltip"])), @r"
	Sprint 1 (CW2–CW3)
	05.01.–16.01.
	2 working days left
	");
	assert_snapshot!(ctx.stdout(&args(&["--date", "2026-01-14", "--no-emoji", "menu"])), @r"
	Sprint 1
	CW 2 – CW 3
	05.01. – 16.01.
	Week 2 of 2
	Day 8 of 10
	2 working days left
	▓▓▓▓▓▓▓▓░░ 80%
	");
}

#[rstest]
#[case("iso-week1", "Sprint 1 · Day 6/10")]
#[case("first-monday", "Sprint 1 · Day 1/10")]
fn epoch_rules(ctx: SprintTestContext, #[case] rule: &str, #[case] expected: &str) {
	// no explicit epoch: ISO week 1 of 2026 starts 2025-12-29, the first Monday of January is 2026-01-05
	assert_eq!(ctx.stdout(&["--date", "2026-01-05", "--epoch-rule", rule, "--no-emoji", "status"]), expected);
}

#[rstest]
fn invalid_override_keeps_configured_value(ctx: SprintTestContext) {
	let output = ctx.run(&args(&["--date", "2026-01-05", "--weeks", "0", "--no-emoji", "status"]));
	assert!(output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("warning: ignoring --weeks 0"), "stderr:\n{stderr}");
	assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "Sprint 1 · Day 1/10");
}

#[rstest]
fn bad_weekdays_are_a_usage_error(ctx: SprintTestContext) {
	let output = ctx.run(&args(&["--weekdays", "funday", "status"]));
	assert!(!output.status.success());
}

#[rstest]
fn upcoming_lists_sprints(ctx: SprintTestContext) {
	assert_snapshot!(ctx.stdout(&args(&["--date", "2026-01-21", "upcoming", "3"])), @r"
	2026 CW04–CW05	2	2026-01-19 – 2026-01-30
	2026 CW06–CW07	3	2026-02-02 – 2026-02-13
	2026 CW08–CW09	4	2026-02-16 – 2026-02-27
	");
}

#[rstest]
fn upcoming_past_the_date_range_fails_cleanly(ctx: SprintTestContext) {
	let output = ctx.run(&args(&["--date", "2026-01-21", "upcoming", &usize::MAX.to_string()]));
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("date arithmetic overflowed"), "stderr:\n{stderr}");
	assert!(!stderr.contains("panicked"), "stderr:\n{stderr}");
}

#[rstest]
#[case("0")]
#[case("10081")]
#[case("18446744073709551615")]
fn watch_rejects_out_of_range_interval(ctx: SprintTestContext, #[case] minutes: &str) {
	let output = ctx.run(&args(&["--date", "2026-01-05", "watch", "--count", "1", "--interval", minutes]));
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains(&format!("refresh interval of {minutes} minutes is invalid")), "stderr:\n{stderr}");
	assert!(!stderr.contains("panicked"), "stderr:\n{stderr}");
	assert!(output.stdout.is_empty());
}

#[rstest]
fn watch_renders_immediately(ctx: SprintTestContext) {
	let out = ctx.stdout(&args(&["--date", "2026-01-05", "watch", "--count", "1", "--format", "tooltip"]));
	assert!(out.starts_with("Sprint 1 (CW2–CW3)"), "{out}");
}

#[test]
fn settings_file_is_used() {
	let ctx = SprintTestContext::with_config(
		r#"
[sprint]
epoch = "2026-01-05"
length_weeks = 1
working_weekdays = "mon-thu"

[display]
show_emoji = false
team_name = "dkd"

[display.labels]
day = "Tag"
day_off = "Wochenende"
"#,
	);
	assert_eq!(ctx.stdout(&["--date", "2026-01-09", "status"]), "Sprint 1 · Wochenende");
	assert_eq!(ctx.stdout(&["--date", "2026-01-13", "status"]), "Sprint 2 · Tag 2/4");
	assert!(ctx.stdout(&["--date", "2026-01-13", "tooltip"]).starts_with("dkd Sprint 2"));

	let settings = ctx.stdout(&["settings"]);
	assert!(settings.contains("length_weeks = 1"), "{settings}");
	let defaults = ctx.stdout(&["settings", "--defaults"]);
	assert!(defaults.contains("length_weeks = 2"), "{defaults}");
	assert!(defaults.contains("team_name = \"dkd\""), "display settings survive a sprint reset:\n{defaults}");
}

#[test]
fn invalid_settings_file_fails() {
	let ctx = SprintTestContext::with_config("[sprint]\nlength_weeks = 0\n");
	let output = ctx.run(&["--date", "2026-01-05", "status"]);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("Failed to load settings"), "stderr:\n{stderr}");
}

#[rstest]
fn shell_init_has_completions(ctx: SprintTestContext) {
	let out = ctx.stdout(&["init", "bash"]);
	assert!(out.contains("alias sp=\"sprint status\""));
	assert!(out.contains("_sprint()"), "expected a bash completion function");
	assert!(out.contains("sprint_prompt() {"));

	let fish = ctx.stdout(&["init", "fish", "--no-prompt"]);
	assert!(fish.contains("alias sp 'sprint status'"));
	assert!(!fish.contains("function sprint_prompt"));
}
