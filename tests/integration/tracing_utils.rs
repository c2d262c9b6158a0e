//! Reading back the JSON trace the binary writes when `SPRINT_TRACE_FILE` is set.

use std::{fs, path::Path};

use serde::Deserialize;

/// A single trace event from the JSON log
#[derive(Debug, Deserialize)]
pub struct TraceEvent {
	pub level: String,
	pub target: String,
	pub fields: TraceFields,
}

#[derive(Debug, Deserialize)]
pub struct TraceFields {
	pub message: Option<String>,
	/// Set on epoch and resolution events
	pub today: Option<String>,
	pub now: Option<String>,
	pub epoch: Option<String>,
	pub this_year: Option<String>,
	/// Render counter of `watch`
	pub rendered: Option<u64>,
	pub minutes: Option<u64>,
}

pub struct TraceLog {
	events: Vec<TraceEvent>,
}

impl TraceLog {
	pub fn from_file(path: &Path) -> Self {
		let content = fs::read_to_string(path).unwrap_or_default();
		let events = content.lines().filter(|line| !line.is_empty()).filter_map(|line| serde_json::from_str(line).ok()).collect();
		Self { events }
	}

	pub fn with_message(&self, message: &str) -> Vec<&TraceEvent> {
		self.events.iter().filter(|e| e.fields.message.as_deref() == Some(message)).collect()
	}

	pub fn messages(&self) -> Vec<&str> {
		self.events.iter().filter_map(|e| e.fields.message.as_deref()).collect()
	}
}

/// Assert that an event with the given message was traced
#[macro_export]
macro_rules! assert_traced {
	($log:expr, $message:expr) => {
		assert!(
			!$log.with_message($message).is_empty(),
			"Expected '{}' to be traced, but it wasn't. Messages:\n{:#?}",
			$message,
			$log.messages()
		);
	};
}
