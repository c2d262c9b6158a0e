//! Sprint numbering from a fixed epoch.
//!
//! Given today's date and a [`SprintConfig`] (epoch Monday, sprint length in weeks, working weekdays),
//! [`resolve`] tells which sprint it is, which working day of it, and when it ends. [`display`] turns the result into text.

pub mod calendar;
pub mod config;
pub mod display;
pub mod error;
pub mod sprint;
pub mod workdays;

// Re-export the calculator's surface at crate root for convenience
pub use display::{DisplayOptions, NonWorkingDisplay};
pub use error::ConfigError;
pub use sprint::{SprintConfig, SprintDescriptor, SprintMemo, resolve};
pub use workdays::WeekdaySet;
