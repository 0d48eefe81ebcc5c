#![forbid(unsafe_code)]

pub mod model;
pub mod settings;
pub mod time;

pub use settings::{RecheckScoring, SessionMode, SessionSettings, SettingsError};
pub use time::Clock;
