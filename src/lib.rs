//! Brew Bro Library
//!
//! This library provides the core functionality for the Brew Bro CLI.
//! It includes:
//! - Countdown timer controller for timed brews
//! - Brew history store persisted through a key-value layer
//! - Completion alarm with audio playback
//! - Client for the remote roast analysis service
//! - CLI command parsing and display utilities

pub mod alarm;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod history;
pub mod storage;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    BrewSession, RoastAnalysis, RoastLevel, SessionDraft, TemperatureRange, TimerState,
    TimerStatus,
};

pub use alarm::{default_alarm, AlarmError, AlarmNotifier, AlarmSound, BellAlarm, MockAlarm};
#[cfg(feature = "audio")]
pub use alarm::SoundAlarm;

pub use analysis::{encode_image, AnalysisError, RoastAnalysisClient};
pub use config::AppConfig;
pub use history::{BrewHistoryStore, HistoryError, HistorySnapshot};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use timer::{TimerController, TimerEvent};
