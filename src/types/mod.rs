//! Core data types for Brew Bro.
//!
//! This module defines the data structures used for:
//! - Countdown timer state and its transitions
//! - Brew session records and drafts
//! - Roast level classification labels
//! - Roast analysis request/response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Brew Time Limits
// ============================================================================

/// Default brew time in seconds (1:30).
pub const DEFAULT_BREW_SECONDS: u32 = 90;

/// Longest brew time accepted from the user (60 minutes).
pub const MAX_BREW_SECONDS: u32 = 3600;

/// Preset brew times offered to the user as (label, seconds).
pub const PRESET_BREW_TIMES: [(&str, u32); 5] = [
    ("1:00", 60),
    ("1:30", 90),
    ("2:00", 120),
    ("2:30", 150),
    ("3:00", 180),
];

// ============================================================================
// TimerStatus
// ============================================================================

/// Observable status of a countdown, derived from the timer flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// Configured but not started (or reset)
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Counting suspended, remaining time preserved
    Paused,
    /// Reached zero; terminal until reset
    Complete,
}

impl TimerStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Complete => "complete",
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// State of a single countdown.
///
/// At most one of `running`/`paused` is set at a time, and `complete` is only
/// set once `remaining` has ticked down to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    duration: u32,
    remaining: u32,
    running: bool,
    paused: bool,
    complete: bool,
}

impl TimerState {
    /// Creates an idle countdown of `duration` seconds.
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
            running: false,
            paused: false,
            complete: false,
        }
    }

    /// Replaces the configured duration and refills the remaining time.
    ///
    /// The running/paused flags are left untouched, so an active countdown
    /// continues from the new value.
    pub fn set_duration(&mut self, seconds: u32) {
        self.duration = seconds;
        self.remaining = seconds;
        self.complete = false;
    }

    /// Starts counting down.
    ///
    /// Returns false (and changes nothing) when there is no time left or the
    /// countdown is already running or paused.
    pub fn start(&mut self) -> bool {
        if self.remaining == 0 || self.running || self.paused {
            return false;
        }
        self.running = true;
        self.paused = false;
        self.complete = false;
        true
    }

    /// Pauses a running countdown. Returns false if it was not running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.paused = true;
        true
    }

    /// Resumes a paused countdown from the preserved remaining time.
    ///
    /// Returns false if it was not paused or there is no time left.
    pub fn resume(&mut self) -> bool {
        if !self.paused || self.remaining == 0 {
            return false;
        }
        self.paused = false;
        self.running = true;
        true
    }

    /// Restores the configured duration and clears every flag.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.running = false;
        self.paused = false;
        self.complete = false;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true exactly when this tick completed the countdown. Ticks
    /// while not running are ignored.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            self.complete = true;
            return true;
        }
        false
    }

    /// Configured total seconds.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Seconds left.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns true if the countdown is ticking.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns true if the countdown is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns true if the countdown reached zero.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns the derived status.
    pub fn status(&self) -> TimerStatus {
        if self.complete {
            TimerStatus::Complete
        } else if self.running {
            TimerStatus::Running
        } else if self.paused {
            TimerStatus::Paused
        } else {
            TimerStatus::Idle
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_BREW_SECONDS)
    }
}

// ============================================================================
// TemperatureRange
// ============================================================================

/// Recommended brew temperature as display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub celsius: String,
    pub fahrenheit: String,
}

impl TemperatureRange {
    /// Placeholder used when no recommendation is known.
    pub const UNKNOWN: &'static str = "N/A";

    pub fn new(celsius: impl Into<String>, fahrenheit: impl Into<String>) -> Self {
        Self {
            celsius: celsius.into(),
            fahrenheit: fahrenheit.into(),
        }
    }

    /// A range with both values set to "N/A".
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN, Self::UNKNOWN)
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self::unknown()
    }
}

// ============================================================================
// BrewSession
// ============================================================================

/// A completed, persisted brew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewSession {
    /// Unique id, generated by the history store
    pub id: String,
    /// Bean display name
    pub bean_name: String,
    /// Free-text roast label (may be "Unknown")
    pub roast_level: String,
    /// Recommended temperature
    pub temperature: TemperatureRange,
    /// Brew time in seconds
    pub brew_time: u32,
    /// Brewing equipment used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    /// How the coffee tasted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taste_notes: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// A brew session as submitted by the caller, before the store assigns an
/// id and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub bean_name: String,
    pub roast_level: String,
    pub temperature: TemperatureRange,
    pub brew_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taste_notes: Option<String>,
}

impl SessionDraft {
    /// Roast label used when the bean was never analyzed.
    pub const UNKNOWN_ROAST: &'static str = "Unknown";

    pub fn new(bean_name: impl Into<String>, brew_time: u32) -> Self {
        Self {
            bean_name: bean_name.into(),
            roast_level: Self::UNKNOWN_ROAST.to_string(),
            temperature: TemperatureRange::unknown(),
            brew_time,
            equipment: None,
            taste_notes: None,
        }
    }

    pub fn with_roast_level(mut self, roast_level: impl Into<String>) -> Self {
        self.roast_level = roast_level.into();
        self
    }

    pub fn with_temperature(mut self, temperature: TemperatureRange) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the equipment; blank text is treated as absent.
    pub fn with_equipment(mut self, equipment: Option<String>) -> Self {
        self.equipment = non_blank(equipment);
        self
    }

    /// Sets the taste notes; blank text is treated as absent.
    pub fn with_taste_notes(mut self, taste_notes: Option<String>) -> Self {
        self.taste_notes = non_blank(taste_notes);
        self
    }

    /// Turns the draft into a record with the given identity.
    pub fn into_session(self, id: String, created_at: DateTime<Utc>) -> BrewSession {
        BrewSession {
            id,
            bean_name: self.bean_name,
            roast_level: self.roast_level,
            temperature: self.temperature,
            brew_time: self.brew_time,
            equipment: self.equipment,
            taste_notes: self.taste_notes,
            created_at,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl BrewSession {
    /// Coarse roast category of the recorded label.
    pub fn roast_category(&self) -> RoastLevel {
        RoastLevel::from_label(&self.roast_level)
    }
}

// ============================================================================
// RoastLevel
// ============================================================================

/// Coarse roast category parsed from a free-text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoastLevel {
    Light,
    LightMedium,
    Medium,
    MediumDark,
    Dark,
    Unknown,
}

impl RoastLevel {
    /// Classifies a label such as "Medium-Dark" or "light roast".
    ///
    /// Compound labels are matched before single words.
    pub fn from_label(label: &str) -> Self {
        let level = label.to_lowercase();
        if level.contains("light-medium") || level.contains("light medium") {
            RoastLevel::LightMedium
        } else if level.contains("medium-dark") || level.contains("medium dark") {
            RoastLevel::MediumDark
        } else if level.contains("light") {
            RoastLevel::Light
        } else if level.contains("dark") {
            RoastLevel::Dark
        } else if level.contains("medium") {
            RoastLevel::Medium
        } else {
            RoastLevel::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoastLevel::Light => "Light",
            RoastLevel::LightMedium => "Light-Medium",
            RoastLevel::Medium => "Medium",
            RoastLevel::MediumDark => "Medium-Dark",
            RoastLevel::Dark => "Dark",
            RoastLevel::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// Roast Analysis Types
// ============================================================================

/// Request body for the roast analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRoastRequest {
    /// Base64 encoded image
    pub image: String,
}

/// Successful roast analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoastAnalysis {
    pub roast_level: String,
    pub temperature: TemperatureRange,
    pub description: String,
}

impl RoastAnalysis {
    /// Returns the coarse roast category of this analysis.
    pub fn category(&self) -> RoastLevel {
        RoastLevel::from_label(&self.roast_level)
    }
}

// ============================================================================
// Tests
// ============================================================================
