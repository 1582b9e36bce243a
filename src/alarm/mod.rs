//! Brew completion alarm.
//!
//! The alarm is a best-effort notification sink: it is invoked once when a
//! countdown completes, must never block the timer, and its failures are
//! only logged.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  AlarmNotifier   │ ← Trait used by the timer
//! └────────┬─────────┘
//!          │
//!          ├──▶ SoundAlarm  (rodio, feature "audio")
//!          ├──▶ BellAlarm   (terminal bell)
//!          └──▶ MockAlarm   (tests)
//! ```

mod error;
#[cfg(feature = "audio")]
mod player;
mod source;

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

pub use error::AlarmError;
#[cfg(feature = "audio")]
pub use player::SoundAlarm;
pub use source::AlarmSound;

use crate::config::AppConfig;

/// Trait for completion alarm implementations.
pub trait AlarmNotifier: Send + Sync {
    /// Alerts the user.
    ///
    /// This method must not block; playback continues in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the alert could not be started.
    fn notify(&self) -> Result<(), AlarmError>;

    /// Returns true if the alarm is muted.
    fn is_disabled(&self) -> bool;

    /// Unmutes the alarm.
    fn enable(&self);

    /// Mutes the alarm.
    fn disable(&self);
}

/// Invokes the alarm and logs any failure instead of returning it.
pub fn notify_best_effort(alarm: &dyn AlarmNotifier) {
    match alarm.notify() {
        Ok(()) => debug!("Brew alarm triggered"),
        Err(e) => warn!("Brew alarm failed: {}", e),
    }
}

/// Writes the terminal bell character to stderr.
pub(crate) fn ring_bell() {
    let mut stderr = std::io::stderr();
    if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
        debug!("Could not ring terminal bell: {}", e);
    }
}

// ============================================================================
// BellAlarm
// ============================================================================

/// Alarm that rings the terminal bell.
#[derive(Debug, Default)]
pub struct BellAlarm {
    disabled: AtomicBool,
}

impl BellAlarm {
    #[must_use]
    pub fn new(disabled: bool) -> Self {
        Self {
            disabled: AtomicBool::new(disabled),
        }
    }
}

impl AlarmNotifier for BellAlarm {
    fn notify(&self) -> Result<(), AlarmError> {
        if !self.is_disabled() {
            ring_bell();
        }
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
    }
}

// ============================================================================
// MockAlarm
// ============================================================================

/// Mock alarm for testing.
#[derive(Debug, Default)]
pub struct MockAlarm {
    notify_calls: AtomicUsize,
    disabled: AtomicBool,
    should_fail: AtomicBool,
}

impl MockAlarm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Number of `notify` calls that reached the mock, failed ones included.
    #[must_use]
    pub fn notify_count(&self) -> usize {
        self.notify_calls.load(Ordering::SeqCst)
    }
}

impl AlarmNotifier for MockAlarm {
    fn notify(&self) -> Result<(), AlarmError> {
        self.notify_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(AlarmError::PlaybackError("Mock failure".to_string()));
        }
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }
}

/// Builds the alarm described by the configuration.
///
/// Uses audio playback when compiled with the `audio` feature and the
/// terminal bell otherwise.
#[must_use]
pub fn default_alarm(config: &AppConfig) -> Arc<dyn AlarmNotifier> {
    let disabled = !config.alarm_enabled;

    #[cfg(feature = "audio")]
    {
        let sound = AlarmSound::from_path(config.alarm_sound.clone());
        Arc::new(SoundAlarm::new(sound, disabled))
    }

    #[cfg(not(feature = "audio"))]
    {
        if config.alarm_sound.is_some() {
            warn!("Built without audio support, alarm sound file ignored");
        }
        Arc::new(BellAlarm::new(disabled))
    }
}
