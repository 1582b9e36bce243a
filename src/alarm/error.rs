//! Alarm error types.
//!
//! Every alarm error is recoverable: the timer completes whether or not the
//! user actually heard anything.

use thiserror::Error;

/// Errors that can occur while sounding the brew alarm.
#[derive(Debug, Error)]
pub enum AlarmError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Custom alarm sound file was not found.
    #[error("alarm sound file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the alarm sound file.
    #[error("failed to decode alarm sound: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("failed to open audio stream: {0}")]
    StreamError(String),

    /// Generic playback error.
    #[error("alarm playback failed: {0}")]
    PlaybackError(String),
}

impl AlarmError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if playback should fall back to the built-in beep.
    #[must_use]
    pub fn should_fallback_to_beep(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AlarmError::DeviceNotAvailable("no device".to_string());
        assert_eq!(err.to_string(), "audio device not available: no device");

        let err = AlarmError::FileNotFound("/tmp/ding.wav".to_string());
        assert!(err.to_string().contains("/tmp/ding.wav"));

        let err = AlarmError::PlaybackError("boom".to_string());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(AlarmError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(AlarmError::StreamError("x".into()).is_device_error());
        assert!(!AlarmError::FileNotFound("x".into()).is_device_error());
        assert!(!AlarmError::PlaybackError("x".into()).is_device_error());
    }

    #[test]
    fn test_should_fallback_to_beep() {
        assert!(AlarmError::FileNotFound("x".into()).should_fallback_to_beep());
        assert!(AlarmError::DecodeError("x".into()).should_fallback_to_beep());
        assert!(!AlarmError::DeviceNotAvailable("x".into()).should_fallback_to_beep());
    }
}
