//! Alarm playback using rodio.
//!
//! The audio stream is opened on a detached playback thread for every alarm,
//! so `SoundAlarm` itself stays `Send + Sync` and `notify` never blocks the
//! timer.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::{debug, warn};

use super::error::AlarmError;
use super::source::AlarmSound;
use super::{ring_bell, AlarmNotifier};

/// Frequencies of the built-in beep pattern.
const BEEP_PATTERN_HZ: [f32; 3] = [800.0, 1000.0, 800.0];

/// Length of a single beep tone.
const BEEP_LENGTH: Duration = Duration::from_millis(200);

/// Beep amplitude.
const BEEP_VOLUME: f32 = 0.3;

/// Alarm that plays the beep pattern or a sound file through the default
/// audio device.
pub struct SoundAlarm {
    sound: AlarmSound,
    disabled: AtomicBool,
}

impl SoundAlarm {
    /// Creates a new alarm.
    ///
    /// * `disabled` - If true, `notify` silently does nothing.
    #[must_use]
    pub fn new(sound: AlarmSound, disabled: bool) -> Self {
        Self {
            sound,
            disabled: AtomicBool::new(disabled),
        }
    }

    /// Returns the configured sound.
    #[must_use]
    pub fn sound(&self) -> &AlarmSound {
        &self.sound
    }

    /// Starts playback in the background.
    ///
    /// # Errors
    ///
    /// Returns an error only if the playback thread cannot be spawned.
    /// Device and decoding failures happen on that thread and are logged.
    pub fn play(&self) -> Result<(), AlarmError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("Alarm disabled, skipping");
            return Ok(());
        }

        let sound = self.sound.clone();
        std::thread::Builder::new()
            .name("brew-alarm".to_string())
            .spawn(move || {
                if let Err(e) = play_blocking(&sound) {
                    warn!("Alarm '{}' could not be played: {}", sound.name(), e);
                    if e.is_device_error() {
                        ring_bell();
                    }
                }
            })
            .map_err(|e| AlarmError::PlaybackError(e.to_string()))?;

        debug!("Alarm playback started (detached)");
        Ok(())
    }
}

impl AlarmNotifier for SoundAlarm {
    fn notify(&self) -> Result<(), AlarmError> {
        self.play()
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

impl std::fmt::Debug for SoundAlarm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundAlarm")
            .field("sound", &self.sound)
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish()
    }
}

/// Plays `sound` to the end on the current thread.
fn play_blocking(sound: &AlarmSound) -> Result<(), AlarmError> {
    let (_stream, handle) =
        OutputStream::try_default().map_err(|e| AlarmError::DeviceNotAvailable(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| AlarmError::StreamError(e.to_string()))?;

    match sound {
        AlarmSound::Beep => append_beeps(&sink),
        AlarmSound::File { path } => match open_file(path) {
            Ok(decoder) => sink.append(decoder),
            Err(e) if e.should_fallback_to_beep() => {
                warn!("{}, falling back to beep", e);
                append_beeps(&sink);
            }
            Err(e) => return Err(e),
        },
    }

    sink.sleep_until_end();
    Ok(())
}

fn append_beeps(sink: &Sink) {
    for freq in BEEP_PATTERN_HZ {
        sink.append(
            SineWave::new(freq)
                .take_duration(BEEP_LENGTH)
                .amplify(BEEP_VOLUME),
        );
    }
}

fn open_file(path: &Path) -> Result<Decoder<BufReader<File>>, AlarmError> {
    let file = File::open(path)
        .map_err(|e| AlarmError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file)).map_err(|e| AlarmError::DecodeError(e.to_string()))
}
