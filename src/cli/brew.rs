//! Foreground brew timer.
//!
//! Drives a [`TimerController`] from line commands read from the terminal
//! and saves the brew to the history when the countdown completes.

use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use super::commands::BrewArgs;
use super::display::Display;
use crate::alarm::AlarmNotifier;
use crate::history::{BrewHistoryStore, HistoryError};
use crate::storage::KeyValueStore;
use crate::timer::{TimerController, TimerEvent};
use crate::types::{BrewSession, SessionDraft, TemperatureRange, TimerStatus};

/// How a foreground brew ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewOutcome {
    /// The countdown reached zero. Holds the saved session unless saving
    /// was disabled.
    Completed(Option<BrewSession>),
    /// The user typed `q`.
    Quit,
    /// The shutdown signal fired.
    Interrupted,
}

/// A line command typed while brewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrewCommand {
    Pause,
    Resume,
    Reset,
    Start,
    Quit,
}

impl BrewCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "x" | "reset" => Some(Self::Reset),
            "s" | "start" => Some(Self::Start),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Builds the history entry for a finished brew.
pub fn session_draft(args: &BrewArgs, brew_time: u32) -> SessionDraft {
    let unknown = || TemperatureRange::UNKNOWN.to_string();
    let filled = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let mut draft = SessionDraft::new(args.bean.trim(), brew_time)
        .with_temperature(TemperatureRange::new(
            filled(&args.celsius).unwrap_or_else(unknown),
            filled(&args.fahrenheit).unwrap_or_else(unknown),
        ))
        .with_equipment(args.equipment.clone())
        .with_taste_notes(args.notes.clone());
    if let Some(roast) = filled(&args.roast) {
        draft = draft.with_roast_level(roast);
    }
    draft
}

/// Shows a timer event. Returns the brew time once the countdown has
/// really finished.
fn show_event(timer: &TimerController, event: TimerEvent) -> Option<u32> {
    match event {
        TimerEvent::Started { remaining_seconds } | TimerEvent::Tick { remaining_seconds } => {
            Display::show_tick(remaining_seconds);
        }
        TimerEvent::Paused { remaining_seconds } => Display::show_paused(remaining_seconds),
        TimerEvent::Resumed { remaining_seconds } => Display::show_resumed(remaining_seconds),
        TimerEvent::Reset { duration_seconds } => Display::show_reset(duration_seconds),
        TimerEvent::DurationChanged { .. } => {}
        // A reset handled after the event was queued wins.
        TimerEvent::Completed { .. } if timer.status() != TimerStatus::Complete => {
            debug!("Ignoring completion of a countdown that was reset");
        }
        TimerEvent::Completed { duration_seconds } => {
            Display::show_complete(duration_seconds);
            return Some(duration_seconds);
        }
    }
    None
}

/// Runs one brew until it completes, the user quits or `shutdown` resolves.
///
/// Commands are read line by line from `input`. When `input` reaches end of
/// file the countdown keeps running. On completion the brew is added to
/// `history` if one is given.
///
/// # Errors
///
/// Returns an error if the finished brew cannot be saved.
pub async fn run_brew<S, R, F>(
    args: &BrewArgs,
    alarm: Arc<dyn AlarmNotifier>,
    history: Option<&mut BrewHistoryStore<S>>,
    input: R,
    shutdown: F,
) -> Result<BrewOutcome, HistoryError>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut timer = TimerController::new(args.time, alarm, event_tx);
    let mut lines = input.lines();
    let mut input_open = true;
    tokio::pin!(shutdown);

    Display::show_brew_started(args.bean.trim(), args.time);
    timer.start();

    let completed = loop {
        tokio::select! {
            biased;

            Some(event) = event_rx.recv() => {
                if let Some(duration) = show_event(&timer, event) {
                    break duration;
                }
            }
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => {
                    let accepted = match BrewCommand::parse(&line) {
                        Some(BrewCommand::Pause) => timer.pause(),
                        Some(BrewCommand::Resume) => timer.resume(),
                        Some(BrewCommand::Reset) => {
                            timer.reset();
                            true
                        }
                        Some(BrewCommand::Start) => timer.start(),
                        Some(BrewCommand::Quit) => return Ok(BrewOutcome::Quit),
                        None if line.trim().is_empty() => true,
                        None => false,
                    };
                    if !accepted {
                        Display::show_ignored(line.trim());
                    }
                }
                Ok(None) => {
                    debug!("Command input closed");
                    input_open = false;
                }
                Err(e) => {
                    debug!("Failed to read command input: {}", e);
                    input_open = false;
                }
            },
            () = &mut shutdown => return Ok(BrewOutcome::Interrupted),
            else => return Ok(BrewOutcome::Interrupted),
        }
    };

    let Some(history) = history else {
        Display::show_not_saved();
        return Ok(BrewOutcome::Completed(None));
    };

    let session = history.add_session(session_draft(args, completed)).await?;
    Display::show_session_saved(&session);
    Ok(BrewOutcome::Completed(Some(session)))
}

// ============================================================================
// Tests
// ============================================================================
