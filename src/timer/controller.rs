//! Countdown controller for brews.
//!
//! This module provides:
//! - Start/pause/resume/reset transitions over [`TimerState`]
//! - A one-second tick task driven by `tokio::time::interval`
//! - Event firing for displays and integrations
//! - A best-effort alarm when the countdown reaches zero

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

use crate::alarm::{notify_best_effort, AlarmNotifier};
use crate::types::{TimerState, TimerStatus};

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for displays and external integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started
    Started {
        /// Seconds left at start
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused {
        /// Seconds left when paused
        remaining_seconds: u32,
    },
    /// Countdown resumed
    Resumed {
        /// Seconds left when resumed
        remaining_seconds: u32,
    },
    /// Countdown reset to its configured duration
    Reset {
        /// Configured duration
        duration_seconds: u32,
    },
    /// Configured duration changed
    DurationChanged {
        /// New duration
        duration_seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// Countdown reached zero
    Completed {
        /// Configured duration of the finished countdown
        duration_seconds: u32,
    },
}

// ============================================================================
// TimerController
// ============================================================================

/// State shared between the controller and its tick task.
#[derive(Debug)]
struct Shared {
    state: TimerState,
    /// Bumped whenever a tick task is started or cancelled; a task holding an
    /// older value must not touch `state`.
    generation: u64,
}

/// Countdown controller owning a single brew timer.
///
/// At most one tick task is active at a time. Starting, resuming, pausing,
/// resetting and dropping the controller all cancel the previous task.
pub struct TimerController {
    shared: Arc<Mutex<Shared>>,
    ticker: Option<JoinHandle<()>>,
    tick_period: Duration,
    alarm: Arc<dyn AlarmNotifier>,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerController {
    /// Creates an idle controller for a countdown of `duration` seconds.
    pub fn new(
        duration: u32,
        alarm: Arc<dyn AlarmNotifier>,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state: TimerState::new(duration),
                generation: 0,
            })),
            ticker: None,
            tick_period: TICK_PERIOD,
            alarm,
            event_tx,
        }
    }

    /// Overrides the tick period.
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    /// Replaces the configured duration.
    ///
    /// `remaining` is refilled immediately. A running countdown keeps its tick
    /// task and continues from the new value without rescaling.
    pub fn set_duration(&mut self, seconds: u32) {
        self.shared.lock().state.set_duration(seconds);
        debug!("Brew duration set to {}s", seconds);
        self.emit(TimerEvent::DurationChanged {
            duration_seconds: seconds,
        });
    }

    /// Starts the countdown.
    ///
    /// Returns false without changing anything if there is no time left or
    /// the countdown is already running or paused.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> bool {
        let remaining = {
            let mut shared = self.shared.lock();
            if !shared.state.start() {
                debug!("Start rejected in {} state", shared.state.status().as_str());
                return false;
            }
            shared.state.remaining()
        };

        self.spawn_ticker();
        self.emit(TimerEvent::Started {
            remaining_seconds: remaining,
        });
        true
    }

    /// Pauses a running countdown, preserving the remaining time.
    ///
    /// Returns false if the countdown was not running.
    pub fn pause(&mut self) -> bool {
        let remaining = {
            let mut shared = self.shared.lock();
            if !shared.state.pause() {
                return false;
            }
            shared.generation += 1;
            shared.state.remaining()
        };

        self.cancel_ticker();
        self.emit(TimerEvent::Paused {
            remaining_seconds: remaining,
        });
        true
    }

    /// Resumes a paused countdown.
    ///
    /// Returns false if it was not paused or there is no time left.
    ///
    /// Must be called from within a tokio runtime.
    pub fn resume(&mut self) -> bool {
        let remaining = {
            let mut shared = self.shared.lock();
            if !shared.state.resume() {
                return false;
            }
            shared.state.remaining()
        };

        self.spawn_ticker();
        self.emit(TimerEvent::Resumed {
            remaining_seconds: remaining,
        });
        true
    }

    /// Stops any countdown and restores the configured duration.
    pub fn reset(&mut self) {
        let duration = {
            let mut shared = self.shared.lock();
            shared.generation += 1;
            shared.state.reset();
            shared.state.duration()
        };

        self.cancel_ticker();
        self.emit(TimerEvent::Reset {
            duration_seconds: duration,
        });
    }

    /// Returns a copy of the current timer state.
    pub fn snapshot(&self) -> TimerState {
        self.shared.lock().state
    }

    /// Returns the current status.
    pub fn status(&self) -> TimerStatus {
        self.shared.lock().state.status()
    }

    /// Returns true if a tick task is currently scheduled.
    pub fn has_active_ticker(&self) -> bool {
        self.ticker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Replaces any previous tick task with a fresh one.
    fn spawn_ticker(&mut self) {
        self.cancel_ticker();

        let generation = {
            let mut shared = self.shared.lock();
            shared.generation += 1;
            shared.generation
        };

        let shared = Arc::clone(&self.shared);
        let alarm = Arc::clone(&self.alarm);
        let event_tx = self.event_tx.clone();
        let period = self.tick_period;

        self.ticker = Some(tokio::spawn(async move {
            run_ticker(shared, generation, period, alarm, event_tx).await;
        }));
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Timer event receiver dropped");
        }
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.shared.lock().generation += 1;
        self.cancel_ticker();
    }
}

/// Tick loop: decrements once per period until the countdown completes or
/// this task's generation goes stale.
async fn run_ticker(
    shared: Arc<Mutex<Shared>>,
    generation: u64,
    period: Duration,
    alarm: Arc<dyn AlarmNotifier>,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let (remaining, completed, duration) = {
            let mut shared = shared.lock();
            if shared.generation != generation || !shared.state.is_running() {
                return;
            }
            let completed = shared.state.tick();
            (
                shared.state.remaining(),
                completed,
                shared.state.duration(),
            )
        };

        if event_tx
            .send(TimerEvent::Tick {
                remaining_seconds: remaining,
            })
            .is_err()
        {
            debug!("Timer event receiver dropped");
        }

        if completed {
            debug!("Brew countdown of {}s complete", duration);
            if event_tx
                .send(TimerEvent::Completed {
                    duration_seconds: duration,
                })
                .is_err()
            {
                debug!("Timer event receiver dropped");
            }
            notify_best_effort(alarm.as_ref());
            return;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
