//! Brew countdown timer.
//!
//! - `controller`: countdown controller with its cancellable tick task

pub mod controller;

pub use controller::{TimerController, TimerEvent, TICK_PERIOD};
