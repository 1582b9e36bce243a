//! CLI module for Brew Bro.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `brew`: Foreground brew timer driven by line commands
//! - `display`: Output formatting and display logic

pub mod brew;
pub mod commands;
pub mod display;

pub use brew::{run_brew, session_draft, BrewOutcome};
pub use commands::{BrewArgs, Cli, Commands, HistoryCommand};
pub use display::Display;
