//! Command definitions for the Brew Bro CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{DEFAULT_BREW_SECONDS, MAX_BREW_SECONDS};

/// Maximum length of a bean name in characters.
pub const MAX_BEAN_NAME_LEN: usize = 100;

// ============================================================================
// CLI Structure
// ============================================================================

/// Brew Bro - pour-over brew timer and coffee journal
#[derive(Parser, Debug)]
#[command(
    name = "brewbro",
    version,
    about = "Pour-over brew timer and coffee journal",
    long_about = "Times a brew in the terminal, keeps a history of finished brews\n\
                  and asks a roast analysis service to classify bean photos.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the brew history
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a brew timer in the foreground
    Brew(BrewArgs),

    /// Classify the roast of a bean photo
    Analyze {
        /// Image file or data URI
        #[arg(value_name = "IMAGE")]
        image: String,
    },

    /// Inspect or edit the brew history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// History subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommand {
    /// List saved brews, newest first
    List,

    /// Show one saved brew
    Show {
        /// Session id
        id: String,
    },

    /// Delete one saved brew
    Delete {
        /// Session id
        id: String,
    },

    /// Delete every saved brew
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

// ============================================================================
// Brew Command Arguments
// ============================================================================

/// Arguments for the brew command
#[derive(Args, Debug, Clone)]
pub struct BrewArgs {
    /// Name of the coffee bean
    #[arg(short, long, value_parser = validate_bean_name)]
    pub bean: String,

    /// Brew time as M:SS or seconds (1 second to 60 minutes)
    #[arg(
        short,
        long,
        default_value = "1:30",
        value_parser = parse_brew_time
    )]
    pub time: u32,

    /// Roast level label, e.g. from `brewbro analyze`
    #[arg(short, long)]
    pub roast: Option<String>,

    /// Recommended water temperature in Celsius
    #[arg(long)]
    pub celsius: Option<String>,

    /// Recommended water temperature in Fahrenheit
    #[arg(long)]
    pub fahrenheit: Option<String>,

    /// Brewing equipment used
    #[arg(short, long)]
    pub equipment: Option<String>,

    /// Taste notes
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Do not save the brew when the timer completes
    #[arg(long)]
    pub no_save: bool,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,
}

impl Default for BrewArgs {
    fn default() -> Self {
        Self {
            bean: String::new(),
            time: DEFAULT_BREW_SECONDS,
            roast: None,
            celsius: None,
            fahrenheit: None,
            equipment: None,
            notes: None,
            no_save: false,
            no_sound: false,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the bean name.
///
/// - Must not be empty after trimming
/// - Must not exceed 100 characters
pub fn validate_bean_name(s: &str) -> Result<String, String> {
    let name = s.trim();
    if name.is_empty() {
        return Err("bean name must not be empty".to_string());
    }
    if name.chars().count() > MAX_BEAN_NAME_LEN {
        return Err(format!(
            "bean name must be at most {} characters",
            MAX_BEAN_NAME_LEN
        ));
    }
    Ok(name.to_string())
}

/// Parses a brew time given as `M:SS` or plain seconds.
///
/// The result must be between 1 and 3600 seconds.
pub fn parse_brew_time(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let seconds = match s.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = minutes
                .parse()
                .map_err(|_| format!("invalid minutes in '{}'", s))?;
            let seconds: u32 = seconds
                .parse()
                .map_err(|_| format!("invalid seconds in '{}'", s))?;
            if seconds >= 60 {
                return Err(format!("seconds must be below 60 in '{}'", s));
            }
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or_else(|| format!("brew time '{}' is too long", s))?
        }
        None => s
            .parse()
            .map_err(|_| format!("expected M:SS or seconds, got '{}'", s))?,
    };

    if seconds == 0 || seconds > MAX_BREW_SECONDS {
        return Err(format!(
            "brew time must be between 0:01 and {}:00",
            MAX_BREW_SECONDS / 60
        ));
    }
    Ok(seconds)
}

// ============================================================================
// Tests
// ============================================================================
