//! Display utilities for the Brew Bro CLI.
//!
//! This module provides formatted output for:
//! - Timer progress and transitions
//! - Saved brew sessions
//! - Roast analysis results
//! - Error messages

use std::fmt::Display as FmtDisplay;
use std::io::Write;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::types::{BrewSession, RoastAnalysis, RoastLevel, TemperatureRange, PRESET_BREW_TIMES};

/// Date format used for brew sessions, e.g. "Mar 5, 2024 14:07".
const DATE_FORMAT: &str = "%b %-d, %Y %H:%M";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the countdown header and the interactive commands.
    pub fn show_brew_started(bean_name: &str, duration: u32) {
        println!("* Brewing {} for {}", bean_name, Self::format_time(duration));
        println!("  Commands: [p]ause  [r]esume  [x] reset  [s]tart  [q]uit");
    }

    /// Redraws the remaining time on the current line.
    pub fn show_tick(remaining: u32) {
        print!("\r  Remaining: {}   ", Self::format_time(remaining));
        let _ = std::io::stdout().flush();
    }

    pub fn show_paused(remaining: u32) {
        println!("\r|| Paused at {}      ", Self::format_time(remaining));
    }

    pub fn show_resumed(remaining: u32) {
        println!("\r> Resumed at {}      ", Self::format_time(remaining));
    }

    /// Shows that the countdown went back to its full duration.
    pub fn show_reset(duration: u32) {
        println!(
            "\r[] Reset to {} (press s to start)",
            Self::format_time(duration)
        );
    }

    pub fn show_complete(duration: u32) {
        println!("\r* Brew complete! ({})         ", Self::format_time(duration));
    }

    /// Shows why a timer command was ignored.
    pub fn show_ignored(command: &str) {
        println!("\r  '{}' is not possible right now", command);
    }

    pub fn show_session_saved(session: &BrewSession) {
        println!("* Saved brew {}", session.id);
    }

    pub fn show_not_saved() {
        println!("  Brew not saved");
    }

    /// Lists sessions one per line, newest first.
    pub fn show_history(sessions: &[BrewSession]) {
        if sessions.is_empty() {
            println!("No brews yet. Start one with `brewbro brew --bean <NAME>`.");
            return;
        }

        println!("Brew history ({})", sessions.len());
        println!("─────────────────────────────");
        for session in sessions {
            println!("{}", Self::format_session_line(session, &Local));
        }
    }

    /// Shows every field of one session.
    pub fn show_session(session: &BrewSession) {
        println!("{}", session.bean_name);
        println!("─────────────────────────────");
        println!("Id:          {}", session.id);
        println!("Date:        {}", Self::format_date(&session.created_at));
        println!("Brew time:   {}", Self::format_time(session.brew_time));
        println!(
            "Roast:       {}",
            Self::format_roast(&session.roast_level, session.roast_category())
        );
        println!(
            "Temperature: {}",
            Self::format_temperature(&session.temperature)
        );
        if let Some(equipment) = &session.equipment {
            println!("Equipment:   {}", equipment);
        }
        if let Some(notes) = &session.taste_notes {
            println!("Notes:       {}", notes);
        }
    }

    pub fn show_deleted(id: &str) {
        println!("* Deleted brew {}", id);
    }

    pub fn show_not_found(id: &str) {
        println!("No brew with id {}", id);
    }

    pub fn show_cleared() {
        println!("* Brew history cleared");
    }

    pub fn show_analyzing() {
        println!("Analyzing roast...");
    }

    /// Shows a roast analysis result.
    pub fn show_analysis(analysis: &RoastAnalysis) {
        println!(
            "Roast level: {}",
            Self::format_roast(&analysis.roast_level, analysis.category())
        );
        println!(
            "Brew at:     {}",
            Self::format_temperature(&analysis.temperature)
        );
        println!();
        println!("{}", analysis.description);
    }

    /// Lists the preset brew times.
    pub fn show_presets() {
        let labels: Vec<&str> = PRESET_BREW_TIMES.iter().map(|(label, _)| *label).collect();
        println!("  Presets: {}", labels.join(", "));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats seconds as `m:ss`.
    pub fn format_time(total_seconds: u32) -> String {
        format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Formats a timestamp in local time.
    pub fn format_date(date: &DateTime<Utc>) -> String {
        Self::format_date_in(date, &Local)
    }

    fn format_date_in<Tz>(date: &DateTime<Utc>, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: FmtDisplay,
    {
        date.with_timezone(tz).format(DATE_FORMAT).to_string()
    }

    /// Capitalizes a roast label and appends its category when the label
    /// does not already read as one, e.g. "Medium-dark roast (Medium-Dark)".
    fn format_roast(label: &str, category: RoastLevel) -> String {
        let label = label.trim();
        let mut chars = label.chars();
        let shown = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => return category.as_str().to_string(),
        };

        if category == RoastLevel::Unknown || shown.eq_ignore_ascii_case(category.as_str()) {
            shown
        } else {
            format!("{} ({})", shown, category.as_str())
        }
    }

    fn format_temperature(temperature: &TemperatureRange) -> String {
        if temperature.celsius == TemperatureRange::UNKNOWN
            && temperature.fahrenheit == TemperatureRange::UNKNOWN
        {
            return TemperatureRange::UNKNOWN.to_string();
        }
        format!("{}°C / {}°F", temperature.celsius, temperature.fahrenheit)
    }

    fn format_session_line<Tz>(session: &BrewSession, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: FmtDisplay,
    {
        format!(
            "{}  {:<24} {:>6}  {:<12} {}",
            Self::format_date_in(&session.created_at, tz),
            session.bean_name,
            Self::format_time(session.brew_time),
            session.roast_category().as_str(),
            session.id
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> BrewSession {
        BrewSession {
            id: "1709647620000-k3j9x0a".to_string(),
            bean_name: "Ethiopia Yirgacheffe".to_string(),
            roast_level: "Light".to_string(),
            temperature: TemperatureRange::new("93-96", "199-205"),
            brew_time: 150,
            equipment: Some("V60".to_string()),
            taste_notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap(),
        }
    }

    // ------------------------------------------------------------------------
    // Format Tests
    // ------------------------------------------------------------------------

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_time() {
            assert_eq!(Display::format_time(0), "0:00");
            assert_eq!(Display::format_time(5), "0:05");
            assert_eq!(Display::format_time(60), "1:00");
            assert_eq!(Display::format_time(90), "1:30");
            assert_eq!(Display::format_time(3600), "60:00");
        }

        #[test]
        fn test_format_date() {
            let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
            assert_eq!(Display::format_date_in(&date, &Utc), "Mar 5, 2024 14:07");
        }

        #[test]
        fn test_format_roast_uses_category() {
            let roast = |label: &str| Display::format_roast(label, RoastLevel::from_label(label));
            assert_eq!(roast("Light"), "Light");
            assert_eq!(roast("medium-dark"), "Medium-dark");
            assert_eq!(roast("medium dark roast"), "Medium dark roast (Medium-Dark)");
            assert_eq!(roast("unknown"), "Unknown");
            assert_eq!(roast("Cinnamon"), "Cinnamon");
            assert_eq!(roast("  "), "Unknown");
        }

        #[test]
        fn test_format_temperature() {
            assert_eq!(
                Display::format_temperature(&TemperatureRange::new("93", "199")),
                "93°C / 199°F"
            );
            assert_eq!(
                Display::format_temperature(&TemperatureRange::unknown()),
                "N/A"
            );
        }

        #[test]
        fn test_format_session_line() {
            let line = Display::format_session_line(&sample_session(), &Utc);
            assert!(line.starts_with("Mar 5, 2024 14:07"));
            assert!(line.contains("Ethiopia Yirgacheffe"));
            assert!(line.contains("2:30"));
            assert!(line.ends_with("1709647620000-k3j9x0a"));

            let mut session = sample_session();
            session.roast_level = "medium dark roast".to_string();
            let line = Display::format_session_line(&session, &Utc);
            assert!(line.contains("Medium-Dark"));
            assert!(!line.contains("medium dark roast"));
        }
    }

    // ------------------------------------------------------------------------
    // Display Output Tests
    // ------------------------------------------------------------------------

    mod display_tests {
        use super::*;

        #[test]
        fn test_show_functions_do_not_panic() {
            let session = sample_session();
            Display::show_brew_started(&session.bean_name, 90);
            Display::show_tick(42);
            Display::show_paused(42);
            Display::show_resumed(42);
            Display::show_reset(90);
            Display::show_complete(90);
            Display::show_session_saved(&session);
            Display::show_history(&[session.clone()]);
            Display::show_history(&[]);
            Display::show_session(&session);
            Display::show_presets();
            Display::show_error("boom");
        }

        #[test]
        fn test_show_analysis() {
            Display::show_analysis(&RoastAnalysis {
                roast_level: "Medium".to_string(),
                temperature: TemperatureRange::new("90-93", "194-199"),
                description: "Even brown color.".to_string(),
            });
        }
    }
}
