//! Application configuration.
//!
//! Settings come from built-in defaults, overridden by `BREWBRO_*`
//! environment variables and finally by command-line flags.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the analysis service URL.
pub const ENV_API_URL: &str = "BREWBRO_API_URL";

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "BREWBRO_DATA_DIR";

/// Environment variable overriding the analysis request timeout (seconds).
pub const ENV_TIMEOUT_SECS: &str = "BREWBRO_TIMEOUT_SECS";

/// Environment variable pointing at a custom alarm sound file.
pub const ENV_ALARM_SOUND: &str = "BREWBRO_ALARM_SOUND";

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

/// Image analysis can be slow, so the default timeout is generous.
fn default_request_timeout_secs() -> u64 {
    60
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brewbro")
}

fn default_alarm_enabled() -> bool {
    true
}

/// Brew Bro configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the roast analysis service.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Client-side timeout for analysis requests in seconds (1-300).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory holding the brew history.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Whether the completion alarm is audible.
    #[serde(default = "default_alarm_enabled")]
    pub alarm_enabled: bool,

    /// Custom alarm sound file; the built-in beep is used when absent.
    #[serde(default)]
    pub alarm_sound: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: default_data_dir(),
            alarm_enabled: default_alarm_enabled(),
            alarm_sound: None,
        }
    }
}

impl AppConfig {
    /// Builds a configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration, reading overrides through `lookup`.
    ///
    /// Unparseable or empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).and_then(|v| v.trim().parse().ok()) {
            config.request_timeout_secs = secs;
        }
        if let Some(path) = lookup(ENV_ALARM_SOUND) {
            config.alarm_sound = Some(PathBuf::from(path));
        }
        config
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_alarm_enabled(mut self, enabled: bool) -> Self {
        self.alarm_enabled = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err("API URL must not be empty".to_string());
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("API URL must start with http:// or https://: {}", url));
        }
        if self.request_timeout_secs < 1 || self.request_timeout_secs > 300 {
            return Err("request timeout must be between 1 and 300 seconds".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.data_dir.ends_with("brewbro"));
        assert!(config.alarm_enabled);
        assert!(config.alarm_sound.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "https://roast.example.com/"),
            (ENV_DATA_DIR, "/tmp/brew"),
            (ENV_TIMEOUT_SECS, "15"),
            (ENV_ALARM_SOUND, "/tmp/ding.wav"),
        ]));
        assert_eq!(config.api_url, "https://roast.example.com/");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/brew"));
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.alarm_sound, Some(PathBuf::from("/tmp/ding.wav")));
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_TIMEOUT_SECS, "soon"),
            (ENV_API_URL, "   "),
        ]));
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.api_url, "http://localhost:3000");
    }

    #[test]
    fn test_builder_pattern() {
        let config = AppConfig::default()
            .with_data_dir("/data")
            .with_api_url("https://api.example.com")
            .with_alarm_enabled(false);
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.api_url, "https://api.example.com");
        assert!(!config.alarm_enabled);
    }

    #[test]
    fn test_validate_url() {
        assert!(AppConfig::default().with_api_url("").validate().is_err());
        assert!(AppConfig::default()
            .with_api_url("ftp://example.com")
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let mut config = AppConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());
        config.request_timeout_secs = 300;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"alarm_enabled": false}"#).unwrap();
        assert!(!config.alarm_enabled);
        assert_eq!(config.request_timeout_secs, 60);
    }
}
