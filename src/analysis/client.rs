//! HTTP client for the roast analysis service.

use std::path::Path;
use std::time::Duration;

use base64::prelude::*;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::AnalysisError;
use crate::config::AppConfig;
use crate::types::{AnalyzeRoastRequest, RoastAnalysis, TemperatureRange};

/// Endpoint path, relative to the service base URL.
pub const ANALYZE_ROAST_PATH: &str = "/api/analyze-roast";

const DEFAULT_ROAST_LEVEL: &str = "unknown";
const DEFAULT_DESCRIPTION: &str = "No description available.";
const DEFAULT_FAILURE: &str = "Analysis failed";

// ============================================================================
// Wire Types
// ============================================================================

/// Response body as sent by the service. Every field is optional so that a
/// partially filled answer still produces a result.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRoastResponse {
    #[serde(default)]
    success: bool,
    roast_level: Option<String>,
    temperature: Option<RawTemperature>,
    description: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTemperature {
    celsius: Option<String>,
    fahrenheit: Option<String>,
}

impl AnalyzeRoastResponse {
    fn into_result(self) -> Result<RoastAnalysis, AnalysisError> {
        if !self.success {
            return Err(AnalysisError::Rejected(
                self.error.unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
            ));
        }

        let temperature = self.temperature.unwrap_or_default();
        Ok(RoastAnalysis {
            roast_level: self
                .roast_level
                .unwrap_or_else(|| DEFAULT_ROAST_LEVEL.to_string()),
            temperature: TemperatureRange::new(
                temperature
                    .celsius
                    .unwrap_or_else(|| TemperatureRange::UNKNOWN.to_string()),
                temperature
                    .fahrenheit
                    .unwrap_or_else(|| TemperatureRange::UNKNOWN.to_string()),
            ),
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        })
    }
}

// ============================================================================
// RoastAnalysisClient
// ============================================================================

/// Client for the roast analysis endpoint.
#[derive(Debug, Clone)]
pub struct RoastAnalysisClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RoastAnalysisClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// A trailing slash on the base URL is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalysisError> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the analysis endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_ROAST_PATH)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Classifies the roast of a base64 encoded image.
    ///
    /// # Errors
    ///
    /// - `AnalysisError::Timeout` when the client timeout elapses
    /// - `AnalysisError::Server` for non-success HTTP statuses
    /// - `AnalysisError::Rejected` when the service reports a failure
    /// - `AnalysisError::Network` / `InvalidResponse` for transport problems
    pub async fn analyze_roast(&self, base64_image: &str) -> Result<RoastAnalysis, AnalysisError> {
        let request = AnalyzeRoastRequest {
            image: base64_image.to_string(),
        };

        debug!(
            "Sending {} bytes of image data to {}",
            request.image.len(),
            self.endpoint()
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Roast analysis failed with status {}", status);
            return Err(AnalysisError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(map_transport_error)?;
        parse_response(&body)
    }

    /// Reads an image (file path or `data:` URI) and classifies its roast.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be read or the analysis fails.
    pub async fn analyze_image(&self, image: &str) -> Result<RoastAnalysis, AnalysisError> {
        let encoded = encode_image(image).await?;
        self.analyze_roast(&encoded).await
    }
}

fn map_transport_error(e: reqwest::Error) -> AnalysisError {
    if e.is_timeout() {
        AnalysisError::Timeout
    } else {
        AnalysisError::Network(e.to_string())
    }
}

fn parse_response(body: &str) -> Result<RoastAnalysis, AnalysisError> {
    let response: AnalyzeRoastResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;
    response.into_result()
}

// ============================================================================
// Image Encoding
// ============================================================================

/// Produces the base64 payload for an image.
///
/// `image` is either a `data:<mime>;base64,<payload>` URI, whose payload is
/// returned as is, or a path to an image file.
///
/// # Errors
///
/// Returns an error for an empty reference, a malformed data URI or an
/// unreadable file.
pub async fn encode_image(image: &str) -> Result<String, AnalysisError> {
    let image = image.trim();
    if image.is_empty() {
        return Err(AnalysisError::InvalidImage("No image provided".to_string()));
    }

    if image.starts_with("data:") {
        return match image.split_once("base64,") {
            Some((_, payload)) if !payload.is_empty() => Ok(payload.to_string()),
            _ => Err(AnalysisError::InvalidImage(
                "Invalid data URI format".to_string(),
            )),
        };
    }

    let path = Path::new(image);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AnalysisError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
    if bytes.is_empty() {
        return Err(AnalysisError::InvalidImage(format!(
            "{} is empty",
            path.display()
        )));
    }

    Ok(BASE64_STANDARD.encode(bytes))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod response_tests {
        use super::*;

        #[test]
        fn test_full_success() {
            let body = r#"{
                "success": true,
                "roastLevel": "Medium-Dark",
                "temperature": {"celsius": "88-90", "fahrenheit": "190-194"},
                "description": "Oily surface, chocolate notes."
            }"#;
            let analysis = parse_response(body).unwrap();
            assert_eq!(analysis.roast_level, "Medium-Dark");
            assert_eq!(analysis.temperature, TemperatureRange::new("88-90", "190-194"));
            assert_eq!(analysis.description, "Oily surface, chocolate notes.");
        }

        #[test]
        fn test_partial_success_uses_defaults() {
            let analysis = parse_response(r#"{"success": true}"#).unwrap();
            assert_eq!(analysis.roast_level, "unknown");
            assert_eq!(analysis.temperature, TemperatureRange::unknown());
            assert_eq!(analysis.description, "No description available.");

            let analysis =
                parse_response(r#"{"success": true, "temperature": {"celsius": "93"}}"#).unwrap();
            assert_eq!(analysis.temperature.celsius, "93");
            assert_eq!(analysis.temperature.fahrenheit, "N/A");
        }

        #[test]
        fn test_failure_payload() {
            let err = parse_response(r#"{"success": false, "error": "No beans found"}"#)
                .unwrap_err();
            assert_eq!(err.to_string(), "No beans found");

            let err = parse_response(r#"{"success": false}"#).unwrap_err();
            assert_eq!(err.to_string(), "Analysis failed");

            let err = parse_response(r#"{}"#).unwrap_err();
            assert!(matches!(err, AnalysisError::Rejected(_)));
        }

        #[test]
        fn test_invalid_json() {
            let err = parse_response("<html>oops</html>").unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidResponse(_)));
        }
    }

    mod client_tests {
        use super::*;

        #[test]
        fn test_base_url_trailing_slash_trimmed() {
            let client =
                RoastAnalysisClient::new("https://roast.example.com/", Duration::from_secs(5))
                    .unwrap();
            assert_eq!(client.base_url(), "https://roast.example.com");
            assert_eq!(
                client.endpoint(),
                "https://roast.example.com/api/analyze-roast"
            );
        }

        #[test]
        fn test_from_config() {
            let config = AppConfig::default().with_api_url("http://127.0.0.1:9999");
            let client = RoastAnalysisClient::from_config(&config).unwrap();
            assert_eq!(client.timeout(), Duration::from_secs(60));
            assert_eq!(client.base_url(), "http://127.0.0.1:9999");
        }
    }

    mod encode_tests {
        use super::*;

        #[tokio::test]
        async fn test_data_uri() {
            let payload = encode_image("data:image/jpeg;base64,AAEC").await.unwrap();
            assert_eq!(payload, "AAEC");
        }

        #[tokio::test]
        async fn test_malformed_data_uri() {
            let err = encode_image("data:image/jpeg,AAEC").await.unwrap_err();
            assert_eq!(err.to_string(), "Invalid image: Invalid data URI format");
        }

        #[tokio::test]
        async fn test_empty_reference() {
            let err = encode_image("  ").await.unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidImage(_)));
        }

        #[tokio::test]
        async fn test_file_is_base64_encoded() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("beans.jpg");
            std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

            let payload = encode_image(path.to_str().unwrap()).await.unwrap();
            assert_eq!(payload, "/9j/");
        }

        #[tokio::test]
        async fn test_missing_file() {
            let err = encode_image("/nonexistent/beans.jpg").await.unwrap_err();
            assert!(matches!(err, AnalysisError::ImageRead { .. }));
        }
    }
}
