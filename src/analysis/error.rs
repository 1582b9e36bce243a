//! Roast analysis error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the roast analysis client.
///
/// The display text of each variant is meant to be shown to the user as is.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request did not finish within the client timeout.
    #[error("Request timed out. Please try again.")]
    Timeout,

    /// The service answered with a non-success HTTP status.
    #[error("Server error: {status} - {body}")]
    Server { status: u16, body: String },

    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// The service processed the image but reported a failure.
    #[error("{0}")]
    Rejected(String),

    /// The response body was not the expected JSON.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The image reference could not be turned into a payload.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// The image file could not be read.
    #[error("Failed to read image {}", .path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) => true,
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            AnalysisError::Timeout.to_string(),
            "Request timed out. Please try again."
        );
        assert_eq!(
            AnalysisError::Server {
                status: 502,
                body: "Bad Gateway".into()
            }
            .to_string(),
            "Server error: 502 - Bad Gateway"
        );
        assert_eq!(
            AnalysisError::Rejected("No coffee beans detected".into()).to_string(),
            "No coffee beans detected"
        );
        let err = AnalysisError::ImageRead {
            path: PathBuf::from("/tmp/beans.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Failed to read image /tmp/beans.jpg");
    }

    #[test]
    fn test_is_retryable() {
        assert!(AnalysisError::Timeout.is_retryable());
        assert!(AnalysisError::Network("reset".into()).is_retryable());
        assert!(AnalysisError::Server { status: 503, body: String::new() }.is_retryable());
        assert!(!AnalysisError::Server { status: 400, body: String::new() }.is_retryable());
        assert!(!AnalysisError::Rejected("no".into()).is_retryable());
    }
}
