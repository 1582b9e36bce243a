//! Roast analysis service client.
//!
//! Sends a base64 encoded photo of coffee beans to the remote analysis
//! service and returns the roast level, a recommended brew temperature and
//! a short description.

pub mod client;
pub mod error;

pub use client::{encode_image, RoastAnalysisClient, ANALYZE_ROAST_PATH};
pub use error::AnalysisError;
