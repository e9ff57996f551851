//! Response envelope and payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version reported by the health endpoint.
pub const API_VERSION: &str = "1.0.0";

/// Uniform wrapper for every API response.
///
/// Success and failure share this shape; clients tell them apart by
/// `success` and the HTTP status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Outcome flag.
    pub success: bool,
    /// Human-readable status.
    pub message: String,
    /// Payload, omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Failed response with no payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthInfo {
    /// Current server time.
    pub timestamp: DateTime<Utc>,
    /// API version.
    pub version: String,
    /// Service status.
    pub status: String,
}

impl HealthInfo {
    /// Health info stamped with the current time.
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            version: API_VERSION.to_string(),
            status: "running".to_string(),
        }
    }
}
