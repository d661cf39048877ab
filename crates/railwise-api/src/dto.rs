//! Data Transfer Objects for API requests and responses

use chrono::{DateTime, Utc};
use railwise_core::RailError;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }
}

impl From<&RailError> for ApiError {
    fn from(err: &RailError) -> Self {
        Self::new(err.error_code(), err.to_string())
    }
}

/// Query for GET /rails/compare
#[derive(Debug, Clone, Deserialize)]
pub struct CompareQuery {
    pub amount: Option<f64>,
}

/// Body for POST /rails/quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// GBP
    pub amount: f64,
    pub rail: String,
}

/// Body for POST /rails/legs and POST /rails/transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// GBP
    pub amount: f64,
    pub rail: String,
    pub stage: String,
    /// Stage the transfer was at when it failed; only with `stage = failed`
    #[serde(default)]
    pub failed_at: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One entry of GET /rails/stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResponse {
    pub stage: String,
    /// Happy-path position, absent for `failed` and unknown names
    pub index: Option<usize>,
    pub progress_percentage: u8,
    pub label: String,
    pub description: String,
}
