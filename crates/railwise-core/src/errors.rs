//! Error types for Railwise

use thiserror::Error;

/// Core errors that can occur in Railwise
#[derive(Debug, Error)]
pub enum Error {
    #[error("Rail error: {0}")]
    Rail(#[from] RailError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the rate and fee engine
///
/// All of these are caller mistakes. The engine never substitutes a default
/// for bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RailError {
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Unknown rail: {value}")]
    UnknownRail { value: String },

    #[error("Unknown stage: {value}")]
    UnknownStage { value: String },

    #[error("Rail {rail} has no crypto settlement legs")]
    NotCryptoRail { rail: String },

    #[error("Invalid stage: {reason}")]
    InvalidStage { reason: String },

    #[error("Invalid rate table: {reason}")]
    InvalidRates { reason: String },

    #[error("Invalid fee schedule: {reason}")]
    InvalidFees { reason: String },

    #[error("Stage windows misconfigured: {reason}")]
    StageWindows { reason: String },
}

/// Result type alias for Railwise operations
pub type Result<T> = std::result::Result<T, Error>;

impl RailError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::UnknownRail { .. } => "unknown_rail",
            Self::UnknownStage { .. } => "unknown_stage",
            Self::NotCryptoRail { .. } => "not_crypto_rail",
            Self::InvalidStage { .. } => "invalid_stage",
            Self::InvalidRates { .. } => "invalid_rates",
            Self::InvalidFees { .. } => "invalid_fees",
            Self::StageWindows { .. } => "stage_windows",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::StageWindows { .. } => 500,
            Self::InvalidRates { .. } | Self::InvalidFees { .. } => 422,
            _ => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rail_error_codes() {
        let err = RailError::InvalidAmount {
            message: "test".into(),
        };
        assert_eq!(err.error_code(), "invalid_amount");
        assert_eq!(err.status_code(), 400);

        let err = RailError::InvalidFees {
            reason: "negative".into(),
        };
        assert_eq!(err.error_code(), "invalid_fees");
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_wraps_into_core_error() {
        let err: Error = RailError::UnknownRail {
            value: "swift".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Rail error: Unknown rail: swift");
    }
}
