//! Crypto transfer stages
//!
//! [`STAGE_ORDER`] is the only place stage ordering is defined. Leg status,
//! progress bars and "has X happened yet" checks all go through
//! [`Stage::index`].

use std::fmt;
use std::str::FromStr;

use railwise_core::RailError;
use serde::{Deserialize, Serialize};

/// Where a crypto transfer currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Initiated,
    GbpReceived,
    ConvertingToUsd,
    UsdConverted,
    ConvertingToUsdt,
    UsdtAcquired,
    SendingToOfframp,
    OfframpProcessing,
    NgnDisbursed,
    Completed,
    /// Terminal; not part of the happy path
    Failed,
}

/// Happy-path stages in order
pub const STAGE_ORDER: [Stage; 10] = [
    Stage::Initiated,
    Stage::GbpReceived,
    Stage::ConvertingToUsd,
    Stage::UsdConverted,
    Stage::ConvertingToUsdt,
    Stage::UsdtAcquired,
    Stage::SendingToOfframp,
    Stage::OfframpProcessing,
    Stage::NgnDisbursed,
    Stage::Completed,
];

impl Stage {
    pub const ALL: [Stage; 11] = [
        Stage::Initiated,
        Stage::GbpReceived,
        Stage::ConvertingToUsd,
        Stage::UsdConverted,
        Stage::ConvertingToUsdt,
        Stage::UsdtAcquired,
        Stage::SendingToOfframp,
        Stage::OfframpProcessing,
        Stage::NgnDisbursed,
        Stage::Completed,
        Stage::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::GbpReceived => "gbp_received",
            Self::ConvertingToUsd => "converting_to_usd",
            Self::UsdConverted => "usd_converted",
            Self::ConvertingToUsdt => "converting_to_usdt",
            Self::UsdtAcquired => "usdt_acquired",
            Self::SendingToOfframp => "sending_to_offramp",
            Self::OfframpProcessing => "offramp_processing",
            Self::NgnDisbursed => "ngn_disbursed",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Position along the happy path, `None` for `Failed`
    pub fn index(&self) -> Option<usize> {
        STAGE_ORDER.iter().position(|stage| stage == self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Progress bar value, 0-100
    pub fn progress_percentage(&self) -> u8 {
        match self {
            Self::Initiated => 5,
            Self::GbpReceived => 15,
            Self::ConvertingToUsd => 25,
            Self::UsdConverted => 35,
            Self::ConvertingToUsdt => 45,
            Self::UsdtAcquired => 55,
            Self::SendingToOfframp => 65,
            Self::OfframpProcessing => 80,
            Self::NgnDisbursed => 95,
            Self::Completed => 100,
            Self::Failed => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Initiated => "Initiated",
            Self::GbpReceived => "GBP Received",
            Self::ConvertingToUsd => "Converting to USD",
            Self::UsdConverted => "USD Ready",
            Self::ConvertingToUsdt => "Minting USDT",
            Self::UsdtAcquired => "USDT Ready",
            Self::SendingToOfframp => "Sending to Off-ramp",
            Self::OfframpProcessing => "Off-ramp Processing",
            Self::NgnDisbursed => "NGN Sent",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Initiated => "Transaction created",
            Self::GbpReceived => "Payment confirmed by Revolut",
            Self::ConvertingToUsd => "GBP → USD via Revolut FX",
            Self::UsdConverted => "Funds converted to USD",
            Self::ConvertingToUsdt => "USD → USDT (1:1 conversion)",
            Self::UsdtAcquired => "Stablecoin acquired",
            Self::SendingToOfframp => "Transferring to Yellow Card",
            Self::OfframpProcessing => "Converting USDT → NGN",
            Self::NgnDisbursed => "Funds sent to recipient bank",
            Self::Completed => "Recipient received funds",
            Self::Failed => "Transaction encountered an error",
        }
    }

    pub fn info(&self) -> StageInfo {
        StageInfo {
            label: self.label().to_string(),
            description: self.description().to_string(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = RailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| RailError::UnknownStage {
                value: s.to_string(),
            })
    }
}

/// Display text for a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInfo {
    pub label: String,
    pub description: String,
}

/// Happy-path index of a stage name; `None` for `failed` or unknown names
pub fn stage_index(name: &str) -> Option<usize> {
    name.parse::<Stage>().ok().and_then(|stage| stage.index())
}

/// Progress for a stage name; unknown names report 0
pub fn progress_percentage(name: &str) -> u8 {
    name.parse::<Stage>()
        .map(|stage| stage.progress_percentage())
        .unwrap_or(0)
}

/// Label and description for a stage name
///
/// Stage names can come from records the caller doesn't control, so an
/// unknown name is echoed back as its own label instead of failing.
pub fn stage_info(name: &str) -> StageInfo {
    match name.parse::<Stage>() {
        Ok(stage) => stage.info(),
        Err(_) => StageInfo {
            label: name.to_string(),
            description: String::new(),
        },
    }
}
