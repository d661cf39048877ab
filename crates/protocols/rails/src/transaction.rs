//! Crypto details attached to a transfer record

use chrono::{DateTime, TimeDelta, Utc};
use railwise_core::{Currency, FeeSchedule, Rail, RailError, RateTable};
use serde::{Deserialize, Serialize};

use crate::calculator::compare;
use crate::legs::{synthesize_failed_legs, synthesize_legs, CryptoLeg};
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockchainNetwork {
    Ethereum,
    Polygon,
    Tron,
    Solana,
}

impl BlockchainNetwork {
    /// Network a rail settles on
    pub fn for_rail(rail: Rail) -> Option<Self> {
        match rail {
            Rail::Traditional => None,
            Rail::CryptoFast => Some(Self::Polygon),
            Rail::CryptoCheap => Some(Self::Tron),
        }
    }
}

/// Crypto section of a transfer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoTransactionDetails {
    pub rail: Rail,
    pub stage: Stage,
    pub legs: [CryptoLeg; 4],
    /// GBP; zero once failed
    pub total_crypto_fees: f64,
    pub savings_vs_traditional: i64,
    pub savings_percentage: Option<f64>,
    pub estimated_completion_time: Option<DateTime<Utc>>,
    pub blockchain_network: BlockchainNetwork,
    pub stablecoin: Currency,
}

/// Assemble the crypto details of a transfer at `stage`
///
/// For `Stage::Failed`, `failed_at` names the stage the transfer was at when
/// it failed. Failed transfers report no fees, savings or completion time.
pub fn crypto_details(
    send_amount: f64,
    rail: Rail,
    stage: Stage,
    failed_at: Option<Stage>,
    created_at: DateTime<Utc>,
    rates: &RateTable,
    fees: &FeeSchedule,
) -> Result<CryptoTransactionDetails, RailError> {
    let network = BlockchainNetwork::for_rail(rail).ok_or_else(|| RailError::NotCryptoRail {
        rail: rail.to_string(),
    })?;

    let legs = match (stage, failed_at) {
        (Stage::Failed, Some(point)) => {
            synthesize_failed_legs(send_amount, rail, point, created_at, rates, fees)?
        }
        (Stage::Failed, None) => {
            synthesize_legs(send_amount, rail, stage, created_at, rates, fees)?
        }
        (_, Some(_)) => {
            return Err(RailError::InvalidStage {
                reason: format!("failure point given for a transfer at {}", stage),
            })
        }
        (_, None) => synthesize_legs(send_amount, rail, stage, created_at, rates, fees)?,
    };

    let comparison = compare(send_amount, rates, fees)?;
    let crypto = comparison
        .crypto(rail)
        .ok_or_else(|| RailError::NotCryptoRail {
            rail: rail.to_string(),
        })?;

    let details = if stage == Stage::Failed {
        CryptoTransactionDetails {
            rail,
            stage,
            legs,
            total_crypto_fees: 0.0,
            savings_vs_traditional: 0,
            savings_percentage: None,
            estimated_completion_time: None,
            blockchain_network: network,
            stablecoin: Currency::Usdt,
        }
    } else {
        let minutes = i64::from(crypto.outcome.estimated_minutes);
        CryptoTransactionDetails {
            rail,
            stage,
            legs,
            total_crypto_fees: crypto.outcome.fees,
            savings_vs_traditional: crypto.savings,
            savings_percentage: crypto.savings_percentage,
            estimated_completion_time: Some(created_at + TimeDelta::minutes(minutes)),
            blockchain_network: network,
            stablecoin: Currency::Usdt,
        }
    };

    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legs::LegStatus;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn details(
        amount: f64,
        rail: Rail,
        stage: Stage,
        failed_at: Option<Stage>,
    ) -> Result<CryptoTransactionDetails, RailError> {
        crypto_details(
            amount,
            rail,
            stage,
            failed_at,
            t0(),
            &RateTable::default(),
            &FeeSchedule::default(),
        )
    }

    #[test]
    fn test_in_progress_fast_transfer() {
        let d = details(1000.0, Rail::CryptoFast, Stage::OfframpProcessing, None).unwrap();

        assert_eq!(d.blockchain_network, BlockchainNetwork::Polygon);
        assert_eq!(d.stablecoin, Currency::Usdt);
        assert_eq!(d.total_crypto_fees, 19.33);
        assert_eq!(d.savings_vs_traditional, 282_843);
        assert_eq!(d.estimated_completion_time, Some(t0() + TimeDelta::minutes(20)));
        assert_eq!(d.legs[3].status, LegStatus::Processing);
    }

    #[test]
    fn test_cheap_transfer_uses_tron() {
        let d = details(2000.0, Rail::CryptoCheap, Stage::ConvertingToUsdt, None).unwrap();
        assert_eq!(d.blockchain_network, BlockchainNetwork::Tron);
        assert_eq!(d.estimated_completion_time, Some(t0() + TimeDelta::minutes(240)));
        assert_eq!(d.legs[1].status, LegStatus::Processing);
    }

    #[test]
    fn test_failed_transfer() {
        let d = details(
            300.0,
            Rail::CryptoFast,
            Stage::Failed,
            Some(Stage::SendingToOfframp),
        )
        .unwrap();

        assert_eq!(d.total_crypto_fees, 0.0);
        assert_eq!(d.savings_vs_traditional, 0);
        assert_eq!(d.savings_percentage, None);
        assert_eq!(d.estimated_completion_time, None);
        assert_eq!(d.legs[2].status, LegStatus::Failed);
        assert_eq!(d.legs[1].status, LegStatus::Completed);
    }

    #[test]
    fn test_failure_point_requires_failed_stage() {
        let err = details(
            300.0,
            Rail::CryptoFast,
            Stage::UsdtAcquired,
            Some(Stage::UsdtAcquired),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "invalid_stage");
    }

    #[test]
    fn test_traditional_has_no_crypto_details() {
        let err = details(750.0, Rail::Traditional, Stage::Completed, None).unwrap_err();
        assert_eq!(err.error_code(), "not_crypto_rail");
    }
}
