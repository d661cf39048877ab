//! Settlement Leg Synthesis
//!
//! Builds the four legs of a stablecoin sandwich transfer:
//!
//! 1. `fiat_conversion` - GBP → USD at the FX provider
//! 2. `stablecoin_mint` - USD → USDT, 1:1
//! 3. `blockchain_transfer` - USDT → USDT minus the network fee
//! 4. `offramp` - USDT → NGN at the off-ramp
//!
//! Amounts come from the same [`CryptoChain`] the comparator uses, and each
//! leg's input is the previous leg's output value, so the last leg always pays
//! out the comparator's `receive_amount`.

use chrono::{DateTime, TimeDelta, Utc};
use railwise_core::{Currency, FeeSchedule, Provider, Rail, RailError, RateTable};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::calculator::{checked_whole, round2, validate_send_amount, CryptoChain};
use crate::stage::{Stage, STAGE_ORDER};

/// Kind of settlement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegType {
    FiatConversion,
    StablecoinMint,
    BlockchainTransfer,
    Offramp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Stages during which a leg is in flight
///
/// A leg is `processing` from `min` through `max` and `completed` once the
/// transfer has moved past `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageWindow {
    pub min: Stage,
    pub max: Stage,
}

impl StageWindow {
    fn bounds(&self) -> Result<(usize, usize), RailError> {
        let min = self.min.index().ok_or_else(|| RailError::StageWindows {
            reason: format!("{} is not a happy-path stage", self.min),
        })?;
        let max = self.max.index().ok_or_else(|| RailError::StageWindows {
            reason: format!("{} is not a happy-path stage", self.max),
        })?;
        Ok((min, max))
    }

    /// Status of the leg when the transfer is at `current` along the happy path
    pub fn status_at(&self, current: usize) -> LegStatus {
        match (self.min.index(), self.max.index()) {
            (_, Some(max)) if current > max => LegStatus::Completed,
            (Some(min), _) if current >= min => LegStatus::Processing,
            _ => LegStatus::Pending,
        }
    }

    /// Whether the leg had started by `current`
    pub fn started_by(&self, current: usize) -> bool {
        self.min.index().is_some_and(|min| current >= min)
    }
}

impl LegType {
    /// Legs in settlement order
    pub const ALL: [LegType; 4] = [
        LegType::FiatConversion,
        LegType::StablecoinMint,
        LegType::BlockchainTransfer,
        LegType::Offramp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiatConversion => "fiat_conversion",
            Self::StablecoinMint => "stablecoin_mint",
            Self::BlockchainTransfer => "blockchain_transfer",
            Self::Offramp => "offramp",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::FiatConversion => "leg-1-fx",
            Self::StablecoinMint => "leg-2-mint",
            Self::BlockchainTransfer => "leg-3-transfer",
            Self::Offramp => "leg-4-offramp",
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::FiatConversion => Provider::Revolut,
            Self::StablecoinMint | Self::BlockchainTransfer => Provider::RevolutX,
            Self::Offramp => Provider::YellowCard,
        }
    }

    pub fn window(&self) -> StageWindow {
        match self {
            Self::FiatConversion => StageWindow {
                min: Stage::ConvertingToUsd,
                max: Stage::ConvertingToUsd,
            },
            Self::StablecoinMint => StageWindow {
                min: Stage::ConvertingToUsdt,
                max: Stage::ConvertingToUsdt,
            },
            Self::BlockchainTransfer => StageWindow {
                min: Stage::SendingToOfframp,
                max: Stage::SendingToOfframp,
            },
            Self::Offramp => StageWindow {
                min: Stage::OfframpProcessing,
                max: Stage::NgnDisbursed,
            },
        }
    }

    /// Seconds after creation when the leg starts
    fn start_offset_secs(&self) -> i64 {
        match self {
            Self::FiatConversion => 60,
            Self::StablecoinMint => 200,
            Self::BlockchainTransfer => 280,
            Self::Offramp => 420,
        }
    }

    /// Seconds after creation when the leg completes
    fn completion_offset_secs(&self) -> i64 {
        match self {
            Self::FiatConversion => 180,
            Self::StablecoinMint => 260,
            Self::BlockchainTransfer => 400,
            Self::Offramp => 900,
        }
    }

    /// Expected leg duration; batched settlement slows the last two legs
    pub fn estimated_duration_secs(&self, rail: Rail) -> u32 {
        let batched = rail == Rail::CryptoCheap;
        match self {
            Self::FiatConversion => 120,
            Self::StablecoinMint => 60,
            Self::BlockchainTransfer if batched => 600,
            Self::BlockchainTransfer => 120,
            Self::Offramp if batched => 3600,
            Self::Offramp => 480,
        }
    }
}

/// Check that leg windows and timestamps line up with [`STAGE_ORDER`]
///
/// Every window must sit on the happy path, and both windows and timestamp
/// offsets must advance strictly from one leg to the next.
pub fn validate_stage_windows() -> Result<(), RailError> {
    let mut previous: Option<(LegType, usize, i64)> = None;

    for leg in LegType::ALL {
        let (min, max) = leg.window().bounds()?;
        if min > max {
            return Err(RailError::StageWindows {
                reason: format!("{} window starts after it ends", leg.as_str()),
            });
        }
        if max >= STAGE_ORDER.len() - 1 {
            return Err(RailError::StageWindows {
                reason: format!("{} can never complete", leg.as_str()),
            });
        }
        if leg.start_offset_secs() >= leg.completion_offset_secs() {
            return Err(RailError::StageWindows {
                reason: format!("{} completes before it starts", leg.as_str()),
            });
        }

        if let Some((prev_leg, prev_max, prev_completion)) = previous {
            if min <= prev_max {
                return Err(RailError::StageWindows {
                    reason: format!("{} overlaps {}", leg.as_str(), prev_leg.as_str()),
                });
            }
            if leg.start_offset_secs() < prev_completion {
                return Err(RailError::StageWindows {
                    reason: format!(
                        "{} starts before {} completes",
                        leg.as_str(),
                        prev_leg.as_str()
                    ),
                });
            }
        }
        previous = Some((leg, max, leg.completion_offset_secs()));
    }

    Ok(())
}

/// One settlement step of a crypto transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoLeg {
    pub id: String,
    #[serde(rename = "type")]
    pub leg_type: LegType,
    pub provider: Provider,
    pub status: LegStatus,
    pub input_amount: f64,
    pub input_currency: Currency,
    pub output_amount: f64,
    pub output_currency: Currency,
    /// Fee charged on this leg: USD for `fiat_conversion`, otherwise the
    /// leg's input currency
    pub fee: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_duration_seconds: u32,
}

/// Progress the legs are rendered at
#[derive(Debug, Clone, Copy)]
enum Progress {
    /// Transfer is at this happy-path index
    At(usize),
    /// Transfer failed while at this happy-path index
    FailedAt(usize),
}

/// Amount, currency and fee triple for each leg, rounded for display
struct LegAmounts {
    input: f64,
    input_currency: Currency,
    output: f64,
    output_currency: Currency,
    fee: f64,
}

fn leg_amounts(chain: &CryptoChain) -> Result<[LegAmounts; 4], RailError> {
    let usd = round2(chain.usd_net);
    let usdt = round2(chain.usdt_minted);
    let delivered = round2(chain.usdt_delivered);
    let ngn = checked_whole(chain.ngn_out)? as f64;

    Ok([
        LegAmounts {
            input: chain.send_amount,
            input_currency: Currency::Gbp,
            output: usd,
            output_currency: Currency::Usd,
            fee: round2(chain.fx_fee_usd),
        },
        LegAmounts {
            input: usd,
            input_currency: Currency::Usd,
            output: usdt,
            output_currency: Currency::Usdt,
            fee: round2(chain.mint_fee_usdt),
        },
        LegAmounts {
            input: usdt,
            input_currency: Currency::Usdt,
            output: delivered,
            output_currency: Currency::Usdt,
            fee: round2(chain.network_fee_usdt),
        },
        LegAmounts {
            input: delivered,
            input_currency: Currency::Usdt,
            output: ngn,
            output_currency: Currency::Ngn,
            fee: round2(chain.offramp_fee_usdt),
        },
    ])
}

/// Opaque, reproducible transfer hash for display
fn transfer_hash(send_amount: f64, rail: Rail, created_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rail.as_str().as_bytes());
    hasher.update(send_amount.to_bits().to_be_bytes());
    hasher.update(created_at.timestamp_millis().to_be_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

fn build_legs(
    send_amount: f64,
    rail: Rail,
    progress: Progress,
    created_at: DateTime<Utc>,
    rates: &RateTable,
    fees: &FeeSchedule,
) -> Result<[CryptoLeg; 4], RailError> {
    validate_send_amount(send_amount)?;
    rates.validate()?;
    let crypto_fees = fees.crypto(rail).ok_or_else(|| RailError::NotCryptoRail {
        rail: rail.to_string(),
    })?;

    let chain = CryptoChain::compute(send_amount, rates, crypto_fees);
    let amounts = leg_amounts(&chain)?;

    let (current, failed) = match progress {
        Progress::At(index) => (index, false),
        Progress::FailedAt(index) => (index, true),
    };

    let mut failure_assigned = false;
    let legs = std::array::from_fn(|i| {
        let leg_type = LegType::ALL[i];
        let window = leg_type.window();

        let mut status = window.status_at(current);
        let mut started = window.started_by(current);
        if failed && status != LegStatus::Completed {
            if failure_assigned {
                status = LegStatus::Pending;
                started = false;
            } else {
                status = LegStatus::Failed;
                failure_assigned = true;
            }
        }

        let tx_hash = (leg_type == LegType::BlockchainTransfer && started)
            .then(|| transfer_hash(send_amount, rail, created_at));

        let amount = &amounts[i];
        CryptoLeg {
            id: leg_type.id().to_string(),
            leg_type,
            provider: leg_type.provider(),
            status,
            input_amount: amount.input,
            input_currency: amount.input_currency,
            output_amount: amount.output,
            output_currency: amount.output_currency,
            fee: amount.fee,
            tx_hash,
            started_at: started
                .then(|| created_at + TimeDelta::seconds(leg_type.start_offset_secs())),
            completed_at: (status == LegStatus::Completed)
                .then(|| created_at + TimeDelta::seconds(leg_type.completion_offset_secs())),
            estimated_duration_seconds: leg_type.estimated_duration_secs(rail),
        }
    });

    Ok(legs)
}

/// Synthesize the four settlement legs of a crypto transfer at `stage`
///
/// `Stage::Failed` carries no failure point, so it is rendered as a failure
/// at `initiated`: the first leg is `failed` and the rest `pending`. Use
/// [`synthesize_failed_legs`] when the failure point is known.
pub fn synthesize_legs(
    send_amount: f64,
    rail: Rail,
    stage: Stage,
    created_at: DateTime<Utc>,
    rates: &RateTable,
    fees: &FeeSchedule,
) -> Result<[CryptoLeg; 4], RailError> {
    let progress = match stage.index() {
        Some(index) => Progress::At(index),
        None => Progress::FailedAt(0),
    };

    tracing::debug!(send_amount, %rail, %stage, "Synthesizing crypto legs");
    build_legs(send_amount, rail, progress, created_at, rates, fees)
}

/// Synthesize legs for a transfer that failed while at `failed_at`
///
/// Legs finished before the failure keep their `completed` status and
/// timestamps. The first unfinished leg becomes `failed` and keeps its start
/// time if it had begun; the legs after it stay `pending`.
pub fn synthesize_failed_legs(
    send_amount: f64,
    rail: Rail,
    failed_at: Stage,
    created_at: DateTime<Utc>,
    rates: &RateTable,
    fees: &FeeSchedule,
) -> Result<[CryptoLeg; 4], RailError> {
    let index = match failed_at {
        Stage::Completed => {
            return Err(RailError::InvalidStage {
                reason: "a completed transfer cannot fail".to_string(),
            })
        }
        stage => stage.index().ok_or_else(|| RailError::InvalidStage {
            reason: "failure point must be a happy-path stage".to_string(),
        })?,
    };

    tracing::debug!(send_amount, %rail, %failed_at, "Synthesizing failed crypto legs");
    build_legs(
        send_amount,
        rail,
        Progress::FailedAt(index),
        created_at,
        rates,
        fees,
    )
}
