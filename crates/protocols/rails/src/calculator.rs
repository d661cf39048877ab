//! Rail Comparison Calculator
//!
//! Pure math for the three GBP → NGN rails.
//! No I/O, no clock reads - just deterministic calculations.
//!
//! # Units
//!
//! - Send amounts and all reported fees: GBP
//! - Intermediate chain amounts: USD / USDT (treated 1:1 for fee conversion)
//! - Receive amounts: whole NGN, rounded half away from zero
//!
//! The crypto path is computed once by [`CryptoChain`]. The comparison, the
//! quote breakdown and the settlement legs all read from it, and rounding
//! happens only when a value is reported.

use railwise_core::{CryptoFees, FeeSchedule, Rail, RailError, RateTable};
use serde::{Deserialize, Serialize};

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 4 decimal places
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Smallest amount that can be sent (one penny)
pub const MIN_SEND_AMOUNT: f64 = 0.01;

/// Largest amount that can be sent in one transfer (GBP)
pub const MAX_SEND_AMOUNT: f64 = 1_000_000_000.0;

/// Whole numbers at or above this magnitude lose precision as f64 (2^53)
const MAX_EXACT_WHOLE: f64 = 9_007_199_254_740_992.0;

/// Round to a whole currency unit
pub fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

/// [`round_whole`], failing instead of saturating on unrepresentable values
pub fn checked_whole(value: f64) -> Result<i64, RailError> {
    if !value.is_finite() || value.abs() >= MAX_EXACT_WHOLE {
        return Err(RailError::InvalidAmount {
            message: format!("Derived amount {} is out of range", value),
        });
    }
    Ok(round_whole(value))
}

/// Reject send amounts outside [`MIN_SEND_AMOUNT`]..=[`MAX_SEND_AMOUNT`]
///
/// Zero, negative, NaN and infinite amounts are rejected too.
pub fn validate_send_amount(send_amount: f64) -> Result<(), RailError> {
    if !send_amount.is_finite() {
        return Err(RailError::InvalidAmount {
            message: format!("Send amount must be a finite number, got {}", send_amount),
        });
    }
    if send_amount <= 0.0 {
        return Err(RailError::InvalidAmount {
            message: format!("Send amount must be positive, got {}", send_amount),
        });
    }
    if send_amount < MIN_SEND_AMOUNT {
        return Err(RailError::InvalidAmount {
            message: format!(
                "Send amount must be at least {}, got {}",
                MIN_SEND_AMOUNT, send_amount
            ),
        });
    }
    if send_amount > MAX_SEND_AMOUNT {
        return Err(RailError::InvalidAmount {
            message: format!(
                "Send amount must not exceed {}, got {}",
                MAX_SEND_AMOUNT, send_amount
            ),
        });
    }
    Ok(())
}

/// Unrounded GBP → USD → USDT → NGN conversion for one crypto rail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CryptoChain {
    /// GBP sent
    pub send_amount: f64,
    /// USD before the FX fee
    pub usd_gross: f64,
    /// FX fee (USD)
    pub fx_fee_usd: f64,
    /// USD after the FX fee
    pub usd_net: f64,
    /// Mint fee (USDT)
    pub mint_fee_usdt: f64,
    /// USDT minted
    pub usdt_minted: f64,
    /// Flat network fee (USDT)
    pub network_fee_usdt: f64,
    /// USDT arriving at the off-ramp
    pub usdt_delivered: f64,
    /// Proportional off-ramp fee (USDT), charged on the minted amount
    pub offramp_fee_usdt: f64,
    /// NGN paid out
    pub ngn_out: f64,
}

impl CryptoChain {
    pub fn compute(send_amount: f64, rates: &RateTable, fees: &CryptoFees) -> Self {
        let usd_gross = send_amount * rates.gbp_to_usd;
        let fx_fee_usd = usd_gross * fees.fx_fee;
        let usd_net = usd_gross - fx_fee_usd;

        let usdt_gross = usd_net * rates.usd_to_usdt;
        let mint_fee_usdt = usdt_gross * fees.mint_fee;
        let usdt_minted = usdt_gross - mint_fee_usdt;

        let network_fee_usdt = fees.network_fee;
        let usdt_delivered = usdt_minted - network_fee_usdt;

        let offramp_fee_usdt = usdt_minted * fees.offramp_fee;
        let ngn_out = (usdt_delivered - offramp_fee_usdt) * rates.usdt_to_ngn;

        Self {
            send_amount,
            usd_gross,
            fx_fee_usd,
            usd_net,
            mint_fee_usdt,
            usdt_minted,
            network_fee_usdt,
            usdt_delivered,
            offramp_fee_usdt,
            ngn_out,
        }
    }

    /// Off-ramp plus network fee (USDT)
    pub fn payout_fees_usdt(&self) -> f64 {
        self.offramp_fee_usdt + self.network_fee_usdt
    }

    /// All fees expressed in GBP so they line up with the bank fee
    pub fn total_fees_gbp(&self, rates: &RateTable) -> f64 {
        let fx_fee_gbp = self.fx_fee_usd / rates.gbp_to_usd;
        fx_fee_gbp + (self.mint_fee_usdt + self.payout_fees_usdt()) / rates.gbp_to_usd
    }
}

/// Outcome of sending through one rail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailOutcome {
    /// Whole NGN received (negative when fees exceed the amount sent)
    pub receive_amount: i64,
    /// Total fees in GBP
    pub fees: f64,
    /// Fees as a percentage of the send amount
    pub fee_percentage: f64,
    pub estimated_time: String,
    pub estimated_minutes: u32,
}

/// Outcome of a crypto rail, measured against the bank rail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoRailOutcome {
    #[serde(flatten)]
    pub outcome: RailOutcome,
    /// Extra NGN received vs. the bank rail (negative if worse)
    pub savings: i64,
    /// `None` when the bank rail delivers exactly zero NGN
    pub savings_percentage: Option<f64>,
}

/// Side-by-side outcome of all three rails for one send amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailComparison {
    pub send_amount: f64,
    pub traditional: RailOutcome,
    pub crypto_fast: CryptoRailOutcome,
    pub crypto_cheap: CryptoRailOutcome,
}

impl RailComparison {
    /// Headline numbers for any rail
    pub fn outcome(&self, rail: Rail) -> &RailOutcome {
        match rail {
            Rail::Traditional => &self.traditional,
            Rail::CryptoFast => &self.crypto_fast.outcome,
            Rail::CryptoCheap => &self.crypto_cheap.outcome,
        }
    }

    /// Crypto-specific numbers, `None` for the bank rail
    pub fn crypto(&self, rail: Rail) -> Option<&CryptoRailOutcome> {
        match rail {
            Rail::Traditional => None,
            Rail::CryptoFast => Some(&self.crypto_fast),
            Rail::CryptoCheap => Some(&self.crypto_cheap),
        }
    }

    /// Rail delivering the most NGN
    pub fn best_rail(&self) -> Rail {
        Rail::ALL
            .into_iter()
            .max_by_key(|rail| self.outcome(*rail).receive_amount)
            .unwrap_or(Rail::Traditional)
    }
}

/// Unrounded bank rail figures
struct TraditionalFigures {
    fee_gbp: f64,
    ngn_out: f64,
}

fn traditional_figures(
    send_amount: f64,
    rates: &RateTable,
    fees: &FeeSchedule,
) -> TraditionalFigures {
    let t = &fees.traditional;
    let fee_gbp = t.fixed_fee + send_amount * t.markup;
    let net_gbp = send_amount - t.fixed_fee;

    TraditionalFigures {
        fee_gbp,
        ngn_out: net_gbp * rates.gbp_to_ngn_traditional,
    }
}

fn fee_percentage(fee: f64, send_amount: f64) -> f64 {
    round2(fee / send_amount * 100.0)
}

fn crypto_outcome(
    chain: &CryptoChain,
    traditional_receive: i64,
    rates: &RateTable,
    fees: &CryptoFees,
) -> Result<CryptoRailOutcome, RailError> {
    let total_fees = chain.total_fees_gbp(rates);
    let receive_amount = checked_whole(chain.ngn_out)?;
    let savings = receive_amount - traditional_receive;

    // Zero bank payout leaves the percentage undefined
    let savings_percentage = if traditional_receive == 0 {
        None
    } else {
        Some(round2(savings as f64 / traditional_receive as f64 * 100.0))
    };

    Ok(CryptoRailOutcome {
        outcome: RailOutcome {
            receive_amount,
            fees: round2(total_fees),
            fee_percentage: fee_percentage(total_fees, chain.send_amount),
            estimated_time: fees.timing.estimated_time.clone(),
            estimated_minutes: fees.timing.estimated_minutes,
        },
        savings,
        savings_percentage,
    })
}

/// Compare all three rails for a GBP send amount
///
/// Fails when the amount is out of range or the rate table is unusable;
/// never returns a partial result.
pub fn compare(
    send_amount: f64,
    rates: &RateTable,
    fees: &FeeSchedule,
) -> Result<RailComparison, RailError> {
    validate_send_amount(send_amount)?;
    rates.validate()?;

    let traditional = traditional_figures(send_amount, rates, fees);
    let fast = CryptoChain::compute(send_amount, rates, &fees.crypto_fast);
    let cheap = CryptoChain::compute(send_amount, rates, &fees.crypto_cheap);

    let traditional_receive = checked_whole(traditional.ngn_out)?;
    let traditional_timing = fees.timing(Rail::Traditional);

    let comparison = RailComparison {
        send_amount,
        traditional: RailOutcome {
            receive_amount: traditional_receive,
            fees: round2(traditional.fee_gbp),
            fee_percentage: fee_percentage(traditional.fee_gbp, send_amount),
            estimated_time: traditional_timing.estimated_time.clone(),
            estimated_minutes: traditional_timing.estimated_minutes,
        },
        crypto_fast: crypto_outcome(&fast, traditional_receive, rates, &fees.crypto_fast)?,
        crypto_cheap: crypto_outcome(&cheap, traditional_receive, rates, &fees.crypto_cheap)?,
    };

    tracing::debug!(
        send_amount,
        traditional = comparison.traditional.receive_amount,
        crypto_fast = comparison.crypto_fast.outcome.receive_amount,
        crypto_cheap = comparison.crypto_cheap.outcome.receive_amount,
        "Compared rails"
    );

    Ok(comparison)
}

/// [`compare`] against the shipped rate table and fee schedule
pub fn compare_default(send_amount: f64) -> Result<RailComparison, RailError> {
    compare(send_amount, &RateTable::default(), &FeeSchedule::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> (RateTable, FeeSchedule) {
        (RateTable::default(), FeeSchedule::default())
    }

    #[test]
    fn test_scenario_500_gbp() {
        let result = compare_default(500.0).unwrap();

        // (500 - 2.99) * 1685.50 = 837,710.355
        assert_eq!(result.traditional.receive_amount, 837_710);
        assert_eq!(result.traditional.fees, 25.49);
        assert_eq!(result.traditional.fee_percentage, 5.1);

        // 631.713 USD net, 9.975695 USDT off-ramp + network fee
        assert_eq!(result.crypto_fast.outcome.receive_amount, 981_257);
        assert_eq!(result.crypto_fast.outcome.fees, 9.86);
        assert_eq!(result.crypto_fast.savings, 143_547);
        assert_eq!(result.crypto_fast.savings_percentage, Some(17.14));

        assert_eq!(result.crypto_cheap.outcome.receive_amount, 986_873);
        assert_eq!(result.crypto_cheap.outcome.fees, 7.06);
    }

    #[test]
    fn test_timing_comes_from_fee_schedule() {
        let result = compare_default(100.0).unwrap();
        assert_eq!(result.traditional.estimated_time, "1-3 business days");
        assert_eq!(result.traditional.estimated_minutes, 2880);
        assert_eq!(result.crypto_fast.outcome.estimated_minutes, 20);
        assert_eq!(result.crypto_cheap.outcome.estimated_time, "2-6 hours");
    }

    #[test]
    fn test_crypto_beats_traditional_under_defaults() {
        for amount in [0.01, 0.5, 1.0, 2.99, 10.0, 123.45, 500.0, 5_000.0, 1_000_000.0] {
            let result = compare_default(amount).unwrap();
            assert!(
                result.crypto_fast.outcome.receive_amount > result.traditional.receive_amount,
                "fast rail lost at {}",
                amount
            );
            assert!(
                result.crypto_cheap.outcome.receive_amount > result.traditional.receive_amount,
                "cheap rail lost at {}",
                amount
            );
        }
    }

    #[test]
    fn test_cheap_rail_never_costs_more() {
        for amount in [0.01, 1.0, 50.0, 500.0, 20_000.0, 1_000_000.0] {
            let result = compare_default(amount).unwrap();
            assert!(
                result.crypto_cheap.outcome.fee_percentage
                    <= result.crypto_fast.outcome.fee_percentage
            );
            assert!(
                result.crypto_cheap.outcome.estimated_minutes
                    >= result.crypto_fast.outcome.estimated_minutes
            );
        }
    }

    #[test]
    fn test_compare_is_idempotent() {
        let (rates, fees) = defaults();
        let first = compare(742.18, &rates, &fees).unwrap();
        let second = compare(742.18, &rates, &fees).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_boundary_amounts_have_non_negative_fees() {
        for amount in [0.01, 1_000_000.0] {
            let result = compare_default(amount).unwrap();
            for rail in Rail::ALL {
                let outcome = result.outcome(rail);
                assert!(outcome.fees >= 0.0);
                assert!(outcome.fee_percentage.is_finite());
            }
        }

        let large = compare_default(1_000_000.0).unwrap();
        assert_eq!(large.traditional.receive_amount, 1_685_494_960);
        assert_eq!(large.crypto_fast.outcome.receive_amount, 1_964_091_264);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        for amount in [-10.0, 0.0, -0.01, f64::NAN, f64::INFINITY] {
            let err = compare_default(amount).unwrap_err();
            assert_eq!(err.error_code(), "invalid_amount");
        }
    }

    #[test]
    fn test_rejects_amounts_outside_range() {
        for amount in [1e-307, 0.009, MAX_SEND_AMOUNT * 2.0, 1e17] {
            let err = compare_default(amount).unwrap_err();
            assert_eq!(err.error_code(), "invalid_amount", "accepted {}", amount);
        }

        let smallest = compare_default(MIN_SEND_AMOUNT).unwrap();
        assert!(smallest.traditional.fee_percentage.is_finite());
        assert!(compare_default(MAX_SEND_AMOUNT).is_ok());
    }

    #[test]
    fn test_rejects_payout_too_large_to_represent() {
        let (mut rates, fees) = defaults();
        rates.usdt_to_ngn = 1e12;

        let err = compare(MAX_SEND_AMOUNT, &rates, &fees).unwrap_err();
        assert_eq!(err.error_code(), "invalid_amount");
    }

    #[test]
    fn test_savings_is_difference_of_receive_amounts() {
        for pennies in (101..20_099).step_by(7) {
            let amount = pennies as f64 / 100.0;
            let result = compare_default(amount).unwrap();
            let traditional = result.traditional.receive_amount;

            for crypto in [&result.crypto_fast, &result.crypto_cheap] {
                assert_eq!(
                    crypto.savings,
                    crypto.outcome.receive_amount - traditional,
                    "savings drifted at {}",
                    amount
                );
            }
        }

        let result = compare_default(1.02).unwrap();
        assert_eq!(
            result.crypto_fast.savings,
            result.crypto_fast.outcome.receive_amount - result.traditional.receive_amount
        );
    }

    #[test]
    fn test_rejects_zero_rate() {
        let (mut rates, fees) = defaults();
        rates.gbp_to_usd = 0.0;
        assert!(compare(100.0, &rates, &fees).is_err());
    }

    #[test]
    fn test_zero_traditional_payout_has_no_savings_percentage() {
        // Sending exactly the fixed fee leaves nothing to convert
        let result = compare_default(2.99).unwrap();
        assert_eq!(result.traditional.receive_amount, 0);
        assert_eq!(result.crypto_fast.savings_percentage, None);
        assert_eq!(result.crypto_cheap.savings_percentage, None);
        assert!(result.crypto_fast.savings > 0);
    }

    #[test]
    fn test_savings_can_go_negative() {
        let (mut rates, fees) = defaults();
        rates.gbp_to_ngn_traditional = 3_000.0;

        let result = compare(500.0, &rates, &fees).unwrap();
        assert!(result.crypto_fast.savings < 0);
        assert!(result.crypto_fast.savings_percentage.unwrap() < 0.0);
        assert_eq!(result.best_rail(), Rail::Traditional);
    }

    #[test]
    fn test_chain_matches_headline_formula() {
        let (rates, fees) = defaults();
        let chain = CryptoChain::compute(500.0, &rates, &fees.crypto_fast);

        let usd = 500.0 * rates.gbp_to_usd * (1.0 - fees.crypto_fast.fx_fee);
        let offramp = usd * fees.crypto_fast.offramp_fee + fees.crypto_fast.network_fee;
        let expected = (usd - offramp) * rates.usdt_to_ngn;

        assert!((chain.ngn_out - expected).abs() < 1e-6);
        assert_eq!(chain.mint_fee_usdt, 0.0);
        assert_eq!(chain.usdt_minted, chain.usd_net);
    }

    #[test]
    fn test_best_rail_under_defaults() {
        let result = compare_default(500.0).unwrap();
        assert_eq!(result.best_rail(), Rail::CryptoCheap);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round2(9.864166), 9.86);
        assert_eq!(round4(2.5370001), 2.537);
        assert_eq!(round_whole(981_256.9016), 981_257);
        assert_eq!(round_whole(-769.4), -769);
        assert_eq!(checked_whole(-769.4), Ok(-769));
        assert!(checked_whole(f64::INFINITY).is_err());
        assert!(checked_whole(1e17).is_err());
    }
}
