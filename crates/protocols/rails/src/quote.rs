//! Rail Quotes
//!
//! A quote freezes one rail's outcome for [`QUOTE_TTL_SECS`] seconds.
//!
//! Expiry is a contract, not something this module enforces: a quote used
//! after `expires_at` is stale because rates may have moved, and the caller
//! must generate a new one rather than reuse it. [`Quote::is_expired`] is the
//! check to apply.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use railwise_core::{Currency, FeeSchedule, Rail, RailError, RateTable};
use serde::{Deserialize, Serialize};

use crate::calculator::{compare, round2, round4, CryptoChain};

/// Quote lifetime (5 minutes)
pub const QUOTE_TTL_SECS: i64 = 300;

static QUOTE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Rate applied on one conversion step and the fee it costs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRate {
    pub rate: f64,
    /// Fee charged on the step: USD for `gbp_to_usd`, otherwise the step's
    /// input currency
    pub fee: f64,
}

/// Per-step view of the stablecoin sandwich
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoBreakdown {
    pub gbp_to_usd: StepRate,
    pub usd_to_usdt: StepRate,
    /// Fee covers both the off-ramp and network charges
    pub usdt_to_ngn: StepRate,
}

/// Bank rail conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraditionalBreakdown {
    pub gbp_to_ngn: StepRate,
    pub fixed_fee: f64,
    pub markup_fee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteBreakdown {
    Crypto(CryptoBreakdown),
    Traditional(TraditionalBreakdown),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    pub amount: i64,
    pub percentage: Option<f64>,
}

/// Single-rail quote for a GBP send amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub rail: Rail,
    pub send_amount: f64,
    pub send_currency: Currency,
    pub receive_amount: i64,
    pub receive_currency: Currency,
    /// NGN received per GBP sent, after fees
    pub effective_rate: f64,
    pub breakdown: QuoteBreakdown,
    pub total_fees: f64,
    pub total_fees_percentage: f64,
    pub estimated_time: String,
    pub estimated_time_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub savings_vs_traditional: Savings,
}

impl Quote {
    /// Whether the quote is stale at `at`
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        at >= self.expires_at
    }
}

fn next_quote_id(now: DateTime<Utc>) -> String {
    let seq = QUOTE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("QT-{}-{:06}", now.timestamp_millis(), seq)
}

/// Generate a quote for `rail`
///
/// `now` is supplied by the caller; everything except `id` is a pure function
/// of the inputs.
pub fn generate_quote(
    send_amount: f64,
    rail: Rail,
    rates: &RateTable,
    fees: &FeeSchedule,
    now: DateTime<Utc>,
) -> Result<Quote, RailError> {
    let comparison = compare(send_amount, rates, fees)?;
    let outcome = comparison.outcome(rail);

    let (breakdown, savings) = match fees.crypto(rail) {
        Some(crypto_fees) => {
            let chain = CryptoChain::compute(send_amount, rates, crypto_fees);
            let breakdown = QuoteBreakdown::Crypto(CryptoBreakdown {
                gbp_to_usd: StepRate {
                    rate: rates.gbp_to_usd,
                    fee: round4(chain.fx_fee_usd),
                },
                usd_to_usdt: StepRate {
                    rate: rates.usd_to_usdt,
                    fee: round4(chain.mint_fee_usdt),
                },
                usdt_to_ngn: StepRate {
                    rate: rates.usdt_to_ngn,
                    fee: round4(chain.payout_fees_usdt()),
                },
            });
            let savings = comparison
                .crypto(rail)
                .map(|crypto| Savings {
                    amount: crypto.savings,
                    percentage: crypto.savings_percentage,
                })
                .unwrap_or(Savings {
                    amount: 0,
                    percentage: Some(0.0),
                });
            (breakdown, savings)
        }
        None => {
            let t = &fees.traditional;
            let breakdown = QuoteBreakdown::Traditional(TraditionalBreakdown {
                gbp_to_ngn: StepRate {
                    rate: rates.gbp_to_ngn_traditional,
                    fee: round2(t.fixed_fee + send_amount * t.markup),
                },
                fixed_fee: t.fixed_fee,
                markup_fee: round2(send_amount * t.markup),
            });
            let savings = Savings {
                amount: 0,
                percentage: Some(0.0),
            };
            (breakdown, savings)
        }
    };

    let quote = Quote {
        id: next_quote_id(now),
        rail,
        send_amount,
        send_currency: Currency::Gbp,
        receive_amount: outcome.receive_amount,
        receive_currency: Currency::Ngn,
        effective_rate: outcome.receive_amount as f64 / send_amount,
        breakdown,
        total_fees: outcome.fees,
        total_fees_percentage: outcome.fee_percentage,
        estimated_time: outcome.estimated_time.clone(),
        estimated_time_minutes: outcome.estimated_minutes,
        created_at: now,
        expires_at: now + TimeDelta::seconds(QUOTE_TTL_SECS),
        savings_vs_traditional: savings,
    };

    tracing::debug!(
        quote_id = %quote.id,
        %rail,
        send_amount,
        receive_amount = quote.receive_amount,
        "Generated quote"
    );

    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn quote(amount: f64, rail: Rail) -> Result<Quote, RailError> {
        generate_quote(
            amount,
            rail,
            &RateTable::default(),
            &FeeSchedule::default(),
            now(),
        )
    }

    #[test]
    fn test_crypto_fast_quote() {
        let q = quote(500.0, Rail::CryptoFast).unwrap();

        assert_eq!(q.rail, Rail::CryptoFast);
        assert_eq!(q.send_currency, Currency::Gbp);
        assert_eq!(q.receive_currency, Currency::Ngn);
        assert_eq!(q.receive_amount, 981_257);
        assert_eq!(q.total_fees, 9.86);
        assert_eq!(q.estimated_time_minutes, 20);
        assert_eq!(q.savings_vs_traditional.amount, 143_547);
        assert_eq!(q.savings_vs_traditional.percentage, Some(17.14));
        assert!((q.effective_rate - 981_257.0 / 500.0).abs() < 1e-9);

        match q.breakdown {
            QuoteBreakdown::Crypto(b) => {
                assert_eq!(b.gbp_to_usd.rate, 1.2685);
                assert_eq!(b.gbp_to_usd.fee, 2.537);
                assert_eq!(b.usd_to_usdt.fee, 0.0);
                assert_eq!(b.usdt_to_ngn.rate, 1578.25);
                assert_eq!(b.usdt_to_ngn.fee, 9.9757);
            }
            other => panic!("unexpected breakdown {:?}", other),
        }
    }

    #[test]
    fn test_quote_matches_comparison() {
        let comparison = crate::compare_default(1234.5).unwrap();
        let q = quote(1234.5, Rail::CryptoCheap).unwrap();
        assert_eq!(q.receive_amount, comparison.crypto_cheap.outcome.receive_amount);
        assert_eq!(q.total_fees_percentage, comparison.crypto_cheap.outcome.fee_percentage);
    }

    #[test]
    fn test_traditional_quote() {
        let q = quote(500.0, Rail::Traditional).unwrap();
        assert_eq!(q.receive_amount, 837_710);
        assert_eq!(q.savings_vs_traditional.amount, 0);

        match q.breakdown {
            QuoteBreakdown::Traditional(b) => {
                assert_eq!(b.gbp_to_ngn.rate, 1685.50);
                assert_eq!(b.fixed_fee, 2.99);
                assert_eq!(b.markup_fee, 22.5);
                assert_eq!(b.gbp_to_ngn.fee, 25.49);
            }
            other => panic!("unexpected breakdown {:?}", other),
        }
    }

    #[test]
    fn test_expiry_is_five_minutes() {
        let q = quote(100.0, Rail::CryptoFast).unwrap();
        assert_eq!(q.expires_at - q.created_at, TimeDelta::minutes(5));
        assert!(!q.is_expired(now() + TimeDelta::seconds(299)));
        assert!(q.is_expired(now() + TimeDelta::seconds(300)));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = quote(100.0, Rail::CryptoFast).unwrap();
        let b = quote(100.0, Rail::CryptoFast).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("QT-"));

        // Everything but the id is reproducible
        let b = Quote { id: a.id.clone(), ..b };
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_rail_rejected_at_parse() {
        let err = "crypto_instant".parse::<Rail>().unwrap_err();
        assert_eq!(err.error_code(), "unknown_rail");
    }

    #[test]
    fn test_invalid_amount_rejected() {
        let err = quote(0.0, Rail::CryptoFast).unwrap_err();
        assert_eq!(err.error_code(), "invalid_amount");
    }

    #[test]
    fn test_serialized_shape() {
        let q = quote(500.0, Rail::CryptoFast).unwrap();
        let json = serde_json::to_value(&q).unwrap();

        assert_eq!(json["rail"], "crypto_fast");
        assert_eq!(json["sendCurrency"], "GBP");
        assert_eq!(json["breakdown"]["kind"], "crypto");
        assert_eq!(json["breakdown"]["gbpToUsd"]["rate"], 1.2685);
        assert_eq!(json["expiresAt"], "2025-01-15T12:05:00Z");
        assert_eq!(json["savingsVsTraditional"]["amount"], 143_547);
    }
}
