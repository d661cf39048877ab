//! Core type definitions for Railwise

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RailError;

/// Settlement rail for a GBP → NGN transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rail {
    /// Correspondent banking with an FX markup
    Traditional,
    /// Stablecoin sandwich, settled per transaction
    CryptoFast,
    /// Stablecoin sandwich, settled in batches
    CryptoCheap,
}

impl Rail {
    pub const ALL: [Rail; 3] = [Rail::Traditional, Rail::CryptoFast, Rail::CryptoCheap];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traditional => "traditional",
            Self::CryptoFast => "crypto_fast",
            Self::CryptoCheap => "crypto_cheap",
        }
    }

    /// Customer-facing product name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Traditional => "Bank Transfer",
            Self::CryptoFast => "Crypto Express",
            Self::CryptoCheap => "Crypto Saver",
        }
    }

    pub fn is_crypto(&self) -> bool {
        !matches!(self, Self::Traditional)
    }
}

impl fmt::Display for Rail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rail {
    type Err = RailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "traditional" => Ok(Self::Traditional),
            "crypto_fast" => Ok(Self::CryptoFast),
            "crypto_cheap" => Ok(Self::CryptoCheap),
            other => Err(RailError::UnknownRail {
                value: other.to_string(),
            }),
        }
    }
}

/// Currencies that appear along the GBP → NGN route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Gbp,
    Usd,
    Usdt,
    Usdc,
    Ngn,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gbp => "GBP",
            Self::Usd => "USD",
            Self::Usdt => "USDT",
            Self::Usdc => "USDC",
            Self::Ngn => "NGN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement provider executing a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Revolut,
    RevolutX,
    YellowCard,
    Circle,
    Moonpay,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revolut => "revolut",
            Self::RevolutX => "revolut_x",
            Self::YellowCard => "yellow_card",
            Self::Circle => "circle",
            Self::Moonpay => "moonpay",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Revolut => "Revolut",
            Self::RevolutX => "Revolut X Exchange",
            Self::YellowCard => "Yellow Card",
            Self::Circle => "Circle",
            Self::Moonpay => "MoonPay",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exchange rates used by every calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    /// USD per 1 GBP
    pub gbp_to_usd: f64,
    /// NGN per 1 GBP through the banking rail
    pub gbp_to_ngn_traditional: f64,
    /// USDT per 1 USD (peg)
    pub usd_to_usdt: f64,
    /// NGN per 1 USDT at the off-ramp
    pub usdt_to_ngn: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            gbp_to_usd: constants::GBP_USD,
            gbp_to_ngn_traditional: constants::GBP_NGN_TRADITIONAL,
            usd_to_usdt: constants::USD_USDT,
            usdt_to_ngn: constants::USDT_NGN,
        }
    }
}

impl RateTable {
    /// Every rate must be a positive finite number
    pub fn validate(&self) -> Result<(), RailError> {
        let rates = [
            ("gbpToUsd", self.gbp_to_usd),
            ("gbpToNgnTraditional", self.gbp_to_ngn_traditional),
            ("usdToUsdt", self.usd_to_usdt),
            ("usdtToNgn", self.usdt_to_ngn),
        ];
        for (name, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(RailError::InvalidRates {
                    reason: format!("{} must be positive, got {}", name, rate),
                });
            }
        }
        Ok(())
    }
}

/// Delivery time advertised for a rail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailTiming {
    pub estimated_time: String,
    pub estimated_minutes: u32,
}

impl RailTiming {
    pub fn new(estimated_time: impl Into<String>, estimated_minutes: u32) -> Self {
        Self {
            estimated_time: estimated_time.into(),
            estimated_minutes,
        }
    }
}

/// Fees charged by the banking rail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraditionalFees {
    /// Flat fee in GBP, deducted before conversion
    pub fixed_fee: f64,
    /// FX markup as a fraction of the send amount
    pub markup: f64,
    pub timing: RailTiming,
}

/// Fees charged along the stablecoin sandwich
///
/// Fractions are applied to the amount entering the step; `network_fee` is a
/// flat USD charge for the on-chain transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoFees {
    pub fx_fee: f64,
    pub mint_fee: f64,
    pub offramp_fee: f64,
    pub network_fee: f64,
    pub timing: RailTiming,
}

impl CryptoFees {
    fn validate(&self, rail: Rail) -> Result<(), RailError> {
        let fractions = [
            ("fxFee", self.fx_fee),
            ("mintFee", self.mint_fee),
            ("offrampFee", self.offramp_fee),
        ];
        for (name, fraction) in fractions {
            if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
                return Err(RailError::InvalidFees {
                    reason: format!("{} {} must be in [0, 1), got {}", rail, name, fraction),
                });
            }
        }
        if !self.network_fee.is_finite() || self.network_fee < 0.0 {
            return Err(RailError::InvalidFees {
                reason: format!("{} networkFee must be >= 0, got {}", rail, self.network_fee),
            });
        }
        Ok(())
    }
}

/// Fee parameters for all three rails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    pub traditional: TraditionalFees,
    pub crypto_fast: CryptoFees,
    pub crypto_cheap: CryptoFees,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        use constants::*;

        Self {
            traditional: TraditionalFees {
                fixed_fee: TRADITIONAL_FIXED_FEE_GBP,
                markup: TRADITIONAL_MARKUP,
                timing: RailTiming::new("1-3 business days", 2880),
            },
            crypto_fast: CryptoFees {
                fx_fee: FX_FEE,
                mint_fee: 0.0,
                offramp_fee: FAST_OFFRAMP_FEE,
                network_fee: FAST_NETWORK_FEE_USD,
                timing: RailTiming::new("10-30 minutes", 20),
            },
            crypto_cheap: CryptoFees {
                fx_fee: FX_FEE,
                mint_fee: 0.0,
                offramp_fee: CHEAP_OFFRAMP_FEE,
                network_fee: CHEAP_NETWORK_FEE_USD,
                timing: RailTiming::new("2-6 hours", 240),
            },
        }
    }
}

impl FeeSchedule {
    /// Fee parameters for a crypto rail, `None` for the banking rail
    pub fn crypto(&self, rail: Rail) -> Option<&CryptoFees> {
        match rail {
            Rail::Traditional => None,
            Rail::CryptoFast => Some(&self.crypto_fast),
            Rail::CryptoCheap => Some(&self.crypto_cheap),
        }
    }

    pub fn timing(&self, rail: Rail) -> &RailTiming {
        match rail {
            Rail::Traditional => &self.traditional.timing,
            Rail::CryptoFast => &self.crypto_fast.timing,
            Rail::CryptoCheap => &self.crypto_cheap.timing,
        }
    }

    /// Check parameter ranges and the cheap-vs-fast ordering
    ///
    /// The batched rail may never charge a higher off-ramp fee than the fast
    /// rail, and may never be advertised as quicker.
    pub fn validate(&self) -> Result<(), RailError> {
        let t = &self.traditional;
        if !t.fixed_fee.is_finite() || t.fixed_fee < 0.0 {
            return Err(RailError::InvalidFees {
                reason: format!("traditional fixedFee must be >= 0, got {}", t.fixed_fee),
            });
        }
        if !t.markup.is_finite() || !(0.0..1.0).contains(&t.markup) {
            return Err(RailError::InvalidFees {
                reason: format!("traditional markup must be in [0, 1), got {}", t.markup),
            });
        }

        self.crypto_fast.validate(Rail::CryptoFast)?;
        self.crypto_cheap.validate(Rail::CryptoCheap)?;

        if self.crypto_cheap.offramp_fee > self.crypto_fast.offramp_fee {
            return Err(RailError::InvalidFees {
                reason: "crypto_cheap offrampFee exceeds crypto_fast".to_string(),
            });
        }
        if self.crypto_cheap.timing.estimated_minutes < self.crypto_fast.timing.estimated_minutes
        {
            return Err(RailError::InvalidFees {
                reason: "crypto_cheap is advertised faster than crypto_fast".to_string(),
            });
        }
        Ok(())
    }
}

/// Shipped rate and fee parameters
pub mod constants {
    /// USD per GBP
    pub const GBP_USD: f64 = 1.2685;

    /// NGN per GBP via correspondent banking
    pub const GBP_NGN_TRADITIONAL: f64 = 1685.50;

    /// USDT per USD, 1:1 mint
    pub const USD_USDT: f64 = 1.0;

    /// NGN per USDT at the off-ramp
    pub const USDT_NGN: f64 = 1578.25;

    /// Bank transfer flat fee (GBP)
    pub const TRADITIONAL_FIXED_FEE_GBP: f64 = 2.99;

    /// Bank FX markup (4.5%)
    pub const TRADITIONAL_MARKUP: f64 = 0.045;

    /// GBP → USD conversion fee during market hours (0.4%)
    pub const FX_FEE: f64 = 0.004;

    /// Off-ramp fee for per-transaction settlement (1.5%)
    pub const FAST_OFFRAMP_FEE: f64 = 0.015;

    /// Off-ramp fee with batching (1%)
    pub const CHEAP_OFFRAMP_FEE: f64 = 0.01;

    /// Per-transfer network fee (USD)
    pub const FAST_NETWORK_FEE_USD: f64 = 0.50;

    /// Amortised network fee for batched transfers (USD)
    pub const CHEAP_NETWORK_FEE_USD: f64 = 0.10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rail_parsing() {
        assert_eq!("crypto_fast".parse::<Rail>().unwrap(), Rail::CryptoFast);
        assert_eq!("traditional".parse::<Rail>().unwrap(), Rail::Traditional);

        let err = "crypto_turbo".parse::<Rail>().unwrap_err();
        assert_eq!(err.error_code(), "unknown_rail");
    }

    #[test]
    fn test_rail_display() {
        assert_eq!(Rail::CryptoCheap.as_str(), "crypto_cheap");
        assert_eq!(Rail::CryptoFast.display_name(), "Crypto Express");
        assert!(!Rail::Traditional.is_crypto());
    }

    #[test]
    fn test_rail_serde_names() {
        let json = serde_json::to_string(&Rail::CryptoCheap).unwrap();
        assert_eq!(json, "\"crypto_cheap\"");
        let currency = serde_json::to_string(&Currency::Usdt).unwrap();
        assert_eq!(currency, "\"USDT\"");
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(Provider::RevolutX.display_name(), "Revolut X Exchange");
        assert_eq!(Provider::YellowCard.as_str(), "yellow_card");
    }

    #[test]
    fn test_default_parameters_are_valid() {
        RateTable::default().validate().unwrap();
        FeeSchedule::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let rates = RateTable {
            usdt_to_ngn: 0.0,
            ..RateTable::default()
        };
        let err = rates.validate().unwrap_err();
        assert_eq!(err.error_code(), "invalid_rates");
    }

    #[test]
    fn test_rejects_cheap_rail_with_higher_offramp_fee() {
        let mut fees = FeeSchedule::default();
        fees.crypto_cheap.offramp_fee = 0.02;
        assert!(fees.validate().is_err());
    }

    #[test]
    fn test_rejects_cheap_rail_faster_than_fast() {
        let mut fees = FeeSchedule::default();
        fees.crypto_cheap.timing.estimated_minutes = 5;
        assert!(fees.validate().is_err());
    }
}
