//! GBP to NGN Payment Rails
//!
//! This crate compares the rails a GBP to NGN transfer can take and models
//! the settlement of the crypto rails.
//!
//! # Rails
//!
//! - Bank Transfer: direct GBP to NGN conversion with a fixed fee and markup
//! - Crypto Express / Crypto Saver: GBP to USD to USDT to NGN, differing only
//!   in off-ramp and network fees and delivery time
//!
//! # Features
//!
//! - Side-by-side outcome comparison with savings versus the bank rail
//! - Time-limited single-rail quotes with a per-step breakdown
//! - Transfer stages with progress and display text
//! - Four settlement legs synthesized from a transfer's stage
//!
//! # Example
//!
//! ```ignore
//! use rails::{compare_default, Rail};
//!
//! let comparison = compare_default(500.0)?;
//! println!("Best rail: {}", comparison.best_rail().display_name());
//! ```

pub mod banks;
pub mod calculator;
pub mod display;
pub mod legs;
pub mod quote;
pub mod rates;
pub mod stage;
pub mod transaction;

pub use banks::*;
pub use calculator::*;
pub use display::*;
pub use legs::*;
pub use quote::*;
pub use railwise_core::{FeeSchedule, Rail, RailError, RateTable};
pub use rates::{current_rates, RatesSnapshot};
pub use stage::*;
pub use transaction::*;
