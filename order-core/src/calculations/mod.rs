//! Pricing and display calculations for the order summary panel.

pub mod common;
pub mod currency;
pub mod pricing;

pub use currency::{CurrencyFormat, DigitGrouping};
pub use pricing::{PricingEngine, TAX_RATE};
