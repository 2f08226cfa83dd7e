//! Currency converter backed by a static EUR-based rate table.
//!
//! Each rate is the value of one euro in that currency. Rates are held as
//! nano fixed-point integers, and a conversion is
//! `amount * to_rate / from_rate` in 128-bit integer arithmetic, truncated
//! toward zero. Truncation keeps units and nanos on the same side of zero, so
//! the result is always a valid [`Money`].

use crate::framework::{FrameworkError, Service};
use crate::money::{parse_nanos, Money};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// The rate table bundled with the crate.
pub const DEFAULT_RATES_JSON: &str = include_str!("../../data/currency_conversion.json");

/// Errors that can occur during currency operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CurrencyError {
    #[error("Unsupported currency: {0}")]
    Unsupported(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Converted amount out of range")]
    Overflow,

    /// The rate table could not be loaded.
    #[error("Invalid rate table: {0}")]
    InvalidRates(String),

    #[error("Currency transport error: {0}")]
    Transport(#[from] FrameworkError),
}

#[derive(Debug, Clone)]
pub enum CurrencyRequest {
    GetSupportedCurrencies,
    Convert { from: Money, to_code: String },
}

#[derive(Debug, Clone)]
pub enum CurrencyResponse {
    Currencies(Vec<String>),
    Converted(Money),
}

#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    /// Value of one EUR, in nanos of each currency.
    rates: HashMap<String, i128>,
}

impl CurrencyConverter {
    /// Loads a table of `{"CODE": "rate"}`. Rates must be positive decimals.
    pub fn from_json(json: &str) -> Result<Self, CurrencyError> {
        let raw: BTreeMap<String, String> =
            serde_json::from_str(json).map_err(|e| CurrencyError::InvalidRates(e.to_string()))?;
        let mut rates = HashMap::with_capacity(raw.len());
        for (code, text) in raw {
            match parse_nanos(&text) {
                Some(rate) if rate > 0 => {
                    rates.insert(code, rate);
                }
                _ => {
                    return Err(CurrencyError::InvalidRates(format!(
                        "rate for {code} is {text:?}"
                    )))
                }
            }
        }
        Ok(Self { rates })
    }

    pub fn supports(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn supported_currencies(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }

    fn rate(&self, code: &str) -> Result<i128, CurrencyError> {
        self.rates
            .get(code)
            .copied()
            .ok_or_else(|| CurrencyError::Unsupported(code.to_string()))
    }

    pub fn convert(&self, from: &Money, to_code: &str) -> Result<Money, CurrencyError> {
        let from_rate = self.rate(&from.currency_code)?;
        let to_rate = self.rate(to_code)?;
        if !from.is_valid() {
            return Err(CurrencyError::InvalidAmount(format!("{from:?}")));
        }

        let total = from
            .total_nanos()
            .checked_mul(to_rate)
            .ok_or(CurrencyError::Overflow)?
            / from_rate;
        Money::from_total_nanos(to_code, total).map_err(|_| CurrencyError::Overflow)
    }
}

#[async_trait]
impl Service for CurrencyConverter {
    type Request = CurrencyRequest;
    type Response = CurrencyResponse;
    type Error = CurrencyError;

    async fn handle(
        &mut self,
        request: CurrencyRequest,
    ) -> Result<CurrencyResponse, CurrencyError> {
        match request {
            CurrencyRequest::GetSupportedCurrencies => {
                Ok(CurrencyResponse::Currencies(self.supported_currencies()))
            }
            CurrencyRequest::Convert { from, to_code } => {
                self.convert(&from, &to_code).map(CurrencyResponse::Converted)
            }
        }
    }
}
