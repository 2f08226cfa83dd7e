//! Runtime configuration, from defaults and `CHECKOUT_*` environment variables.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Capacity of every service actor's request channel.
    pub channel_buffer: usize,
    /// Deadline for a single collaborator call. `None` waits forever.
    pub call_timeout: Option<Duration>,
    /// Flat shipping rate, in USD.
    pub shipping_rate: Money,
    /// Catalog JSON to load instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
    /// Currency rate JSON to load instead of the bundled one.
    pub currency_rates_path: Option<PathBuf>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            call_timeout: Some(Duration::from_secs(5)),
            shipping_rate: Money::new("USD", 8, 990_000_000),
            catalog_path: None,
            currency_rates_path: None,
        }
    }
}

impl CheckoutConfig {
    /// Reads the process environment. Unset variables keep their default.
    ///
    /// - `CHECKOUT_CHANNEL_BUFFER`: positive integer
    /// - `CHECKOUT_CALL_TIMEOUT_MS`: milliseconds, `0` disables the timeout
    /// - `CHECKOUT_SHIPPING_RATE_USD`: decimal, e.g. `8.99`
    /// - `CHECKOUT_CATALOG_PATH`, `CHECKOUT_CURRENCY_RATES_PATH`: file paths
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("CHECKOUT_CHANNEL_BUFFER") {
            config.channel_buffer = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(invalid(
                        "CHECKOUT_CHANNEL_BUFFER",
                        value,
                        "expected a positive integer",
                    ))
                }
            };
        }
        if let Some(value) = lookup("CHECKOUT_CALL_TIMEOUT_MS") {
            let ms = value.trim().parse::<u64>().map_err(|e| {
                invalid("CHECKOUT_CALL_TIMEOUT_MS", value.clone(), &e.to_string())
            })?;
            config.call_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(value) = lookup("CHECKOUT_SHIPPING_RATE_USD") {
            config.shipping_rate = match Money::parse("USD", &value) {
                Ok(rate) if !rate.is_negative() => rate,
                Ok(_) => {
                    return Err(invalid(
                        "CHECKOUT_SHIPPING_RATE_USD",
                        value,
                        "must not be negative",
                    ))
                }
                Err(e) => {
                    let reason = e.to_string();
                    return Err(invalid("CHECKOUT_SHIPPING_RATE_USD", value, &reason));
                }
            };
        }
        if let Some(value) = lookup("CHECKOUT_CATALOG_PATH") {
            config.catalog_path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("CHECKOUT_CURRENCY_RATES_PATH") {
            config.currency_rates_path = Some(PathBuf::from(value));
        }
        Ok(config)
    }
}

fn invalid(name: &str, value: String, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value,
        reason: reason.to_string(),
    }
}
