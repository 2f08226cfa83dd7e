use crate::checkout::CheckoutStage;
use crate::money::MoneyError;
use thiserror::Error;

/// Why a checkout failed, or what went wrong after the order was placed.
///
/// Every variant names the thing being processed (`subject`: a product id,
/// user id, currency code or email address) and the underlying reason.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Invalid amount for {subject}: {reason}")]
    InvalidAmount { subject: String, reason: String },

    #[error("Currency mismatch for {subject}: {reason}")]
    CurrencyMismatch { subject: String, reason: String },

    #[error("Unsupported currency for {subject}: {reason}")]
    UnsupportedCurrency { subject: String, reason: String },

    #[error("Failed to convert {subject}: {reason}")]
    ConversionFailed { subject: String, reason: String },

    #[error("Product {subject} not found: {reason}")]
    NotFound { subject: String, reason: String },

    #[error("Failed to look up product {subject}: {reason}")]
    CatalogUnavailable { subject: String, reason: String },

    #[error("Failed to get cart of user {subject}: {reason}")]
    CartUnavailable { subject: String, reason: String },

    #[error("Failed to quote shipping for {subject}: {reason}")]
    QuoteFailed { subject: String, reason: String },

    #[error("Payment declined for user {subject}: {reason}")]
    PaymentDeclined { subject: String, reason: String },

    #[error("Card rejected for user {subject}: {reason}")]
    InvalidCard { subject: String, reason: String },

    #[error("Shipping failed for user {subject}: {reason}")]
    ShippingFailed { subject: String, reason: String },

    /// Recorded, never returned: the order already went through.
    #[error("Failed to send order confirmation to {subject}: {reason}")]
    NotificationFailed { subject: String, reason: String },

    /// Recorded, never returned: the order already went through.
    #[error("Failed to empty cart of user {subject}: {reason}")]
    CartClearFailed { subject: String, reason: String },

    #[error("Checkout cancelled after stage {stage:?}")]
    Cancelled { stage: CheckoutStage },
}

impl CheckoutError {
    /// Maps a money arithmetic failure on `subject`.
    pub fn from_money(subject: &str, error: MoneyError) -> Self {
        let subject = subject.to_string();
        let reason = error.to_string();
        match error {
            MoneyError::MismatchingCurrency { .. } => {
                CheckoutError::CurrencyMismatch { subject, reason }
            }
            MoneyError::InvalidValue | MoneyError::Overflow | MoneyError::Malformed(_) => {
                CheckoutError::InvalidAmount { subject, reason }
            }
        }
    }

    /// `false` for the failures that happen after the order went through.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CheckoutError::NotificationFailed { .. } | CheckoutError::CartClearFailed { .. }
        )
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            CheckoutError::InvalidAmount { subject, .. }
            | CheckoutError::CurrencyMismatch { subject, .. }
            | CheckoutError::UnsupportedCurrency { subject, .. }
            | CheckoutError::ConversionFailed { subject, .. }
            | CheckoutError::NotFound { subject, .. }
            | CheckoutError::CatalogUnavailable { subject, .. }
            | CheckoutError::CartUnavailable { subject, .. }
            | CheckoutError::QuoteFailed { subject, .. }
            | CheckoutError::PaymentDeclined { subject, .. }
            | CheckoutError::InvalidCard { subject, .. }
            | CheckoutError::ShippingFailed { subject, .. }
            | CheckoutError::NotificationFailed { subject, .. }
            | CheckoutError::CartClearFailed { subject, .. } => Some(subject),
            CheckoutError::Cancelled { .. } => None,
        }
    }
}
