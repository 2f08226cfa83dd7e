//! Card payment gateway.
//!
//! Validates the card and hands back a transaction id. No money moves; the
//! gateway only decides whether a charge would be accepted.

use crate::framework::{FrameworkError, Service};
use crate::model::CreditCardInfo;
use crate::money::Money;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Credit card info is invalid: {0}")]
    InvalidCard(String),

    /// Only VISA and MasterCard are accepted.
    #[error("Sorry, we cannot process {0} credit cards")]
    UnacceptedCard(String),

    #[error("Your credit card (ending {last_four}) expired on {month}/{year}")]
    ExpiredCard {
        last_four: String,
        month: i32,
        year: i32,
    },

    #[error("Invalid charge amount: {0}")]
    InvalidAmount(String),

    #[error("Payment transport error: {0}")]
    Transport(#[from] FrameworkError),
}

#[derive(Debug, Clone)]
pub enum PaymentRequest {
    Charge {
        amount: Money,
        credit_card: CreditCardInfo,
    },
}

#[derive(Debug, Clone)]
pub enum PaymentResponse {
    Charged { transaction_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Visa,
    MasterCard,
    Other,
}

impl CardKind {
    fn detect(number: &str) -> Self {
        let prefix = |n: usize| number.get(..n).and_then(|p| p.parse::<u32>().ok());
        if number.starts_with('4') {
            CardKind::Visa
        } else if matches!(prefix(2), Some(51..=55)) || matches!(prefix(4), Some(2221..=2720)) {
            CardKind::MasterCard
        } else {
            CardKind::Other
        }
    }
}

/// Luhn checksum over an all-digit string.
fn luhn_valid(number: &str) -> bool {
    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

#[derive(Debug, Clone, Default)]
pub struct PaymentGateway {
    /// Date used for expiry checks; `None` means today (UTC).
    today: Option<NaiveDate>,
}

impl PaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that checks expiry against a fixed date.
    pub fn with_reference_date(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    fn validate(&self, card: &CreditCardInfo) -> Result<CardKind, PaymentError> {
        // Spaces and dashes are accepted as group separators
        let number: String = card
            .credit_card_number
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect();
        let number = number.as_str();
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PaymentError::InvalidCard("number must be digits".into()));
        }
        if !(12..=19).contains(&number.len()) || !luhn_valid(number) {
            return Err(PaymentError::InvalidCard(format!(
                "number ending {} failed validation",
                card.last_four()
            )));
        }
        if !(100..=9999).contains(&card.credit_card_cvv) {
            return Err(PaymentError::InvalidCard("bad cvv".into()));
        }
        let month = card.credit_card_expiration_month;
        if !(1..=12).contains(&month) {
            return Err(PaymentError::InvalidCard(format!("bad expiration month {month}")));
        }

        let kind = CardKind::detect(number);
        if kind == CardKind::Other {
            return Err(PaymentError::UnacceptedCard(format!(
                "card ending {}",
                card.last_four()
            )));
        }

        let year = card.credit_card_expiration_year;
        if !(1..=9999).contains(&year) {
            return Err(PaymentError::InvalidCard(format!("bad expiration year {year}")));
        }

        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        let now = i64::from(today.year()) * 12 + i64::from(today.month());
        let expires = i64::from(year) * 12 + i64::from(month);
        if now > expires {
            return Err(PaymentError::ExpiredCard {
                last_four: card.last_four().to_string(),
                month,
                year,
            });
        }
        Ok(kind)
    }
}

#[async_trait]
impl Service for PaymentGateway {
    type Request = PaymentRequest;
    type Response = PaymentResponse;
    type Error = PaymentError;

    async fn handle(&mut self, request: PaymentRequest) -> Result<PaymentResponse, PaymentError> {
        let PaymentRequest::Charge {
            amount,
            credit_card,
        } = request;

        if !amount.is_valid() || amount.is_negative() {
            return Err(PaymentError::InvalidAmount(amount.to_string()));
        }
        let kind = self.validate(&credit_card)?;

        let transaction_id = Uuid::new_v4().to_string();
        info!(
            %amount,
            card = ?kind,
            last_four = credit_card.last_four(),
            %transaction_id,
            "Transaction processed"
        );
        Ok(PaymentResponse::Charged { transaction_id })
    }
}
