use serde::{Deserialize, Serialize};
use std::fmt;

/// Shipping destination. Forwarded untouched to the shipping collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: i32,
}

/// Card details. Forwarded untouched to the payment collaborator.
///
/// `Debug` masks the card number and CVV, since requests are logged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardInfo {
    pub credit_card_number: String,
    pub credit_card_cvv: i32,
    pub credit_card_expiration_year: i32,
    pub credit_card_expiration_month: i32,
}

impl CreditCardInfo {
    /// The last four digits, or fewer when the number is shorter.
    pub fn last_four(&self) -> &str {
        let number = self.credit_card_number.as_str();
        let start = number.len().saturating_sub(4);
        number.get(start..).unwrap_or("")
    }
}

impl fmt::Debug for CreditCardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCardInfo")
            .field("credit_card_number", &format!("****{}", self.last_four()))
            .field("credit_card_cvv", &"***")
            .field("credit_card_expiration_year", &self.credit_card_expiration_year)
            .field("credit_card_expiration_month", &self.credit_card_expiration_month)
            .finish()
    }
}
