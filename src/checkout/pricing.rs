//! Conversion of catalog prices and shipping quotes into the order currency.

use crate::checkout::CheckoutError;
use crate::clients::CurrencyClient;
use crate::money::Money;
use crate::services::CurrencyError;

#[derive(Clone)]
pub struct PricingStep {
    currency: CurrencyClient,
}

impl PricingStep {
    pub fn new(currency: CurrencyClient) -> Self {
        Self { currency }
    }

    /// Converts `amount` into `target_currency`.
    ///
    /// `subject` names what is being priced (a product id, or `"shipping"`)
    /// and ends up in the error. The converter's answer is checked: it must
    /// be a valid amount in the requested currency.
    pub async fn convert(
        &self,
        amount: &Money,
        target_currency: &str,
        subject: &str,
    ) -> Result<Money, CheckoutError> {
        let converted = self
            .currency
            .convert(amount, target_currency)
            .await
            .map_err(|e| {
                let subject = subject.to_string();
                let reason = e.to_string();
                match e {
                    CurrencyError::Unsupported(_) => {
                        CheckoutError::UnsupportedCurrency { subject, reason }
                    }
                    CurrencyError::InvalidAmount(_) => {
                        CheckoutError::InvalidAmount { subject, reason }
                    }
                    _ => CheckoutError::ConversionFailed { subject, reason },
                }
            })?;

        if !converted.is_valid() || converted.currency_code != target_currency {
            return Err(CheckoutError::ConversionFailed {
                subject: subject.to_string(),
                reason: format!("converter answered {converted:?} for {target_currency}"),
            });
        }
        Ok(converted)
    }
}
