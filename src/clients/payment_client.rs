//! # Payment Client
use crate::clients::CollaboratorClient;
use crate::framework::ServiceClient;
use crate::model::CreditCardInfo;
use crate::money::Money;
use crate::services::{PaymentError, PaymentGateway, PaymentRequest, PaymentResponse};
use async_trait::async_trait;
use tracing::instrument;

#[derive(Clone)]
pub struct PaymentClient {
    inner: ServiceClient<PaymentGateway>,
}

impl PaymentClient {
    pub fn new(inner: ServiceClient<PaymentGateway>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CollaboratorClient<PaymentGateway> for PaymentClient {
    fn inner(&self) -> &ServiceClient<PaymentGateway> {
        &self.inner
    }
}

impl PaymentClient {
    /// Charges `amount` to the card and returns the transaction id.
    #[instrument(skip(self, amount, credit_card), fields(%amount))]
    pub async fn charge(
        &self,
        amount: &Money,
        credit_card: &CreditCardInfo,
    ) -> Result<String, PaymentError> {
        match self
            .send(PaymentRequest::Charge {
                amount: amount.clone(),
                credit_card: credit_card.clone(),
            })
            .await?
        {
            PaymentResponse::Charged { transaction_id } => Ok(transaction_id),
        }
    }
}
