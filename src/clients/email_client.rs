//! # Email Client
use crate::clients::CollaboratorClient;
use crate::framework::ServiceClient;
use crate::model::OrderResult;
use crate::services::{EmailError, EmailNotifier, EmailRequest, EmailResponse};
use async_trait::async_trait;
use tracing::instrument;

#[derive(Clone)]
pub struct EmailClient {
    inner: ServiceClient<EmailNotifier>,
}

impl EmailClient {
    pub fn new(inner: ServiceClient<EmailNotifier>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CollaboratorClient<EmailNotifier> for EmailClient {
    fn inner(&self) -> &ServiceClient<EmailNotifier> {
        &self.inner
    }
}

impl EmailClient {
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn send_order_confirmation(
        &self,
        email: &str,
        order: &OrderResult,
    ) -> Result<(), EmailError> {
        match self
            .send(EmailRequest::SendOrderConfirmation {
                email: email.to_string(),
                order: order.clone(),
            })
            .await?
        {
            EmailResponse::Sent => Ok(()),
        }
    }
}
