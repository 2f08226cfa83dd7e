//! Order confirmation notifier. Writes the confirmation to the log instead of
//! sending mail.

use crate::framework::{FrameworkError, Service};
use crate::model::OrderResult;
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmailError {
    #[error("Invalid recipient: {0:?}")]
    InvalidRecipient(String),

    #[error("Email transport error: {0}")]
    Transport(#[from] FrameworkError),
}

#[derive(Debug, Clone)]
pub enum EmailRequest {
    SendOrderConfirmation { email: String, order: OrderResult },
}

#[derive(Debug, Clone)]
pub enum EmailResponse {
    Sent,
}

#[derive(Debug, Default)]
pub struct EmailNotifier {
    sent: u64,
}

impl EmailNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

#[async_trait]
impl Service for EmailNotifier {
    type Request = EmailRequest;
    type Response = EmailResponse;
    type Error = EmailError;

    async fn handle(&mut self, request: EmailRequest) -> Result<EmailResponse, EmailError> {
        let EmailRequest::SendOrderConfirmation { email, order } = request;
        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| EmailError::InvalidRecipient(email.clone()))?;
        if local.is_empty() || domain.is_empty() {
            return Err(EmailError::InvalidRecipient(email));
        }

        self.sent += 1;
        info!(
            %email,
            order_id = %order.order_id,
            tracking_id = %order.shipping_tracking_id,
            items = order.items.len(),
            "Order confirmation sent"
        );
        Ok(EmailResponse::Sent)
    }
}
