//! Shipping quotes and dispatch.

use crate::framework::{FrameworkError, Service};
use crate::model::{Address, CartLine};
use crate::money::Money;
use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShippingError {
    #[error("Cannot ship to address: {0}")]
    InvalidAddress(String),

    #[error("Shipping transport error: {0}")]
    Transport(#[from] FrameworkError),
}

#[derive(Debug, Clone)]
pub enum ShippingRequest {
    GetQuote {
        address: Address,
        items: Vec<CartLine>,
    },
    ShipOrder {
        address: Address,
        items: Vec<CartLine>,
    },
}

#[derive(Debug, Clone)]
pub enum ShippingResponse {
    Quote(Money),
    Shipped { tracking_id: String },
}

/// Quotes a flat rate in USD for any cart and hands out tracking ids.
#[derive(Debug, Clone)]
pub struct ShippingService {
    flat_rate: Money,
}

impl ShippingService {
    pub fn new(flat_rate: Money) -> Self {
        Self { flat_rate }
    }

    pub fn flat_rate(&self) -> &Money {
        &self.flat_rate
    }
}

impl Default for ShippingService {
    fn default() -> Self {
        Self::new(Money::new("USD", 8, 990_000_000))
    }
}

/// Builds a tracking id of the form `XY-<n><3 digits>-<n/2><7 digits>`,
/// where `n` is the length of `salt` and `X`, `Y` are letters `A`..=`Y`.
pub fn tracking_id<R: Rng>(rng: &mut R, salt: &str) -> String {
    let mut letter = || char::from(b'A' + rng.gen_range(0..25u8));
    let prefix: String = [letter(), letter()].iter().collect();
    let mut digits = |count: usize| -> String {
        (0..count)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    };
    let short = digits(3);
    let long = digits(7);
    format!(
        "{prefix}-{}{short}-{}{long}",
        salt.len(),
        salt.len() / 2
    )
}

#[async_trait]
impl Service for ShippingService {
    type Request = ShippingRequest;
    type Response = ShippingResponse;
    type Error = ShippingError;

    async fn handle(
        &mut self,
        request: ShippingRequest,
    ) -> Result<ShippingResponse, ShippingError> {
        match request {
            ShippingRequest::GetQuote { .. } => Ok(ShippingResponse::Quote(self.flat_rate.clone())),
            ShippingRequest::ShipOrder { address, items } => {
                if address.street_address.trim().is_empty() || address.country.trim().is_empty() {
                    return Err(ShippingError::InvalidAddress(format!(
                        "{}, {}",
                        address.street_address, address.country
                    )));
                }
                let salt = format!(
                    "{}, {}, {}",
                    address.street_address, address.city, address.state
                );
                let tracking_id = tracking_id(&mut rand::thread_rng(), &salt);
                info!(%tracking_id, lines = items.len(), "Shipment dispatched");
                Ok(ShippingResponse::Shipped { tracking_id })
            }
        }
    }
}
