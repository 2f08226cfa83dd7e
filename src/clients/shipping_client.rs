//! # Shipping Client
use crate::clients::CollaboratorClient;
use crate::framework::ServiceClient;
use crate::model::{Address, CartLine};
use crate::money::Money;
use crate::services::{ShippingError, ShippingRequest, ShippingResponse, ShippingService};
use async_trait::async_trait;
use tracing::instrument;

#[derive(Clone)]
pub struct ShippingClient {
    inner: ServiceClient<ShippingService>,
}

impl ShippingClient {
    pub fn new(inner: ServiceClient<ShippingService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CollaboratorClient<ShippingService> for ShippingClient {
    fn inner(&self) -> &ServiceClient<ShippingService> {
        &self.inner
    }
}

impl ShippingClient {
    /// Shipping cost for `items`, in USD.
    #[instrument(skip(self, address, items), fields(lines = items.len()))]
    pub async fn get_quote(
        &self,
        address: &Address,
        items: &[CartLine],
    ) -> Result<Money, ShippingError> {
        match self
            .send(ShippingRequest::GetQuote {
                address: address.clone(),
                items: items.to_vec(),
            })
            .await?
        {
            ShippingResponse::Quote(cost) => Ok(cost),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Dispatches the items and returns the tracking id.
    #[instrument(skip(self, address, items), fields(lines = items.len()))]
    pub async fn ship_order(
        &self,
        address: &Address,
        items: &[CartLine],
    ) -> Result<String, ShippingError> {
        match self
            .send(ShippingRequest::ShipOrder {
                address: address.clone(),
                items: items.to_vec(),
            })
            .await?
        {
            ShippingResponse::Shipped { tracking_id } => Ok(tracking_id),
            other => Err(Self::unexpected(other)),
        }
    }
}
