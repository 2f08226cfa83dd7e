//! # Cart Client
//!
//! High-level API over the `CartStore` service.
use crate::clients::CollaboratorClient;
use crate::framework::ServiceClient;
use crate::model::CartLine;
use crate::services::{CartError, CartRequest, CartResponse, CartStore};
use async_trait::async_trait;
use tracing::instrument;

#[derive(Clone)]
pub struct CartClient {
    inner: ServiceClient<CartStore>,
}

impl CartClient {
    pub fn new(inner: ServiceClient<CartStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CollaboratorClient<CartStore> for CartClient {
    fn inner(&self) -> &ServiceClient<CartStore> {
        &self.inner
    }
}

impl CartClient {
    #[instrument(skip(self))]
    pub async fn add_item(&self, user_id: &str, item: CartLine) -> Result<(), CartError> {
        match self
            .send(CartRequest::AddItem {
                user_id: user_id.to_string(),
                item,
            })
            .await?
        {
            CartResponse::Added => Ok(()),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Lines of the user's cart. An unknown user has an empty cart.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: &str) -> Result<Vec<CartLine>, CartError> {
        match self
            .send(CartRequest::GetCart {
                user_id: user_id.to_string(),
            })
            .await?
        {
            CartResponse::Cart(lines) => Ok(lines),
            other => Err(Self::unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn empty_cart(&self, user_id: &str) -> Result<(), CartError> {
        match self
            .send(CartRequest::EmptyCart {
                user_id: user_id.to_string(),
            })
            .await?
        {
            CartResponse::Emptied => Ok(()),
            other => Err(Self::unexpected(other)),
        }
    }
}
