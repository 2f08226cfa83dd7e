//! In-memory cart store.
//!
//! Carts are keyed by user id. Lines keep the order in which products were
//! first added; adding a product that is already in the cart accumulates its
//! quantity.

use crate::framework::{FrameworkError, Service};
use crate::model::CartLine;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// Quantities must be strictly positive.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: String, quantity: i32 },

    /// Adding would overflow the stored quantity.
    #[error("Quantity overflow for product {0}")]
    QuantityOverflow(String),

    /// An error occurred while communicating with the cart actor.
    #[error("Cart transport error: {0}")]
    Transport(#[from] FrameworkError),
}

#[derive(Debug, Clone)]
pub enum CartRequest {
    AddItem { user_id: String, item: CartLine },
    GetCart { user_id: String },
    EmptyCart { user_id: String },
}

#[derive(Debug, Clone)]
pub enum CartResponse {
    Added,
    Cart(Vec<CartLine>),
    Emptied,
}

#[derive(Debug, Default)]
pub struct CartStore {
    carts: HashMap<String, Vec<CartLine>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_item(&mut self, user_id: String, item: CartLine) -> Result<(), CartError> {
        if item.quantity <= 0 {
            return Err(CartError::InvalidQuantity {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }
        let lines = self.carts.entry(user_id).or_default();
        match lines.iter_mut().find(|l| l.product_id == item.product_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CartError::QuantityOverflow(item.product_id))?;
            }
            None => lines.push(item),
        }
        Ok(())
    }
}

#[async_trait]
impl Service for CartStore {
    type Request = CartRequest;
    type Response = CartResponse;
    type Error = CartError;

    async fn handle(&mut self, request: CartRequest) -> Result<CartResponse, CartError> {
        match request {
            CartRequest::AddItem { user_id, item } => {
                self.add_item(user_id, item)?;
                Ok(CartResponse::Added)
            }
            CartRequest::GetCart { user_id } => Ok(CartResponse::Cart(
                self.carts.get(&user_id).cloned().unwrap_or_default(),
            )),
            CartRequest::EmptyCart { user_id } => {
                self.carts.remove(&user_id);
                Ok(CartResponse::Emptied)
            }
        }
    }
}
