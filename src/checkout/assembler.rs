//! Builds the priced contents of an order from a user's cart.

use crate::checkout::cancel::guard;
use crate::checkout::observer::Progress;
use crate::checkout::{CancelSignal, CheckoutError, CheckoutStage, PricingStep};
use crate::clients::{CartClient, CatalogClient, ShippingClient};
use crate::model::{Address, CartLine, OrderItem};
use crate::money::Money;
use crate::services::CatalogError;
use tracing::debug;

/// Everything the saga needs to total and charge an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPrep {
    pub order_items: Vec<OrderItem>,
    pub cart_items: Vec<CartLine>,
    /// Already converted into the order currency.
    pub shipping_cost: Money,
}

#[derive(Clone)]
pub struct OrderAssembler {
    cart: CartClient,
    catalog: CatalogClient,
    shipping: ShippingClient,
    pricing: PricingStep,
}

impl OrderAssembler {
    pub fn new(
        cart: CartClient,
        catalog: CatalogClient,
        shipping: ShippingClient,
        pricing: PricingStep,
    ) -> Self {
        Self {
            cart,
            catalog,
            shipping,
            pricing,
        }
    }

    /// Fetches the cart, prices each line in `target_currency` and quotes
    /// shipping, one call at a time.
    ///
    /// Advances `progress` to `CartFetched`, then to `Priced` once the
    /// shipping cost is converted. An empty cart yields no items but is still
    /// quoted.
    pub async fn assemble(
        &self,
        user_id: &str,
        target_currency: &str,
        address: &Address,
        cancel: &CancelSignal,
        progress: &mut Progress,
    ) -> Result<OrderPrep, CheckoutError> {
        let cart_items = guard(progress.stage(), cancel, async {
            self.cart
                .get_cart(user_id)
                .await
                .map_err(|e| CheckoutError::CartUnavailable {
                    subject: user_id.to_string(),
                    reason: e.to_string(),
                })
        })
        .await?;
        debug!(lines = cart_items.len(), "Cart fetched");
        progress.advance(CheckoutStage::CartFetched);

        let mut order_items = Vec::with_capacity(cart_items.len());
        for line in &cart_items {
            let cost = guard(
                progress.stage(),
                cancel,
                self.price_line(line, target_currency),
            )
            .await?;
            order_items.push(OrderItem {
                item: line.clone(),
                cost,
            });
        }

        let quote = guard(progress.stage(), cancel, async {
            self.shipping
                .get_quote(address, &cart_items)
                .await
                .map_err(|e| CheckoutError::QuoteFailed {
                    subject: user_id.to_string(),
                    reason: e.to_string(),
                })
        })
        .await?;
        let shipping_cost = guard(
            progress.stage(),
            cancel,
            self.pricing.convert(&quote, target_currency, "shipping"),
        )
        .await?;
        progress.advance(CheckoutStage::Priced);

        Ok(OrderPrep {
            order_items,
            cart_items,
            shipping_cost,
        })
    }

    async fn price_line(
        &self,
        line: &CartLine,
        target_currency: &str,
    ) -> Result<Money, CheckoutError> {
        let product_id = line.product_id.as_str();
        let product = self.catalog.get_product(product_id).await.map_err(|e| {
            let subject = product_id.to_string();
            let reason = e.to_string();
            match e {
                CatalogError::NotFound(_) => CheckoutError::NotFound { subject, reason },
                _ => CheckoutError::CatalogUnavailable { subject, reason },
            }
        })?;
        self.pricing
            .convert(&product.price_usd, target_currency, product_id)
            .await
    }
}
