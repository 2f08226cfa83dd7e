//! # Checkout Saga
//!
//! `place_order` turns a user's cart into a paid, shipped order by calling
//! the collaborators strictly in sequence:
//!
//! ```text
//! Start -> CartFetched -> Priced -> Totaled -> Charged -> Shipped
//!       -> CartCleared -> Notified -> Done
//! ```
//!
//! Any failure up to and including the charge aborts the checkout. The charge
//! and the shipment are not interrupted once sent; cancellation is honoured
//! before each of them. From `Charged` on, the customer has paid: a shipping
//! failure or cancellation before shipping still aborts, but nothing is
//! refunded. Once shipped, the order is returned no matter what. Failing (or
//! being cancelled) while emptying the cart or sending the confirmation is
//! reported to the observer and the stage is skipped.

use crate::checkout::assembler::OrderAssembler;
use crate::checkout::cancel::{checkpoint, guard};
use crate::checkout::observer::{CheckoutObserver, Progress};
use crate::checkout::{CancelSignal, CheckoutError, PricingStep};
use crate::clients::{
    CartClient, CatalogClient, CurrencyClient, EmailClient, PaymentClient, ShippingClient,
};
use crate::model::{OrderItem, OrderResult, PlaceOrderRequest};
use crate::money::Money;
use crate::services::PaymentError;
use std::sync::Arc;
use tracing::{info, instrument, Span};
use uuid::Uuid;

/// The states a checkout moves through. Never goes backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckoutStage {
    Start,
    CartFetched,
    Priced,
    Totaled,
    Charged,
    Shipped,
    CartCleared,
    Notified,
    Done,
}

/// Client handles for every collaborator of the saga.
#[derive(Clone)]
pub struct Collaborators {
    pub cart: CartClient,
    pub catalog: CatalogClient,
    pub currency: CurrencyClient,
    pub shipping: ShippingClient,
    pub payment: PaymentClient,
    pub email: EmailClient,
}

/// The checkout orchestrator.
///
/// Holds only client handles and the observer. Clones share nothing mutable,
/// so concurrent checkouts can run on separate tasks.
#[derive(Clone)]
pub struct CheckoutService {
    assembler: OrderAssembler,
    cart: CartClient,
    shipping: ShippingClient,
    payment: PaymentClient,
    email: EmailClient,
    observer: Arc<dyn CheckoutObserver>,
}

impl CheckoutService {
    pub fn new(collaborators: Collaborators, observer: Arc<dyn CheckoutObserver>) -> Self {
        let Collaborators {
            cart,
            catalog,
            currency,
            shipping,
            payment,
            email,
        } = collaborators;
        let assembler = OrderAssembler::new(
            cart.clone(),
            catalog,
            shipping.clone(),
            PricingStep::new(currency),
        );
        Self {
            assembler,
            cart,
            shipping,
            payment,
            email,
            observer,
        }
    }

    pub async fn place_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<OrderResult, CheckoutError> {
        self.place_order_with_cancel(request, &CancelSignal::never()).await
    }

    #[instrument(
        name = "place_order",
        skip(self, request, cancel),
        fields(
            user_id = %request.user_id,
            currency = %request.user_currency,
            order_id = tracing::field::Empty
        )
    )]
    pub async fn place_order_with_cancel(
        &self,
        request: PlaceOrderRequest,
        cancel: &CancelSignal,
    ) -> Result<OrderResult, CheckoutError> {
        let order_id = Uuid::new_v4().to_string();
        Span::current().record("order_id", order_id.as_str());
        info!("Placing order");

        let mut progress = Progress::start(self.observer.clone(), order_id.as_str());
        let result = self.run(&request, order_id, cancel, &mut progress).await;
        match &result {
            Ok(order) => info!(
                tracking_id = %order.shipping_tracking_id,
                items = order.items.len(),
                "Order placed"
            ),
            Err(e) => progress.fail(e),
        }
        result
    }

    async fn run(
        &self,
        request: &PlaceOrderRequest,
        order_id: String,
        cancel: &CancelSignal,
        progress: &mut Progress,
    ) -> Result<OrderResult, CheckoutError> {
        let user_id = request.user_id.as_str();
        let currency = request.user_currency.as_str();

        let prep = self
            .assembler
            .assemble(user_id, currency, &request.address, cancel, progress)
            .await?;

        let total = compute_total(currency, &prep.shipping_cost, &prep.order_items)?;
        progress.advance(CheckoutStage::Totaled);

        // Charge and shipment are not raced against cancellation once sent
        checkpoint(progress.stage(), cancel)?;
        let transaction_id = self
            .payment
            .charge(&total, &request.credit_card)
            .await
            .map_err(|e| charge_error(user_id, e))?;
        info!(%transaction_id, %total, "Payment went through");
        progress.advance(CheckoutStage::Charged);

        checkpoint(progress.stage(), cancel)?;
        let shipping_tracking_id = self
            .shipping
            .ship_order(&request.address, &prep.cart_items)
            .await
            .map_err(|e| CheckoutError::ShippingFailed {
                subject: user_id.to_string(),
                reason: e.to_string(),
            })?;
        progress.advance(CheckoutStage::Shipped);

        // The order now exists. Nothing from here on changes the outcome.
        let cleared = guard(progress.stage(), cancel, async {
            self.cart
                .empty_cart(user_id)
                .await
                .map_err(|e| CheckoutError::CartClearFailed {
                    subject: user_id.to_string(),
                    reason: e.to_string(),
                })
        })
        .await;
        if recorded(cleared, progress) {
            progress.advance(CheckoutStage::CartCleared);
        }

        let order = OrderResult {
            order_id,
            shipping_tracking_id,
            shipping_cost: prep.shipping_cost,
            shipping_address: request.address.clone(),
            items: prep.order_items,
        };

        let notified = guard(progress.stage(), cancel, async {
            self.email
                .send_order_confirmation(&request.email, &order)
                .await
                .map_err(|e| CheckoutError::NotificationFailed {
                    subject: request.email.clone(),
                    reason: e.to_string(),
                })
        })
        .await;
        if recorded(notified, progress) {
            progress.advance(CheckoutStage::Notified);
        }

        progress.advance(CheckoutStage::Done);
        Ok(order)
    }
}

/// Reports a failed post-shipment step to the observer instead of failing the
/// order. Returns whether the step succeeded.
fn recorded(outcome: Result<(), CheckoutError>, progress: &Progress) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            progress.fail(&e);
            false
        }
    }
}

fn charge_error(user_id: &str, error: PaymentError) -> CheckoutError {
    let subject = user_id.to_string();
    let reason = error.to_string();
    match error {
        PaymentError::InvalidCard(_)
        | PaymentError::UnacceptedCard(_)
        | PaymentError::ExpiredCard { .. } => CheckoutError::InvalidCard { subject, reason },
        PaymentError::InvalidAmount(_) => CheckoutError::InvalidAmount { subject, reason },
        PaymentError::Transport(_) => CheckoutError::PaymentDeclined { subject, reason },
    }
}

/// Shipping cost plus, for every item, its unit cost times its quantity.
///
/// Starts from zero in `currency`, so an amount in any other currency fails
/// with `CurrencyMismatch`. A negative quantity fails with `InvalidAmount`.
pub fn compute_total(
    currency: &str,
    shipping_cost: &Money,
    items: &[OrderItem],
) -> Result<Money, CheckoutError> {
    let mut total = Money::zero(currency)
        .add(shipping_cost)
        .map_err(|e| CheckoutError::from_money("shipping", e))?;

    for item in items {
        let product_id = item.item.product_id.as_str();
        let count = u32::try_from(item.item.quantity).map_err(|_| CheckoutError::InvalidAmount {
            subject: product_id.to_string(),
            reason: format!("negative quantity {}", item.item.quantity),
        })?;
        let line_total = item
            .cost
            .multiply_by_count(count)
            .map_err(|e| CheckoutError::from_money(product_id, e))?;
        total = total
            .add(&line_total)
            .map_err(|e| CheckoutError::from_money(product_id, e))?;
    }
    Ok(total)
}
