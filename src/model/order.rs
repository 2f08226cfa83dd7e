use crate::model::{Address, CartLine, CreditCardInfo};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A cart line priced in the order's currency. `cost` is per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub item: CartLine,
    pub cost: Money,
}

/// The outcome of a successful checkout.
///
/// Returned to the caller and handed to the email notifier; never persisted
/// by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub order_id: String,
    pub shipping_tracking_id: String,
    pub shipping_cost: Money,
    pub shipping_address: Address,
    pub items: Vec<OrderItem>,
}

/// Everything the caller supplies to place an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: String,
    pub user_currency: String,
    pub address: Address,
    pub email: String,
    pub credit_card: CreditCardInfo,
}
