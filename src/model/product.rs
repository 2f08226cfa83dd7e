use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Represents a product in the catalog.
///
/// The JSON shape matches the catalog data file: camelCase keys, with the
/// price stored as a [`Money`] object in US dollars under `priceUsd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub picture: String,
    pub price_usd: Money,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Catalog identifier
    /// * `name` - Display name
    /// * `price_usd` - Unit price; expected to be in `USD`
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_usd: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            picture: String::new(),
            price_usd,
            categories: Vec::new(),
        }
    }
}
