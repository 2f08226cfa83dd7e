//! Read-only product catalog.

use crate::framework::{FrameworkError, Service};
use crate::model::Product;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// The catalog bundled with the crate.
pub const DEFAULT_CATALOG_JSON: &str = include_str!("../../data/products.json");

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("No product with ID {0}")]
    NotFound(String),

    /// The catalog data could not be loaded.
    #[error("Invalid catalog data: {0}")]
    InvalidCatalog(String),

    #[error("Catalog transport error: {0}")]
    Transport(#[from] FrameworkError),
}

#[derive(Debug, Clone)]
pub enum CatalogRequest {
    GetProduct { id: String },
    ListProducts,
    SearchProducts { query: String },
}

#[derive(Debug, Clone)]
pub enum CatalogResponse {
    Product(Product),
    Products(Vec<Product>),
}

#[derive(Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Loads a catalog from `{"products": [...]}`.
    ///
    /// Every price must be a valid USD amount, since the checkout saga
    /// converts catalog prices from dollars.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| CatalogError::InvalidCatalog(e.to_string()))?;
        if let Some(bad) = file
            .products
            .iter()
            .find(|p| !p.price_usd.is_valid() || p.price_usd.currency_code != "USD")
        {
            return Err(CatalogError::InvalidCatalog(format!(
                "product {} has price {:?}",
                bad.id, bad.price_usd
            )));
        }
        Ok(Self::new(file.products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn search(&self, query: &str) -> Vec<Product> {
        let query = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Service for ProductCatalog {
    type Request = CatalogRequest;
    type Response = CatalogResponse;
    type Error = CatalogError;

    async fn handle(&mut self, request: CatalogRequest) -> Result<CatalogResponse, CatalogError> {
        match request {
            CatalogRequest::GetProduct { id } => self
                .products
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .map(CatalogResponse::Product)
                .ok_or(CatalogError::NotFound(id)),
            CatalogRequest::ListProducts => Ok(CatalogResponse::Products(self.products.clone())),
            CatalogRequest::SearchProducts { query } => {
                Ok(CatalogResponse::Products(self.search(&query)))
            }
        }
    }
}
