//! # Catalog Client
use crate::clients::CollaboratorClient;
use crate::framework::ServiceClient;
use crate::model::Product;
use crate::services::{CatalogError, CatalogRequest, CatalogResponse, ProductCatalog};
use async_trait::async_trait;
use tracing::instrument;

#[derive(Clone)]
pub struct CatalogClient {
    inner: ServiceClient<ProductCatalog>,
}

impl CatalogClient {
    pub fn new(inner: ServiceClient<ProductCatalog>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CollaboratorClient<ProductCatalog> for CatalogClient {
    fn inner(&self) -> &ServiceClient<ProductCatalog> {
        &self.inner
    }
}

impl CatalogClient {
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> Result<Product, CatalogError> {
        match self
            .send(CatalogRequest::GetProduct { id: id.to_string() })
            .await?
        {
            CatalogResponse::Product(product) => Ok(product),
            other => Err(Self::unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        match self.send(CatalogRequest::ListProducts).await? {
            CatalogResponse::Products(products) => Ok(products),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Products whose name or description contains `query`, ignoring case.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        match self
            .send(CatalogRequest::SearchProducts {
                query: query.to_string(),
            })
            .await?
        {
            CatalogResponse::Products(products) => Ok(products),
            other => Err(Self::unexpected(other)),
        }
    }
}
