//! # Currency Client
use crate::clients::CollaboratorClient;
use crate::framework::ServiceClient;
use crate::money::Money;
use crate::services::{CurrencyConverter, CurrencyError, CurrencyRequest, CurrencyResponse};
use async_trait::async_trait;
use tracing::instrument;

#[derive(Clone)]
pub struct CurrencyClient {
    inner: ServiceClient<CurrencyConverter>,
}

impl CurrencyClient {
    pub fn new(inner: ServiceClient<CurrencyConverter>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CollaboratorClient<CurrencyConverter> for CurrencyClient {
    fn inner(&self) -> &ServiceClient<CurrencyConverter> {
        &self.inner
    }
}

impl CurrencyClient {
    #[instrument(skip(self))]
    pub async fn convert(&self, from: &Money, to_code: &str) -> Result<Money, CurrencyError> {
        match self
            .send(CurrencyRequest::Convert {
                from: from.clone(),
                to_code: to_code.to_string(),
            })
            .await?
        {
            CurrencyResponse::Converted(money) => Ok(money),
            other => Err(Self::unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn supported_currencies(&self) -> Result<Vec<String>, CurrencyError> {
        match self.send(CurrencyRequest::GetSupportedCurrencies).await? {
            CurrencyResponse::Currencies(codes) => Ok(codes),
            other => Err(Self::unexpected(other)),
        }
    }
}
