use crate::checkout::{CheckoutObserver, CheckoutService, Collaborators, TracingObserver};
use crate::clients::{
    CartClient, CatalogClient, CurrencyClient, EmailClient, PaymentClient, ShippingClient,
};
use crate::framework::{Service, ServiceActor, ServiceClient};
use crate::lifecycle::CheckoutConfig;
use crate::services::{
    catalog::DEFAULT_CATALOG_JSON, currency::DEFAULT_RATES_JSON, CartStore, CatalogError,
    CurrencyConverter, CurrencyError, EmailNotifier, PaymentGateway, ProductCatalog,
    ShippingService,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

/// All collaborators running as service actors, wired into a
/// [`CheckoutService`].
///
/// # Example
///
/// ```ignore
/// let system = CheckoutSystem::new(&CheckoutConfig::default())?;
/// system.cart.add_item("user_1", CartLine::new("OLJCESPC7Z", 2)).await?;
/// let order = system.checkout.place_order(request).await?;
/// system.shutdown().await?;
/// ```
pub struct CheckoutSystem {
    pub checkout: CheckoutService,

    pub cart: CartClient,
    pub catalog: CatalogClient,
    pub currency: CurrencyClient,
    pub shipping: ShippingClient,
    pub payment: PaymentClient,
    pub email: EmailClient,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CheckoutSystem {
    /// Starts every service actor with a [`TracingObserver`] on the saga.
    /// Must be called inside a Tokio runtime.
    pub fn new(config: &CheckoutConfig) -> Result<Self, StartupError> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    pub fn with_observer(
        config: &CheckoutConfig,
        observer: Arc<dyn CheckoutObserver>,
    ) -> Result<Self, StartupError> {
        // Load data first so a bad file fails before anything is spawned
        let catalog_service = match &config.catalog_path {
            Some(path) => ProductCatalog::from_json(&read(path)?)?,
            None => ProductCatalog::from_json(DEFAULT_CATALOG_JSON)?,
        };
        let currency_service = match &config.currency_rates_path {
            Some(path) => CurrencyConverter::from_json(&read(path)?)?,
            None => CurrencyConverter::from_json(DEFAULT_RATES_JSON)?,
        };

        let mut handles = Vec::new();
        let cart = CartClient::new(spawn(CartStore::new(), config, &mut handles));
        let catalog = CatalogClient::new(spawn(catalog_service, config, &mut handles));
        let currency = CurrencyClient::new(spawn(currency_service, config, &mut handles));
        let shipping = ShippingClient::new(spawn(
            ShippingService::new(config.shipping_rate.clone()),
            config,
            &mut handles,
        ));
        let payment = PaymentClient::new(spawn(PaymentGateway::new(), config, &mut handles));
        let email = EmailClient::new(spawn(EmailNotifier::new(), config, &mut handles));

        let checkout = CheckoutService::new(
            Collaborators {
                cart: cart.clone(),
                catalog: catalog.clone(),
                currency: currency.clone(),
                shipping: shipping.clone(),
                payment: payment.clone(),
                email: email.clone(),
            },
            observer,
        );
        info!(actors = handles.len(), "Checkout system started");

        Ok(Self {
            checkout,
            cart,
            catalog,
            currency,
            shipping,
            payment,
            email,
            handles,
        })
    }

    /// Drops every client and waits for the actors to drain.
    ///
    /// Clones of the clients or of [`CheckoutService`] handed out earlier
    /// keep their actors alive; drop them before calling this.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down checkout system...");

        drop(self.checkout);
        drop(self.cart);
        drop(self.catalog);
        drop(self.currency);
        drop(self.shipping);
        drop(self.payment);
        drop(self.email);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Checkout system shutdown complete.");
        Ok(())
    }
}

fn spawn<S: Service>(
    service: S,
    config: &CheckoutConfig,
    handles: &mut Vec<tokio::task::JoinHandle<()>>,
) -> ServiceClient<S> {
    let (actor, client) = ServiceActor::new(service, config.channel_buffer);
    handles.push(tokio::spawn(actor.run()));
    match config.call_timeout {
        Some(limit) => client.with_timeout(limit),
        None => client,
    }
}

fn read(path: &Path) -> Result<String, StartupError> {
    std::fs::read_to_string(path).map_err(|e| StartupError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
