//! The collaborators of the checkout saga, each hosted by a
//! [`ServiceActor`](crate::framework::ServiceActor).
//!
//! Every service defines its own request, response and error types. Errors
//! carry a `Transport` variant so that channel failures reach the caller as
//! the service's own error.

pub mod cart;
pub mod catalog;
pub mod currency;
pub mod email;
pub mod payment;
pub mod shipping;

pub use cart::{CartError, CartRequest, CartResponse, CartStore};
pub use catalog::{CatalogError, CatalogRequest, CatalogResponse, ProductCatalog};
pub use currency::{CurrencyConverter, CurrencyError, CurrencyRequest, CurrencyResponse};
pub use email::{EmailError, EmailNotifier, EmailRequest, EmailResponse};
pub use payment::{PaymentError, PaymentGateway, PaymentRequest, PaymentResponse};
pub use shipping::{ShippingError, ShippingRequest, ShippingResponse, ShippingService};
