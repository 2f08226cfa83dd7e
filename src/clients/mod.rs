//! Type-safe wrappers around [`ServiceClient`](crate::framework::ServiceClient),
//! one per collaborator.

pub mod cart_client;
pub mod catalog_client;
pub mod collaborator_client;
pub mod currency_client;
pub mod email_client;
pub mod payment_client;
pub mod shipping_client;

pub use cart_client::*;
pub use catalog_client::*;
pub use collaborator_client::*;
pub use currency_client::*;
pub use email_client::*;
pub use payment_client::*;
pub use shipping_client::*;
