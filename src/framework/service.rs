//! # Service Trait
//!
//! The `Service` trait is the contract every collaborator (cart, catalog,
//! currency, shipping, payment, email) implements to be hosted by the generic
//! [`ServiceActor`](crate::framework::ServiceActor).
//!
//! # Architecture Note
//! Each collaborator speaks its own request/response vocabulary. The
//! associated types pin that vocabulary at compile time: a `CartRequest` can
//! only ever reach the cart store, and the reply type is known to the caller.
//!
//! The error type must absorb [`FrameworkError`] so that transport failures
//! (closed channel, timeout) and domain failures travel through one enum.

use crate::framework::FrameworkError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Trait that any collaborator must implement to be hosted by a `ServiceActor`.
#[async_trait]
pub trait Service: Send + 'static {
    /// The requests this service understands.
    type Request: Send + Debug + 'static;

    /// The replies this service produces.
    type Response: Send + Debug + 'static;

    /// The error type for this service.
    type Error: std::error::Error + From<FrameworkError> + Send + Sync + 'static;

    /// Handle a single request. Called sequentially by the owning actor, so
    /// implementations may mutate `self` freely.
    async fn handle(&mut self, request: Self::Request) -> Result<Self::Response, Self::Error>;
}
