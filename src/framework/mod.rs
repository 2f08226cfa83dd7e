//! Generic service framework.
//!
//! Every collaborator of the checkout saga runs as a [`ServiceActor`]: a Tokio
//! task owning the service state, fed by an `mpsc` channel and answering over
//! `oneshot` channels. Callers hold a [`ServiceClient`], which is the only
//! transport the rest of the crate knows about.
//!
//! # Main Components
//!
//! - [`Service`] - Trait a collaborator implements to be hosted by an actor
//! - [`ServiceActor`] - The message loop
//! - [`ServiceClient`] - Cloneable handle with an optional per-call timeout
//! - [`FrameworkError`] - Transport failures
//!
//! # Testing
//!
//! See [`mock`] for scripted collaborators.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod service;

pub use actor::ServiceActor;
pub use client::ServiceClient;
pub use error::FrameworkError;
pub use message::{Responder, ServiceRequest};
pub use service::Service;
