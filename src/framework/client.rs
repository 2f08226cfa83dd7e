//! # Generic Client
//!
//! The handle through which every collaborator is called.

use crate::framework::{FrameworkError, Service, ServiceRequest};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// A type-safe handle for calling a `ServiceActor`.
///
/// Holds only a channel sender and an optional per-call deadline, so cloning
/// is cheap and clones can be moved into independent tasks.
pub struct ServiceClient<S: Service> {
    sender: mpsc::Sender<ServiceRequest<S>>,
    call_timeout: Option<Duration>,
}

impl<S: Service> Clone for ServiceClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            call_timeout: self.call_timeout,
        }
    }
}

impl<S: Service> ServiceClient<S> {
    pub fn new(sender: mpsc::Sender<ServiceRequest<S>>) -> Self {
        Self {
            sender,
            call_timeout: None,
        }
    }

    /// Returns a copy of this client whose calls fail with
    /// [`FrameworkError::Timeout`] when no reply arrives within `limit`.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.call_timeout = Some(limit);
        self
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }

    /// Sends `request` and waits for the service's answer.
    ///
    /// Transport failures are lifted into the service's own error type.
    pub async fn call(&self, request: S::Request) -> Result<S::Response, S::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest {
                request,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;

        let reply = match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, response)
                .await
                .map_err(|_| FrameworkError::Timeout(limit))?,
            None => response.await,
        };
        reply.map_err(|_| FrameworkError::ActorDropped)?
    }
}
