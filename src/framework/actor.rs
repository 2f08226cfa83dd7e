//! # Generic Service Actor
//!
//! `ServiceActor<S>` is the "server" half of a collaborator. It owns the
//! service state and the receiving end of the request channel, and processes
//! requests strictly one at a time.

use crate::framework::{Service, ServiceClient, ServiceRequest};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor hosting one collaborator service.
///
/// **Concurrency Model**:
/// Many clients may hold a handle to the same actor, but the actor drains its
/// channel sequentially. Per-user mutations in the cart store, for instance,
/// are therefore serialized without a `Mutex` around the store.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ServiceActor::new(service, buffer)` returns the actor and
///     its client.
/// 2.  **Run**: spawn `actor.run()` on the runtime.
/// 3.  **Use**: clone the client into whoever needs it. Dropping every client
///     closes the channel and ends the loop.
pub struct ServiceActor<S: Service> {
    receiver: mpsc::Receiver<ServiceRequest<S>>,
    service: S,
}

impl<S: Service> ServiceActor<S> {
    /// Creates a new `ServiceActor` and its associated `ServiceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full,
    /// callers wait for space.
    pub fn new(service: S, buffer_size: usize) -> (Self, ServiceClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, service };
        (actor, ServiceClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        // Short type name, e.g. "CartStore" rather than the full module path
        let service = std::any::type_name::<S>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(service, "Actor started");

        let mut handled: u64 = 0;
        while let Some(ServiceRequest {
            request,
            respond_to,
        }) = self.receiver.recv().await
        {
            debug!(service, ?request, "Request");
            let result = self.service.handle(request).await;
            match &result {
                Ok(_) => debug!(service, "Request ok"),
                Err(e) => warn!(service, error = %e, "Request failed"),
            }
            handled += 1;
            // The caller may have given up (timeout, cancellation); nothing to do then.
            let _ = respond_to.send(result);
        }

        info!(service, handled, "Shutdown");
    }
}
