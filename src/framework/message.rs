//! # Generic Messages
//!
//! The envelope carried from a `ServiceClient` to its `ServiceActor`.

use crate::framework::Service;
use tokio::sync::oneshot;

/// Type alias for the one-shot reply channel used by service actors.
pub type Responder<T, E> = oneshot::Sender<Result<T, E>>;

/// A request paired with the channel its answer must be sent back on.
///
/// The actor never inspects `request` itself; it hands it to
/// [`Service::handle`] and forwards whatever comes back, success or failure.
pub struct ServiceRequest<S: Service> {
    pub request: S::Request,
    pub respond_to: Responder<S::Response, S::Error>,
}
