use crate::framework::{FrameworkError, Service, ServiceClient};
use async_trait::async_trait;

/// Trait shared by the typed collaborator clients.
///
/// Implementors expose domain methods (`get_cart`, `charge`, ...) and unpack
/// the service's response enum; the trait supplies the raw `send` and the
/// error used when a response has the wrong shape.
#[async_trait]
pub trait CollaboratorClient<S: Service>: Send + Sync {
    /// Access the inner generic ServiceClient.
    fn inner(&self) -> &ServiceClient<S>;

    /// Sends a request and returns the raw response.
    #[tracing::instrument(skip(self), level = "debug")]
    async fn send(&self, request: S::Request) -> Result<S::Response, S::Error> {
        tracing::debug!("Sending request");
        self.inner().call(request).await
    }

    /// The error for a response that does not answer the request that was sent.
    fn unexpected(response: S::Response) -> S::Error {
        FrameworkError::UnexpectedResponse(format!("{response:?}")).into()
    }
}
