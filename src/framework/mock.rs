//! # Mock Framework
//!
//! Utilities for testing code that talks to collaborators without running the
//! real services.
//!
//! | | `MockClient` | Real `ServiceActor` |
//! |---|---|---|
//! | **State** | Scripted replies | Real service state |
//! | **Faults** | `return_err`, `return_ok_after`, `never_reply` | Specific state |
//! | **Use Case** | Saga and client logic | The service itself, full system |
//!
//! Two styles are available:
//!
//! - [`MockClient`]: queue replies up front, run the code under test, then
//!   [`verify`](MockClient::verify) that every reply was consumed and no
//!   request arrived that was not scripted.
//! - [`create_mock_client`] + [`expect_request`]: receive the raw request
//!   envelope yourself and answer it by hand.
//!
//! ```ignore
//! let mut cart = MockClient::<CartStore>::new();
//! cart.expect_call().return_ok(CartResponse::Cart(vec![]));
//! let client = CartClient::new(cart.client());
//! assert!(client.get_cart("u1").await.unwrap().is_empty());
//! cart.verify();
//! ```

use crate::framework::{Responder, Service, ServiceClient, ServiceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// A scripted reply for the next request.
enum Expectation<S: Service> {
    Reply(Result<S::Response, S::Error>),
    /// Answer only after the delay has passed.
    Delayed(Duration, Result<S::Response, S::Error>),
    /// Keep the request pending forever; used for timeout and cancellation tests.
    Hang,
}

struct Recorder<S: Service> {
    expectations: VecDeque<Expectation<S>>,
    received: Vec<S::Request>,
    unexpected: Vec<S::Request>,
}

/// A mock collaborator with expectation tracking.
///
/// Requests are answered in the order expectations were queued. A request
/// arriving when the queue is empty is recorded as unexpected and its reply
/// channel is dropped, so the caller sees `FrameworkError::ActorDropped`.
pub struct MockClient<S: Service> {
    client: ServiceClient<S>,
    recorder: Arc<Mutex<Recorder<S>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<S: Service> MockClient<S>
where
    S::Request: Clone,
{
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ServiceRequest<S>>(100);
        let recorder = Arc::new(Mutex::new(Recorder {
            expectations: VecDeque::new(),
            received: Vec::new(),
            unexpected: Vec::new(),
        }));
        let recorder_clone = recorder.clone();

        let handle = tokio::spawn(async move {
            let mut pending: Vec<Responder<S::Response, S::Error>> = Vec::new();
            while let Some(ServiceRequest {
                request,
                respond_to,
            }) = receiver.recv().await
            {
                let mut rec = recorder_clone.lock().unwrap();
                rec.received.push(request.clone());
                let expectation = rec.expectations.pop_front();
                match expectation {
                    Some(Expectation::Reply(response)) => {
                        let _ = respond_to.send(response);
                    }
                    Some(Expectation::Delayed(delay, response)) => {
                        tokio::spawn(async move {
                            tokio::time::sleep(delay).await;
                            let _ = respond_to.send(response);
                        });
                    }
                    Some(Expectation::Hang) => pending.push(respond_to),
                    None => rec.unexpected.push(request),
                }
            }
        });

        Self {
            client: ServiceClient::new(sender),
            recorder,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ServiceClient<S> {
        self.client.clone()
    }

    /// Queues the reply for the next request.
    pub fn expect_call(&mut self) -> CallExpectationBuilder<S> {
        CallExpectationBuilder {
            recorder: self.recorder.clone(),
        }
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<S::Request> {
        self.recorder.lock().unwrap().received.clone()
    }

    pub fn call_count(&self) -> usize {
        self.recorder.lock().unwrap().received.len()
    }

    /// Verifies that all expectations were met and nothing unscripted arrived.
    pub fn verify(&self) {
        let rec = self.recorder.lock().unwrap();
        if !rec.unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", rec.unexpected);
        }
        if !rec.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                rec.expectations.len()
            );
        }
    }
}

impl<S: Service> Default for MockClient<S>
where
    S::Request: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single scripted reply.
pub struct CallExpectationBuilder<S: Service> {
    recorder: Arc<Mutex<Recorder<S>>>,
}

impl<S: Service> CallExpectationBuilder<S> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, response: S::Response) {
        self.push(Expectation::Reply(Ok(response)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: S::Error) {
        self.push(Expectation::Reply(Err(error)));
    }

    /// Returns a successful result once `delay` has passed.
    pub fn return_ok_after(self, delay: Duration, response: S::Response) {
        self.push(Expectation::Delayed(delay, Ok(response)));
    }

    /// Accepts the request but never answers it.
    pub fn never_reply(self) {
        self.push(Expectation::Hang);
    }

    fn push(self, expectation: Expectation<S>) {
        self.recorder
            .lock()
            .unwrap()
            .expectations
            .push_back(expectation);
    }
}

/// Creates a client and the receiver its requests arrive on.
///
/// Useful when a test wants to inspect a request in detail before deciding
/// how to answer it.
pub fn create_mock_client<S: Service>(
    buffer_size: usize,
) -> (ServiceClient<S>, mpsc::Receiver<ServiceRequest<S>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ServiceClient::new(sender), receiver)
}

/// Waits for the next request on a raw mock channel.
pub async fn expect_request<S: Service>(
    receiver: &mut mpsc::Receiver<ServiceRequest<S>>,
) -> Option<(S::Request, Responder<S::Response, S::Error>)> {
    receiver
        .recv()
        .await
        .map(|ServiceRequest { request, respond_to }| (request, respond_to))
}
