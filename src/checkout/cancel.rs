//! Cooperative cancellation for a running checkout.
//!
//! A [`CancelHandle`] owns a `watch` channel; every [`CancelSignal`] handed to
//! a checkout observes it. Read-only calls are raced against the signal with
//! [`guard`], so a cancelled checkout stops at the call in flight. Calls with
//! side effects only pass a [`checkpoint`] before they are sent and are then
//! awaited to completion.

use crate::checkout::{CheckoutError, CheckoutStage};
use std::future::Future;
use tokio::sync::watch;

/// Triggers cancellation for every signal created from it.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            receiver: Some(self.sender.subscribe()),
        }
    }

    pub fn cancel(&self) {
        // send_replace stores the value even when no signal is alive yet
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct CancelSignal {
    receiver: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self { receiver: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.receiver.as_ref().is_some_and(|r| *r.borrow())
    }

    /// Completes once cancellation is requested. Pends forever if the handle
    /// is dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(receiver) = &self.receiver else {
            return std::future::pending().await;
        };
        let mut receiver = receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Fails with `Cancelled { stage }` if cancellation was already requested.
pub(crate) fn checkpoint(stage: CheckoutStage, cancel: &CancelSignal) -> Result<(), CheckoutError> {
    if cancel.is_cancelled() {
        return Err(CheckoutError::Cancelled { stage });
    }
    Ok(())
}

/// Runs `work` unless cancellation wins the race. Cancellation is checked
/// first, so an already cancelled signal never starts the call.
pub(crate) async fn guard<T, F>(
    stage: CheckoutStage,
    cancel: &CancelSignal,
    work: F,
) -> Result<T, CheckoutError>
where
    F: Future<Output = Result<T, CheckoutError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CheckoutError::Cancelled { stage }),
        result = work => result,
    }
}
