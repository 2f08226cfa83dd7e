//! Observation of checkout progress.
//!
//! The saga reports every stage it reaches and every failure, fatal or not,
//! to a [`CheckoutObserver`] injected at construction. [`TracingObserver`]
//! turns those reports into log events; [`RecordingObserver`] keeps them for
//! tests.

use crate::checkout::{CheckoutError, CheckoutStage};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub trait CheckoutObserver: Send + Sync {
    fn on_stage(&self, order_id: &str, stage: CheckoutStage);

    fn on_failure(&self, order_id: &str, stage: CheckoutStage, error: &CheckoutError);
}

/// Logs checkout progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CheckoutObserver for TracingObserver {
    fn on_stage(&self, order_id: &str, stage: CheckoutStage) {
        info!(order_id, ?stage, "Checkout stage reached");
    }

    fn on_failure(&self, order_id: &str, stage: CheckoutStage, error: &CheckoutError) {
        // Past shipment the order stands whatever went wrong
        if error.is_fatal() && stage < CheckoutStage::Shipped {
            warn!(order_id, ?stage, error = %error, "Checkout failed");
        } else {
            warn!(order_id, ?stage, error = %error, "Checkout step failed, order kept");
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEvent {
    Stage {
        order_id: String,
        stage: CheckoutStage,
    },
    Failure {
        order_id: String,
        stage: CheckoutStage,
        error: CheckoutError,
    },
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<CheckoutEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CheckoutEvent> {
        self.lock().clone()
    }

    /// Stages reached, in order, across all orders.
    pub fn stages(&self) -> Vec<CheckoutStage> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                CheckoutEvent::Stage { stage, .. } => Some(*stage),
                CheckoutEvent::Failure { .. } => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<CheckoutError> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                CheckoutEvent::Failure { error, .. } => Some(error.clone()),
                CheckoutEvent::Stage { .. } => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CheckoutEvent>> {
        // A panicking test thread must not hide the events from the others
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CheckoutObserver for RecordingObserver {
    fn on_stage(&self, order_id: &str, stage: CheckoutStage) {
        self.lock().push(CheckoutEvent::Stage {
            order_id: order_id.to_string(),
            stage,
        });
    }

    fn on_failure(&self, order_id: &str, stage: CheckoutStage, error: &CheckoutError) {
        self.lock().push(CheckoutEvent::Failure {
            order_id: order_id.to_string(),
            stage,
            error: error.clone(),
        });
    }
}

/// Current stage of one checkout, forwarding every move to the observer.
pub struct Progress {
    observer: Arc<dyn CheckoutObserver>,
    order_id: String,
    stage: CheckoutStage,
}

impl Progress {
    /// Starts at [`CheckoutStage::Start`] and reports it.
    pub fn start(observer: Arc<dyn CheckoutObserver>, order_id: impl Into<String>) -> Self {
        let progress = Self {
            observer,
            order_id: order_id.into(),
            stage: CheckoutStage::Start,
        };
        progress.observer.on_stage(&progress.order_id, progress.stage);
        progress
    }

    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    pub fn advance(&mut self, stage: CheckoutStage) {
        self.stage = stage;
        self.observer.on_stage(&self.order_id, stage);
    }

    pub fn fail(&self, error: &CheckoutError) {
        self.observer.on_failure(&self.order_id, self.stage, error);
    }
}
