//! The checkout orchestrator.
//!
//! [`CheckoutService`] drives [`OrderAssembler`], which drives
//! [`PricingStep`], which relies on [`Money`](crate::money::Money) for every
//! amount. Progress and failures go to a [`CheckoutObserver`].

pub mod assembler;
pub mod cancel;
pub mod error;
pub mod observer;
pub mod pricing;
pub mod saga;

pub use assembler::{OrderAssembler, OrderPrep};
pub use cancel::{CancelHandle, CancelSignal};
pub use error::CheckoutError;
pub use observer::{CheckoutEvent, CheckoutObserver, Progress, RecordingObserver, TracingObserver};
pub use pricing::PricingStep;
pub use saga::{compute_total, CheckoutService, CheckoutStage, Collaborators};
