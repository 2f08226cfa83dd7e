//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber. Only the binary
//! calls it; library code just emits events and spans.
//!
//! ## Configuration
//!
//! Levels come from `RUST_LOG`. The format is compact and hides module
//! paths (`with_target(false)`): the structured fields already say which
//! service or order a line belongs to.
//!
//! ```bash
//! RUST_LOG=info cargo run      # stages, payments, shipments
//! RUST_LOG=debug cargo run     # every collaborator request
//! ```
//!
//! ## What Gets Traced
//!
//! - **Service actors**: start, shutdown with the number of requests handled,
//!   failed requests (`service`, `error`)
//! - **Clients**: one span per collaborator call
//! - **Checkout**: a `place_order` span carrying `user_id`, `currency` and
//!   `order_id`, with a line per stage from the
//!   [`TracingObserver`](crate::checkout::TracingObserver)
//!
//! With `RUST_LOG=info` a successful checkout reads roughly:
//!
//! ```text
//! INFO place_order: Placing order user_id="demo-user" currency="EUR" order_id=...
//! INFO place_order: Checkout stage reached order_id=... stage=Start
//! INFO place_order: Checkout stage reached order_id=... stage=CartFetched
//! ...
//! INFO place_order: Payment went through transaction_id=... total=105.54 EUR
//! INFO place_order: Order placed tracking_id="QK-44123-22..." items=2
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
