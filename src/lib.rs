//! # Checkout Orchestrator
//!
//! Turns a user's cart into a priced, paid and shipped order by sequencing
//! calls to the collaborating services, with exact fixed-point arithmetic on
//! every amount.
//!
//! ## 🏗️ Design
//!
//! ### Collaborators as actors
//! The cart store, product catalog, currency converter, shipping, payment
//! and email services each run as a [`ServiceActor`](framework::ServiceActor):
//! one Tokio task that owns the service state and answers typed requests
//! from an `mpsc` channel. Callers only ever hold a typed client, so the
//! channel pair is the whole "remote call" transport.
//!
//! ### The saga is not an actor
//! [`CheckoutService`](checkout::CheckoutService) is a cloneable bundle of
//! client handles. Each `place_order` runs as one sequential unit of work on
//! the caller's task, so checkouts for different users run side by side.
//!
//! ### Money never touches a float
//! [`Money`](money::Money) is whole units plus nanos. Sums carry and borrow
//! in integers; conversions use 128-bit integer rates.
//!
//! ### Type-safe errors
//! Every service has its own `thiserror` enum that absorbs
//! [`FrameworkError`](framework::FrameworkError). The saga maps them onto
//! [`CheckoutError`](checkout::CheckoutError), which names the product, user,
//! currency or email involved.
//!
//! ## 🗺️ Module Tour
//!
//! 1. **[`money`]**: exact amounts
//! 2. **[`framework`]**: the generic actor, client, and mocks for tests
//! 3. **[`services`]**: the collaborators
//! 4. **[`clients`]**: typed wrappers around the framework client
//! 5. **[`checkout`]**: pricing, order assembly and the saga itself
//! 6. **[`lifecycle`]**: configuration, tracing setup, starting and
//!    stopping the whole system
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod checkout;
pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod money;
pub mod services;
