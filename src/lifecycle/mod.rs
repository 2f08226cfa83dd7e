//! # System Lifecycle
//!
//! Starting, wiring and stopping the collaborators.
//!
//! ## Startup
//!
//! [`CheckoutSystem::new`] loads the catalog and currency tables, spawns one
//! [`ServiceActor`](crate::framework::ServiceActor) per collaborator, applies
//! the configured call timeout to every client and hands the clients to a
//! [`CheckoutService`](crate::checkout::CheckoutService). The saga is not an
//! actor: it runs on whichever task calls `place_order`, so checkouts for
//! different users proceed concurrently while each collaborator still
//! handles its own requests one at a time.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients**: closes the sender side of each channel
//! 2. **Actors detect closure**: `receiver.recv()` returns `None`
//! 3. **Actors log and exit**: each reports how many requests it handled
//! 4. **Await completion**: a panicked actor turns into an `Err`
//!
//! The dependency graph is acyclic (no service holds another service's
//! client), so dropping the clients is enough to stop everything.
//!
//! ## Configuration
//!
//! [`CheckoutConfig`] holds the defaults and reads `CHECKOUT_*` environment
//! variables; see [`CheckoutConfig::from_env`].

pub mod checkout_system;
pub mod config;
pub mod tracing;

pub use checkout_system::*;
pub use config::*;
pub use tracing::*;
