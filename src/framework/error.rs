//! # Framework Errors
//!
//! Transport-level failures shared by every service actor and client. Each
//! service error type lifts these through a `#[from]` variant, so a caller
//! always sees one error enum per collaborator.

use std::time::Duration;

/// Errors that can occur within the service framework itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}
