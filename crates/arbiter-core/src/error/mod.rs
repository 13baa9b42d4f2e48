//! Error types for Arbiter
//!
//! Every fallible operation in the crate returns [`ArbiterResult`]. The engine
//! never retries on its own: callers inspect [`ArbiterError::is_retryable`]
//! and decide whether to re-issue the request.

mod constructors;
mod conversions;
mod types;

pub use types::{ArbiterError, ArbiterResult};
