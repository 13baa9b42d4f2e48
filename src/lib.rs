//! Arbiter
//!
//! Confidence tracking and pattern decision engine. See [`arbiter_core`] for
//! the library surface; the `arbiter` binary lives in `crates/arbiter-cli`.

pub use arbiter_core::*;
