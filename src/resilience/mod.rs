//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Downstream call from the gateway:
//!     → timeouts.rs (enforce the per-call deadline)
//!     → on expiry: caller translates to its own error
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - No retries and no circuit breaking: failures surface immediately

pub mod timeouts;

pub use timeouts::{with_timeout, TimeoutError};
