//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//!
//! Shutdown (shutdown.rs):
//!     Signal received → stop accepting → drain connections → exit
//! ```
//!
//! # Design Decisions
//! - One-shot lifecycle: no restart after Stopped
//! - Drain is bounded by the configured grace period

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
