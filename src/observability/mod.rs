//! Observability subsystem: structured logging.

pub mod logging;
