//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → playstore.rs (proxy route: forward to the fixed upstream)
//!     → static_files.rs (fixed files + /static prefix)
//!     → fallback (404)
//! ```

pub mod playstore;
pub mod server;
pub mod static_files;

pub use server::{AppState, HttpServer, ServerError};
