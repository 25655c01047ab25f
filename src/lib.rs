//! Play Store proxy service.
//!
//! A minimal reverse proxy: one route forwards GETs to a fixed Play Store
//! listing page and relays the response, a small set of static assets is
//! served from disk, everything else is a 404.
//!
//! # Routes
//! ```text
//! GET /playstore/check_version   proxy to the fixed upstream URL
//! GET /static/*                  static assets (prefix stripped)
//! GET /favicon.ico               fixed static file
//! GET /robots.txt                fixed static file
//! *   (unmatched)                404
//! ```

// Core subsystems
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::{HttpServer, ServerError};
pub use lifecycle::Shutdown;
