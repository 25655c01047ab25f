//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Returns all validation errors, not just the first, so an operator can
//! fix a broken config in one pass.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("server.listen {0:?} is not a valid socket address")]
    InvalidListenAddress(String),

    #[error("upstream.url {0:?} is not a valid URL")]
    InvalidUpstreamUrl(String),

    #[error("upstream.url {0:?} must use the http or https scheme")]
    UnsupportedUpstreamScheme(String),

    #[error("upstream.pool_max_idle must be greater than zero")]
    ZeroPoolSize,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("static_files.dir must not be empty")]
    EmptyStaticDir,
}

/// Validate a fully assembled configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.listen.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidListenAddress(
            config.server.listen.clone(),
        ));
    }

    match Url::parse(&config.upstream.url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedUpstreamScheme(
                config.upstream.url.clone(),
            ));
        }
        Ok(_) => {}
        Err(_) => {
            errors.push(ValidationError::InvalidUpstreamUrl(
                config.upstream.url.clone(),
            ));
        }
    }

    if config.upstream.pool_max_idle == 0 {
        errors.push(ValidationError::ZeroPoolSize);
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.request_timeout_secs"));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("server.request_timeout_secs"));
    }
    if config.server.shutdown_grace_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("server.shutdown_grace_secs"));
    }
    if config.static_files.dir.is_empty() {
        errors.push(ValidationError::EmptyStaticDir);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
