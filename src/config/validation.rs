//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, page size > 0)
//! - Check bind addresses (`IP:port` or `host:port`) and downstream URLs are usable
//! - Check the denylist is non-empty and has no blank terms
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NewsroomConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::NewsroomConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid bind address {value:?}")]
    BindAddress { field: &'static str, value: String },

    #[error("{field}: must be an http(s) URL, got {value}")]
    UpstreamUrl { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("censor.denylist: must contain at least one term")]
    EmptyDenylist,

    #[error("censor.denylist[{0}]: term is blank")]
    BlankTerm(usize),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &NewsroomConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("gateway.bind_address", &config.gateway.bind_address),
        ("comments.bind_address", &config.comments.bind_address),
        ("censor.bind_address", &config.censor.bind_address),
    ] {
        if !is_bind_address(value) {
            errors.push(ValidationError::BindAddress {
                field,
                value: value.clone(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BindAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    check_upstream("gateway.comments_url", &config.gateway.comments_url, &mut errors);
    check_upstream("gateway.censor_url", &config.gateway.censor_url, &mut errors);

    for (field, value) in [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("gateway.page_size", config.gateway.page_size as u64),
        ("security.max_body_size", config.security.max_body_size as u64),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.censor.denylist.is_empty() {
        errors.push(ValidationError::EmptyDenylist);
    }
    for (index, term) in config.censor.denylist.iter().enumerate() {
        if term.trim().is_empty() {
            errors.push(ValidationError::BlankTerm(index));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `IP:port` or `host:port`. Host names are resolved only when binding.
fn is_bind_address(value: &str) -> bool {
    if value.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match value.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty()
                && !host.contains(|c: char| c == ':' || c == '/' || c.is_whitespace())
                && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

fn check_upstream(field: &'static str, url: &Url, errors: &mut Vec<ValidationError>) {
    let scheme_ok = matches!(url.scheme(), "http" | "https");
    if !scheme_ok || url.host().is_none() {
        errors.push(ValidationError::UpstreamUrl {
            field,
            value: url.to_string(),
        });
    }
}
