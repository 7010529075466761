//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and addresses
//! - Check the rule namespace can be split into segments
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{NamerVariant, RouterConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("routing.key_prefix '{0}' must be non-empty dot-separated segments")]
    InvalidKeyPrefix(String),

    #[error("routing.refresh_interval_secs must be greater than zero")]
    ZeroRefreshInterval,

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("namer.{0} must not be empty for the workstation namer")]
    MissingNamerSetting(&'static str),
}

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.routing.key_prefix;
    if prefix.is_empty() || prefix.split('.').any(str::is_empty) {
        errors.push(ValidationError::InvalidKeyPrefix(prefix.clone()));
    }

    if config.routing.refresh_interval_secs == 0 {
        errors.push(ValidationError::ZeroRefreshInterval);
    }

    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "admin.bind_address",
            value: config.admin.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.namer.variant == NamerVariant::Workstation {
        if config.namer.domain.trim().is_empty() {
            errors.push(ValidationError::MissingNamerSetting("domain"));
        }
        if config.namer.environment_key.trim().is_empty() {
            errors.push(ValidationError::MissingNamerSetting("environment_key"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
