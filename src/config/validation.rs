//! Configuration validation.
//!
//! Serde handles syntax; this pass checks values. Every problem is
//! reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::security::rate_limit::Tier;

/// Longest accepted rate-limit window (one day).
pub const MAX_WINDOW_SECS: u64 = 24 * 60 * 60;

/// A single semantic problem in a loaded config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("rate_limit.tiers.{tier}: max_requests must be greater than zero")]
    ZeroQuota { tier: Tier },

    #[error("rate_limit.tiers.{tier}: window_secs must be greater than zero")]
    ZeroWindow { tier: Tier },

    #[error("rate_limit.tiers.{tier}: window_secs must be at most {max}")]
    WindowTooLong { tier: Tier, max: u64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{0} is required when mail is enabled")]
    MissingMailSetting(&'static str),

    #[error("admin.api_key must not be empty")]
    EmptyAdminKey,
}

/// Validate a deserialized config.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
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

    for tier in Tier::ALL {
        let limit = config.rate_limit.tiers.limit(tier);
        if limit.max_requests == 0 {
            errors.push(ValidationError::ZeroQuota { tier });
        }
        if limit.window_secs == 0 {
            errors.push(ValidationError::ZeroWindow { tier });
        }
        if limit.window_secs > MAX_WINDOW_SECS {
            errors.push(ValidationError::WindowTooLong {
                tier,
                max: MAX_WINDOW_SECS,
            });
        }
    }

    if config.rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError::Zero("rate_limit.sweep_interval_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }
    if config.inventory.low_stock_threshold == 0 {
        errors.push(ValidationError::Zero("inventory.low_stock_threshold"));
    }

    if config.mail.enabled {
        if config.mail.endpoint.trim().is_empty() {
            errors.push(ValidationError::MissingMailSetting("mail.endpoint"));
        }
        if config.mail.to.trim().is_empty() {
            errors.push(ValidationError::MissingMailSetting("mail.to"));
        }
    }

    if config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::EmptyAdminKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.rate_limit.tiers.auth.max_requests = 0;
        config.rate_limit.tiers.read.window_secs = 0;
        config.mail.enabled = true;
        config.admin.api_key = "  ".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroQuota { tier: Tier::Auth }));
        assert!(errors.contains(&ValidationError::ZeroWindow { tier: Tier::Read }));
        assert!(errors.contains(&ValidationError::MissingMailSetting("mail.endpoint")));
        assert!(errors.contains(&ValidationError::MissingMailSetting("mail.to")));
        assert!(errors.contains(&ValidationError::EmptyAdminKey));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn oversized_window_is_rejected() {
        let mut config = ServiceConfig::default();
        config.rate_limit.tiers.read.window_secs = u64::MAX / 2;
        config.rate_limit.tiers.admin.window_secs = MAX_WINDOW_SECS;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::WindowTooLong {
                tier: Tier::Read,
                max: MAX_WINDOW_SECS
            }]
        );
    }

    #[test]
    fn messages_name_the_field() {
        let err = ValidationError::ZeroQuota { tier: Tier::Write };
        assert_eq!(
            err.to_string(),
            "rate_limit.tiers.write: max_requests must be greater than zero"
        );
    }
}
