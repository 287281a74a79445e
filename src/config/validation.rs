//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject inbounds without a usable port
//! - Detect tag collisions across inbounds and outbounds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs inside the format loaders, before a config leaves the registry

use std::collections::HashSet;

use crate::config::error::ValidationError;
use crate::config::schema::Config;

const LOG_LEVELS: &[&str] = &["debug", "info", "warning", "error", "none"];

/// Validate a decoded configuration.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = config.log.loglevel.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel {
            level: config.log.loglevel.clone(),
        });
    }

    for (index, inbound) in config.inbounds.iter().enumerate() {
        if inbound.port == 0 {
            errors.push(ValidationError::ZeroPort { index });
        }
    }

    // Empty tags are allowed and never collide.
    let mut seen = HashSet::new();
    let tags = config
        .inbounds
        .iter()
        .map(|i| &i.tag)
        .chain(config.outbounds.iter().map(|o| &o.tag));
    for tag in tags.filter(|t| !t.is_empty()) {
        if !seen.insert(tag.as_str()) {
            errors.push(ValidationError::DuplicateTag { tag: tag.clone() });
        }
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
    use crate::config::schema::{InboundConfig, OutboundConfig};
    use serde_json::Value;

    fn inbound(tag: &str, port: u16) -> InboundConfig {
        InboundConfig {
            tag: tag.into(),
            listen: "127.0.0.1".into(),
            port,
            protocol: "socks".into(),
            settings: Value::Null,
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = Config::default();
        config.log.loglevel = "verbose".into();
        config.inbounds.push(inbound("proxy", 0));
        config.outbounds.push(OutboundConfig {
            tag: "proxy".into(),
            protocol: "freedom".into(),
            settings: Value::Null,
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::UnknownLogLevel { level: "verbose".into() },
                ValidationError::ZeroPort { index: 0 },
                ValidationError::DuplicateTag { tag: "proxy".into() },
            ]
        );
    }

    #[test]
    fn empty_tags_do_not_collide() {
        let mut config = Config::default();
        config.inbounds.push(inbound("", 1080));
        config.inbounds.push(inbound("", 1081));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = Config::default();
        config.log.loglevel = "Debug".into();
        assert!(validate_config(&config).is_ok());
    }
}
