// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::errors::ConfigError;
use crate::util::parse_metric_prefix;
use regex::Regex;
use std::env;

/// Configuration for the graphite ingestion front-end
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Listening port, used to namespace instrumentation names
    pub port: u16,
    /// Optional prefix prepended to every decoded metric name
    pub prefix: Option<String>,
    /// Optional allow-list pattern, full-line match semantics
    pub allow_regex: Option<String>,
    /// Optional deny-list pattern, full-line match semantics
    pub deny_regex: Option<String>,
    /// Maximum number of rejected lines kept for diagnostics
    pub max_blocked_lines: usize,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            port: 2003,
            prefix: None,
            allow_regex: None,
            deny_regex: None,
            max_blocked_lines: 100,
            log_level: "info".to_string(),
        }
    }
}

impl IngestConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("DD_GRAPHITE_PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(2003);
        let prefix = env::var("DD_GRAPHITE_PREFIX")
            .ok()
            .and_then(|val| parse_metric_prefix(&val));
        let allow_regex = env::var("DD_GRAPHITE_LINE_ALLOW_REGEX").ok();
        let deny_regex = env::var("DD_GRAPHITE_LINE_DENY_REGEX").ok();
        let max_blocked_lines = env::var("DD_GRAPHITE_MAX_BLOCKED_LINES")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(100);
        let log_level = env::var("DD_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| "info".to_string());

        let config = Self {
            port,
            prefix,
            allow_regex,
            deny_regex,
            max_blocked_lines,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration, compiling the patterns so a bad regex
    /// fails at startup instead of on the first line
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate port range
        if self.port == 0 {
            return Err(ConfigError::InvalidConfig(
                "Graphite port must be greater than 0".to_string(),
            ));
        }

        if let Some(pattern) = self.allow_regex.as_deref() {
            compile_pattern(pattern, "allow")?;
        }
        if let Some(pattern) = self.deny_regex.as_deref() {
            compile_pattern(pattern, "deny")?;
        }

        if let Some(prefix) = self.prefix.as_deref() {
            if parse_metric_prefix(prefix).is_none() {
                return Err(ConfigError::InvalidConfig(format!(
                    "Invalid metric prefix '{}'",
                    prefix
                )));
            }
        }

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}

fn compile_pattern(pattern: &str, which: &'static str) -> Result<(), ConfigError> {
    if pattern.trim().is_empty() {
        return Ok(());
    }
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidPattern {
            which,
            pattern: pattern.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = IngestConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_allow_pattern() {
        let config = IngestConfig {
            allow_regex: Some("[".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { which: "allow", .. })
        ));
    }

    #[test]
    fn test_validate_invalid_deny_pattern() {
        let config = IngestConfig {
            deny_regex: Some("(unclosed".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { which: "deny", .. })
        ));
    }

    #[test]
    fn test_validate_blank_pattern_is_no_constraint() {
        let config = IngestConfig {
            allow_regex: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_prefix() {
        let config = IngestConfig {
            prefix: Some("1dc".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = IngestConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
