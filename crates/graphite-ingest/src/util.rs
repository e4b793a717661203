// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Utility functions for graphite ingestion.

/// Ingestion clock, epoch milliseconds. Returns 0 if the system clock is
/// before the epoch.
pub fn now_millis() -> i64 {
    std::time::UNIX_EPOCH
        .elapsed()
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Parses and validates a metric-name prefix.
///
/// A valid prefix must:
/// - Start with an ASCII letter
/// - Contain only ASCII alphanumerics, underscores, or periods
/// - Not be empty or contain only whitespace
///
/// Whitespace is automatically trimmed from the input.
///
/// # Examples
///
/// ```
/// use graphite_ingest::util::parse_metric_prefix;
///
/// assert_eq!(parse_metric_prefix("dc1"), Some("dc1".to_string()));
/// assert_eq!(parse_metric_prefix("prod.east"), Some("prod.east".to_string()));
/// assert_eq!(parse_metric_prefix("1invalid"), None);
/// assert_eq!(parse_metric_prefix("dc-1"), None);
/// ```
pub fn parse_metric_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut chars = trimmed.chars();

    // Check first character is a letter
    if let Some(first_char) = chars.next() {
        if !first_char.is_ascii_alphabetic() {
            tracing::error!(
                "DD_GRAPHITE_PREFIX must start with a letter, got: '{}'. Ignoring prefix.",
                trimmed
            );
            return None;
        }
    } else {
        return None;
    }

    // Check remaining characters are valid (alphanumeric, underscore, or period)
    if let Some(invalid_char) =
        chars.find(|&ch| !ch.is_ascii_alphanumeric() && ch != '_' && ch != '.')
    {
        tracing::error!(
            "DD_GRAPHITE_PREFIX contains invalid character '{}' in '{}'. Only ASCII alphanumerics, underscores, and periods are allowed. Ignoring prefix.",
            invalid_char, trimmed
        );
        return None;
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_advances() {
        let a = now_millis();
        assert!(a > 0);
        assert!(now_millis() >= a);
    }

    #[test]
    fn test_parse_metric_prefix_valid() {
        assert_eq!(parse_metric_prefix("dc1"), Some("dc1".to_string()));
        assert_eq!(parse_metric_prefix("my_dc"), Some("my_dc".to_string()));
        assert_eq!(
            parse_metric_prefix("prod.east.rack2"),
            Some("prod.east.rack2".to_string())
        );
    }

    #[test]
    fn test_parse_metric_prefix_with_whitespace() {
        assert_eq!(parse_metric_prefix("  dc1  "), Some("dc1".to_string()));
        assert_eq!(parse_metric_prefix("\tdc1\n"), Some("dc1".to_string()));
    }

    #[test]
    fn test_parse_metric_prefix_empty() {
        assert_eq!(parse_metric_prefix(""), None);
        assert_eq!(parse_metric_prefix("   "), None);
    }

    #[test]
    fn test_parse_metric_prefix_invalid_start() {
        assert_eq!(parse_metric_prefix("1dc"), None);
        assert_eq!(parse_metric_prefix("_dc"), None);
        assert_eq!(parse_metric_prefix(".dc"), None);
    }

    #[test]
    fn test_parse_metric_prefix_invalid_characters() {
        assert_eq!(parse_metric_prefix("dc-1"), None);
        assert_eq!(parse_metric_prefix("dc 1"), None);
        assert_eq!(parse_metric_prefix("dc@1"), None);
    }
}
