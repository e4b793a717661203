// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors produced while decoding a graphite line into a metric sample.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid metric line: {0}")]
    Syntax(String),

    #[error("invalid metric value: {0}")]
    Value(String),

    #[error("invalid timestamp: {0}")]
    Timestamp(String),

    #[error("invalid tag: {0}")]
    Tag(String),

    #[error("too many tags, more than {0}")]
    TooManyTags(usize),
}

/// Errors raised during construction-time validation of the ingest
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid {which} pattern '{pattern}': {source}")]
    InvalidPattern {
        which: &'static str,
        pattern: String,
        source: regex::Error,
    },
}
