// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Graphite line-protocol decoder.
//!
//! One line encodes one sample: `name value [timestamp] [tag=value ...]`.
//! The decoder is stateless; every call returns a fresh vector so a shared
//! decoder is safe under concurrent use.

use crate::errors::ParseError;
use crate::metric::{MetricSample, SortedTags};
use crate::util::now_millis;
use tracing::trace;
use ustr::Ustr;

/// Decodes one already-delimited line into zero or more metric samples.
///
/// An empty vector is a legal success (syntactically valid but semantically
/// empty input, e.g. a comment line). The vector return type leaves room for
/// decoders that expand one line into several samples.
pub trait LineDecoder: Send + Sync {
    fn decode(&self, line: &str, source_label: &str) -> Result<Vec<MetricSample>, ParseError>;
}

#[derive(Clone, Debug, Default)]
pub struct GraphiteDecoder;

impl LineDecoder for GraphiteDecoder {
    fn decode(&self, line: &str, source_label: &str) -> Result<Vec<MetricSample>, ParseError> {
        let trimmed = line.trim();
        // Comment lines are valid and carry no samples.
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(Vec::new());
        }

        let mut tokens = trimmed.split_whitespace();

        #[allow(clippy::expect_used)]
        let name = tokens.next().expect("non-empty line has a first token");
        if name.contains('=') {
            return Err(ParseError::Syntax(trimmed.to_string()));
        }

        let value_token = tokens
            .next()
            .ok_or_else(|| ParseError::Syntax(trimmed.to_string()))?;
        let value: f64 = value_token
            .parse()
            .map_err(|_| ParseError::Value(value_token.to_string()))?;
        if !value.is_finite() {
            return Err(ParseError::Value(value_token.to_string()));
        }

        let rest: Vec<&str> = tokens.collect();

        // An optional timestamp token precedes the tags; anything with '='
        // is a tag. The parsed timestamp is validated here but replaced with
        // the ingestion clock before delivery.
        let (timestamp, tag_tokens) = match rest.first() {
            Some(token) if !token.contains('=') => {
                let ts = token
                    .parse::<i64>()
                    .map_err(|_| ParseError::Timestamp((*token).to_string()))?;
                (ts, &rest[1..])
            }
            _ => (now_millis(), &rest[..]),
        };

        let tags = SortedTags::parse(tag_tokens)?;

        trace!("decoded line from {}: {}", source_label, name);
        Ok(vec![MetricSample {
            name: Ustr::from(name),
            value,
            tags,
            timestamp,
        }])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decode_one(line: &str) -> MetricSample {
        GraphiteDecoder
            .decode(line, "test")
            .expect("decode failed")
            .into_iter()
            .next()
            .expect("no sample decoded")
    }

    #[test]
    fn test_decode_name_and_value() {
        let sample = decode_one("cpu.load 42");
        assert_eq!(sample.name, Ustr::from("cpu.load"));
        assert_eq!(sample.value, 42.0);
        assert!(sample.tags.is_empty());
    }

    #[test]
    fn test_decode_with_timestamp() {
        let sample = decode_one("cpu.load 42 1000000000");
        assert_eq!(sample.name, Ustr::from("cpu.load"));
        assert_eq!(sample.timestamp, 1_000_000_000);
    }

    #[test]
    fn test_decode_with_tags() {
        let sample = decode_one("cpu.load 0.5 1000000000 host=web01 dc=east");
        assert_eq!(sample.tags.len(), 2);
        assert_eq!(sample.tags.get("host"), Some(Ustr::from("web01")));
        assert_eq!(sample.tags.get("dc"), Some(Ustr::from("east")));
    }

    #[test]
    fn test_decode_tags_without_timestamp() {
        let sample = decode_one("cpu.load 0.5 host=web01");
        assert_eq!(sample.tags.len(), 1);
        assert!(sample.timestamp > 0);
    }

    #[test]
    fn test_decode_comment_yields_no_samples() {
        let samples = GraphiteDecoder
            .decode("# a comment", "test")
            .expect("decode failed");
        assert!(samples.is_empty());
    }

    #[test]
    fn test_decode_missing_value() {
        assert!(matches!(
            GraphiteDecoder.decode("cpu.load", "test"),
            Err(ParseError::Syntax(_))
        ));
    }

    #[test]
    fn test_decode_bad_value() {
        assert!(matches!(
            GraphiteDecoder.decode("bad metric!!", "test"),
            Err(ParseError::Value(_))
        ));
        assert!(matches!(
            GraphiteDecoder.decode("cpu.load NaN", "test"),
            Err(ParseError::Value(_))
        ));
    }

    #[test]
    fn test_decode_bad_timestamp() {
        assert!(matches!(
            GraphiteDecoder.decode("cpu.load 42 12:30", "test"),
            Err(ParseError::Timestamp(_))
        ));
    }

    #[test]
    fn test_decode_tag_shaped_name() {
        assert!(matches!(
            GraphiteDecoder.decode("host=web01 42", "test"),
            Err(ParseError::Syntax(_))
        ));
    }
}
