// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The decoded metric sample and its tag set.

use crate::errors::ParseError;
use ustr::Ustr;

/// Upper bound on tag pairs per sample.
pub const MAX_TAGS: usize = 100;

pub const EMPTY_TAGS: SortedTags = SortedTags { values: Vec::new() };

/// Tag set with unique keys, kept sorted for cheap comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortedTags {
    values: Vec<(Ustr, Ustr)>,
}

impl SortedTags {
    /// Parses whitespace-split `key=value` tokens. Keys are deduplicated;
    /// when a key repeats, the first pair in sorted order wins.
    pub fn parse(tag_tokens: &[&str]) -> Result<Self, ParseError> {
        let mut parsed = Vec::with_capacity(tag_tokens.len());
        for token in tag_tokens {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| ParseError::Tag((*token).to_string()))?;
            if key.is_empty() || value.is_empty() {
                return Err(ParseError::Tag((*token).to_string()));
            }
            parsed.push((Ustr::from(key), Ustr::from(value)));
        }
        parsed.sort_unstable();
        parsed.dedup_by(|a, b| a.0 == b.0);

        if parsed.len() > MAX_TAGS {
            return Err(ParseError::TooManyTags(MAX_TAGS));
        }

        Ok(Self { values: parsed })
    }

    pub fn get(&self, key: &str) -> Option<Ustr> {
        self.values
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One decoded metric sample, ready for delivery.
///
/// The timestamp is always overwritten with the ingestion-time clock before
/// the sample leaves the handler; a timestamp encoded in the source line is
/// validated but never preserved.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSample {
    pub name: Ustr,
    pub value: f64,
    pub tags: SortedTags,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        let tags = SortedTags::parse(&["dc=east", "host=web01"]).expect("tags parse failed");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("host"), Some(Ustr::from("web01")));
        assert_eq!(tags.get("dc"), Some(Ustr::from("east")));
        assert_eq!(tags.get("missing"), None);
    }

    #[test]
    fn test_parse_tags_empty() {
        let tags = SortedTags::parse(&[]).expect("tags parse failed");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_parse_tags_dedup_key() {
        let tags = SortedTags::parse(&["host=a", "host=b"]).expect("tags parse failed");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("host"), Some(Ustr::from("a")));
    }

    #[test]
    fn test_parse_tags_malformed() {
        assert!(SortedTags::parse(&["hostweb01"]).is_err());
        assert!(SortedTags::parse(&["=web01"]).is_err());
        assert!(SortedTags::parse(&["host="]).is_err());
    }

    #[test]
    fn test_parse_tags_over_limit() {
        let owned: Vec<String> = (0..=MAX_TAGS).map(|i| format!("k{i}=v{i}")).collect();
        let tokens: Vec<&str> = owned.iter().map(String::as_str).collect();
        assert!(matches!(
            SortedTags::parse(&tokens),
            Err(ParseError::TooManyTags(MAX_TAGS))
        ));
    }
}
