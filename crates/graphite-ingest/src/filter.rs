// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Allow/deny regex gate applied to each line before decoding.

use crate::errors::ConfigError;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Instrumentation for admission checks, injected at construction rather
/// than pulled from a global registry. Named `validation_regex.<port>` so
/// multiple listeners stay distinguishable.
#[derive(Debug)]
pub struct FilterStats {
    name: String,
    checks: AtomicU64,
    check_micros: AtomicU64,
    rejects: AtomicU64,
}

impl FilterStats {
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self {
            name: format!("validation_regex.{port}"),
            checks: AtomicU64::new(0),
            check_micros: AtomicU64::new(0),
            rejects: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of admission checks performed.
    pub fn checks(&self) -> u64 {
        self.checks.load(Ordering::Relaxed)
    }

    /// Accumulated check latency in microseconds.
    pub fn check_micros(&self) -> u64 {
        self.check_micros.load(Ordering::Relaxed)
    }

    /// Number of lines rejected by the allow/deny patterns.
    pub fn rejects(&self) -> u64 {
        self.rejects.load(Ordering::Relaxed)
    }

    fn record_check(&self, micros: u64) {
        self.checks.fetch_add(1, Ordering::Relaxed);
        self.check_micros.fetch_add(micros, Ordering::Relaxed);
    }

    fn record_reject(&self) {
        self.rejects.fetch_add(1, Ordering::Relaxed);
    }
}

/// Admission filter with optional allow and deny patterns, compiled once at
/// construction. Patterns use full-line match semantics; a missing or blank
/// pattern means "no constraint". Read-only after construction, safe for
/// unsynchronized concurrent checks.
pub struct AdmissionFilter {
    allow: Option<Regex>,
    deny: Option<Regex>,
    stats: Arc<FilterStats>,
}

impl AdmissionFilter {
    pub fn new(
        allow: Option<&str>,
        deny: Option<&str>,
        stats: Arc<FilterStats>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            allow: compile_full_match(allow, "allow")?,
            deny: compile_full_match(deny, "deny")?,
            stats,
        })
    }

    /// Returns true when the line is admitted. A line is rejected iff an
    /// allow pattern is set and the line does not fully match it, or a deny
    /// pattern is set and the line fully matches it. One latency observation
    /// is recorded per call, spanning the whole evaluation; each rejection
    /// increments the reject counter exactly once.
    pub fn check(&self, line: &str) -> bool {
        let start = Instant::now();
        let rejected = self.allow.as_ref().is_some_and(|re| !re.is_match(line))
            || self.deny.as_ref().is_some_and(|re| re.is_match(line));
        self.stats.record_check(start.elapsed().as_micros() as u64);

        if rejected {
            self.stats.record_reject();
            debug!("line rejected by allow/deny pattern: {}", line);
        }
        !rejected
    }

    pub fn stats(&self) -> &Arc<FilterStats> {
        &self.stats
    }
}

// Anchors the pattern so matching covers the whole line, not a substring.
fn compile_full_match(
    pattern: Option<&str>,
    which: &'static str,
) -> Result<Option<Regex>, ConfigError> {
    match pattern.map(str::trim) {
        None => Ok(None),
        Some(p) if p.is_empty() => Ok(None),
        Some(p) => Regex::new(&format!("^(?:{p})$"))
            .map(Some)
            .map_err(|source| ConfigError::InvalidPattern {
                which,
                pattern: p.to_string(),
                source,
            }),
    }
}
