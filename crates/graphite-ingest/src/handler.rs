// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-line ingest pipeline.
//!
//! One long-lived `IngestHandler` is shared by every connection the
//! listener accepts. `ingest` runs a line through formatting, admission
//! filtering, prefixing, and decoding, then hands the sample to the
//! delivery service. A malformed line never propagates an error to the
//! transport; every failure terminates in the blocked-line sink.

use std::sync::Arc;

use crate::blocked::{BlockedLines, RejectReason};
use crate::decoder::LineDecoder;
use crate::delivery::DeliveryHandle;
use crate::errors::ParseError;
use crate::filter::AdmissionFilter;
use crate::util::now_millis;
use tracing::{debug, error};

pub const PUSH_DATA_DELIMITER: char = '\n';

/// Joins lines into one push payload. Inverse of [`unjoin_push_data`] for
/// lines containing no newline characters.
pub fn join_push_data(lines: &[String]) -> String {
    lines.join("\n")
}

/// Splits a push payload back into lines. An empty payload yields no lines
/// rather than one phantom empty line; empty interior lines are preserved.
pub fn unjoin_push_data(push_data: &str) -> Vec<String> {
    if push_data.is_empty() {
        return Vec::new();
    }
    push_data
        .split(PUSH_DATA_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// Optional transform applied to a raw line before anything else looks at
/// it. A formatter failure is routed exactly like a decode failure.
pub trait LineFormatter: Send + Sync {
    fn format(&self, line: &str) -> Result<String, ParseError>;
}

pub struct IngestHandlerConfig {
    pub decoder: Arc<dyn LineDecoder>,
    pub formatter: Option<Arc<dyn LineFormatter>>,
    pub filter: AdmissionFilter,
    pub blocked: Arc<BlockedLines>,
    pub delivery: DeliveryHandle,
    /// When set, the line handed to the decoder becomes `prefix + "." +
    /// line`. Admission filtering always sees the un-prefixed line.
    pub prefix: Option<String>,
    /// Label passed through to the decoder, e.g. `graphite.2003`.
    pub source_label: String,
}

pub struct IngestHandler {
    decoder: Arc<dyn LineDecoder>,
    formatter: Option<Arc<dyn LineFormatter>>,
    filter: AdmissionFilter,
    blocked: Arc<BlockedLines>,
    delivery: DeliveryHandle,
    prefix: Option<String>,
    source_label: String,
}

impl IngestHandler {
    #[must_use]
    pub fn new(config: IngestHandlerConfig) -> Self {
        Self {
            decoder: config.decoder,
            formatter: config.formatter,
            filter: config.filter,
            blocked: config.blocked,
            delivery: config.delivery,
            prefix: config.prefix,
            source_label: config.source_label,
        }
    }

    /// Processes one already-delimited line to a terminal outcome:
    /// forwarded to delivery, routed to the blocked-line sink, or silently
    /// dropped. Safe for concurrent invocation from many connections; all
    /// mutable state is local to the call.
    pub fn ingest(&self, raw_line: &str) {
        // ignore empty lines.
        if raw_line.trim().is_empty() {
            return;
        }

        let line = match &self.formatter {
            Some(formatter) => match formatter.format(raw_line) {
                Ok(formatted) => formatted,
                Err(e) => {
                    debug!("failed to format line '{}': {}", raw_line, e);
                    self.blocked.offer(raw_line, RejectReason::Decode);
                    return;
                }
            },
            None => raw_line.to_string(),
        };

        // apply allow/deny patterns after formatting, but before prefixing
        if !self.filter.check(&line) {
            self.blocked.offer(&line, RejectReason::Admission);
            return;
        }

        let final_line = match &self.prefix {
            Some(prefix) => format!("{prefix}.{line}"),
            None => line.clone(),
        };

        // The decode buffer is owned by this invocation; concurrent callers
        // must never interleave their samples.
        let samples = match self.decoder.decode(&final_line, &self.source_label) {
            Ok(samples) => samples,
            Err(e) => {
                debug!("failed to decode line '{}': {}", line, e);
                self.blocked.offer(&line, RejectReason::Decode);
                return;
            }
        };

        // Only the first decoded sample is forwarded; kept for
        // compatibility with the legacy pipeline.
        let Some(mut sample) = samples.into_iter().next() else {
            return;
        };
        sample.timestamp = now_millis();
        if let Err(e) = self.delivery.submit(sample, final_line) {
            error!("Failed to send sample to delivery: {}", e);
        }
    }
}
