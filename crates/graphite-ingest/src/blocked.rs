// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bounded diagnostic store for rejected lines.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Why a line ended up in the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Rejected by the allow/deny admission patterns.
    Admission,
    /// The decoder or formatter failed on the line.
    Decode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockedLine {
    pub line: String,
    pub reason: RejectReason,
}

/// Stores up to `max_samples` rejected lines for diagnostics while counting
/// every rejection. The sample buffer is bounded; the counter is not. Safe
/// under concurrent offers from multiple ingest invocations.
#[derive(Debug)]
pub struct BlockedLines {
    samples: Mutex<Vec<BlockedLine>>,
    max_samples: usize,
    total_rejected: AtomicU64,
}

impl BlockedLines {
    #[must_use]
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: Mutex::new(Vec::new()),
            max_samples,
            total_rejected: AtomicU64::new(0),
        }
    }

    /// Stores the line if the buffer has room; counts the rejection either
    /// way.
    pub fn offer(&self, line: &str, reason: RejectReason) {
        {
            #[allow(clippy::expect_used)]
            let mut samples = self.samples.lock().expect("lock poisoned");
            if samples.len() < self.max_samples {
                samples.push(BlockedLine {
                    line: line.to_string(),
                    reason,
                });
            }
        }
        self.total_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Total rejections seen, including those not stored.
    pub fn total_rejected(&self) -> u64 {
        self.total_rejected.load(Ordering::Relaxed)
    }

    pub fn sample_count(&self) -> usize {
        #[allow(clippy::expect_used)]
        let samples = self.samples.lock().expect("lock poisoned");
        samples.len()
    }

    /// Hands out the stored samples and clears the buffer, making room for
    /// new diagnostics. The total counter is left untouched.
    pub fn drain(&self) -> Vec<BlockedLine> {
        #[allow(clippy::expect_used)]
        let mut samples = self.samples.lock().expect("lock poisoned");
        std::mem::take(&mut *samples)
    }
}
