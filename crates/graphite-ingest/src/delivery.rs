// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Delivery subsystem: an independent service task fed over a channel.
//!
//! The ingest handler hands accepted samples off with a plain channel send,
//! so a slow delivery path never stalls line intake. The service owns the
//! current batch; consumers pull it with `flush`.

use crate::metric::MetricSample;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

#[derive(Debug)]
pub enum DeliveryCommand {
    Submit {
        sample: MetricSample,
        line: String,
    },
    Flush(oneshot::Sender<Vec<DeliveredPoint>>),
    Shutdown,
}

/// One accepted sample together with the (post-prefix) line it decoded from.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliveredPoint {
    pub sample: MetricSample,
    pub line: String,
}

#[derive(Clone)]
pub struct DeliveryHandle {
    tx: mpsc::UnboundedSender<DeliveryCommand>,
}

impl DeliveryHandle {
    /// Hands one sample to the delivery service. Never blocks the caller.
    pub fn submit(
        &self,
        sample: MetricSample,
        line: String,
    ) -> Result<(), mpsc::error::SendError<DeliveryCommand>> {
        self.tx.send(DeliveryCommand::Submit { sample, line })
    }

    /// Takes the current batch from the service, leaving it empty.
    pub async fn flush(&self) -> Result<Vec<DeliveredPoint>, String> {
        let (response_tx, response_rx) = oneshot::channel();
        self.tx
            .send(DeliveryCommand::Flush(response_tx))
            .map_err(|e| format!("Failed to send flush command: {}", e))?;

        response_rx
            .await
            .map_err(|e| format!("Failed to receive flush response: {}", e))
    }

    pub fn shutdown(&self) -> Result<(), mpsc::error::SendError<DeliveryCommand>> {
        self.tx.send(DeliveryCommand::Shutdown)
    }
}

pub struct DeliveryService {
    rx: mpsc::UnboundedReceiver<DeliveryCommand>,
    batch: Vec<DeliveredPoint>,
}

impl DeliveryService {
    #[must_use]
    pub fn new() -> (Self, DeliveryHandle) {
        let (tx, rx) = mpsc::unbounded_channel();

        let service = Self {
            rx,
            batch: Vec::new(),
        };

        let handle = DeliveryHandle { tx };

        (service, handle)
    }

    pub async fn run(mut self) {
        debug!("Delivery service started");

        while let Some(command) = self.rx.recv().await {
            match command {
                DeliveryCommand::Submit { sample, line } => {
                    self.batch.push(DeliveredPoint { sample, line });
                }

                DeliveryCommand::Flush(response_tx) => {
                    let batch = std::mem::take(&mut self.batch);
                    if response_tx.send(batch).is_err() {
                        error!("Failed to send flush response - receiver dropped");
                    }
                }

                DeliveryCommand::Shutdown => {
                    debug!("Delivery service shutting down");
                    break;
                }
            }
        }

        debug!("Delivery service stopped");
    }
}
