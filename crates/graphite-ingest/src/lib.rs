// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Ingestion front-end for graphite line-protocol metrics.
//!
//! Each line pushed over a persistent connection runs through one shared
//! [`handler::IngestHandler`]: optional formatting, allow/deny admission
//! filtering, optional metric-name prefixing, and decoding. Accepted
//! samples are stamped with the ingestion clock and handed to the
//! channel-backed [`delivery::DeliveryService`]; rejected and unparsable
//! lines land in the bounded [`blocked::BlockedLines`] sink.

#![deny(clippy::all)]

pub mod blocked;
pub mod config;
pub mod decoder;
pub mod delivery;
pub mod errors;
pub mod filter;
pub mod handler;
pub mod metric;
pub mod util;
