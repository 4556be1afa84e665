// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic data items and records for log collection agent plugins.
//!
//! Input and filter plugins call [`diag::log_diag`] to emit a diagnostic
//! data item on the host's event stream. The output plugin later runs
//! [`diag::process_data_items_post_aggregation`] over the aggregated items
//! and wraps them with [`diag::create_diag_record`] before serialization.
//!
//! ```text
//!   plugin ── log_diag ──> EventEmitter ──> (host buffering)
//!                                                  │
//!                                                  v
//!          Record <── create_diag_record <── post-aggregation
//! ```

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod constants;
pub mod data_item;
pub mod diag;
pub mod emitter;
pub mod errors;
pub mod logger;
pub mod record;

pub use data_item::DataItem;
pub use record::Record;
