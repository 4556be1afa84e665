// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The seam through which diagnostic items reach the host's event stream.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::data_item::DataItem;
use crate::errors::EmitError;

/// Host event-emission call: `(tag, event time, payload)`.
pub trait EventEmitter {
    fn emit(&self, tag: &str, time: DateTime<Utc>, item: DataItem) -> Result<(), EmitError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmittedEvent {
    pub tag: String,
    pub time: DateTime<Utc>,
    pub item: DataItem,
}

/// Emitter backed by an unbounded channel. The receiving half belongs to
/// whatever buffers events on the host side.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<EmittedEvent>,
}

impl ChannelEmitter {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EmittedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventEmitter for ChannelEmitter {
    fn emit(&self, tag: &str, time: DateTime<Utc>, item: DataItem) -> Result<(), EmitError> {
        self.tx
            .send(EmittedEvent {
                tag: tag.to_string(),
                time,
                item,
            })
            .map_err(|e| EmitError::ChannelClosed(e.0.tag))
    }
}
