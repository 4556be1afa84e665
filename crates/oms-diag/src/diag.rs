// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Building, post-processing and wrapping diagnostic data items.
//!
//! # Lifecycle
//!
//! 1. [`log_diag`] builds an item with the mandatory fields and emits it.
//! 2. The host buffers items and groups them by source name
//!    (see [`group_by_ipname`]).
//! 3. [`process_data_items_post_aggregation`] drops malformed items, strips
//!    the source name and stamps the type and agent id.
//! 4. [`create_diag_record`] wraps a group into a [`Record`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_IPNAME, DEFAULT_TAG, DI_KEY_IPNAME, DI_KEY_LOGMESSAGE, DI_KEY_TIME, RECORD_DATAITEMS,
    RECORD_IPNAME, RECORD_MGID, RECORD_MGID_VALUE, TIME_FORMAT,
};
use crate::data_item::{finalize_map, is_valid_value, DataItem};
use crate::emitter::EventEmitter;
use crate::record::Record;

/// Fallback tag and source name used when a caller passes `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagDefaults<'a> {
    /// Tag to emit under.
    pub tag: &'a str,
    /// Source name stored in `IPName`.
    pub ipname: &'a str,
}

impl Default for DiagDefaults<'_> {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG,
            ipname: DEFAULT_IPNAME,
        }
    }
}

/// Emits a diagnostic log entry through `emitter`.
///
/// `tag` and `ipname` fall back to [`DEFAULT_TAG`] and [`DEFAULT_IPNAME`].
/// Extra `properties` are merged first so the mandatory fields always win.
/// Emission failures are logged and otherwise ignored.
pub fn log_diag<E: EventEmitter + ?Sized>(
    emitter: &E,
    log_message: &str,
    tag: Option<&str>,
    ipname: Option<&str>,
    properties: Option<&Map<String, Value>>,
) {
    log_diag_with_defaults(
        emitter,
        &DiagDefaults::default(),
        log_message,
        tag,
        ipname,
        properties,
    );
}

/// Same as [`log_diag`], with the fallbacks taken from `defaults`
/// (typically [`crate::config::DiagConfig::defaults`]).
pub fn log_diag_with_defaults<E: EventEmitter + ?Sized>(
    emitter: &E,
    defaults: &DiagDefaults<'_>,
    log_message: &str,
    tag: Option<&str>,
    ipname: Option<&str>,
    properties: Option<&Map<String, Value>>,
) {
    let tag = tag.unwrap_or(defaults.tag);
    let now = Utc::now();
    let item = build_data_item(
        log_message,
        Some(ipname.unwrap_or(defaults.ipname)),
        properties,
        now,
    );

    if let Err(e) = emitter.emit(tag, now, item) {
        warn!("Failed to emit diagnostic item: {e}");
    }
}

/// Builds the item [`log_diag`] would emit at time `now`.
#[must_use]
pub fn build_data_item(
    log_message: &str,
    ipname: Option<&str>,
    properties: Option<&Map<String, Value>>,
    now: DateTime<Utc>,
) -> DataItem {
    let mut item = DataItem::new();

    if let Some(properties) = properties {
        item.merge(properties);
    }

    // The source name is stripped again during post-aggregation; type and
    // agent id are stamped there too.
    item.insert(DI_KEY_LOGMESSAGE, log_message);
    item.insert(DI_KEY_IPNAME, ipname.unwrap_or(DEFAULT_IPNAME));
    item.insert(DI_KEY_TIME, format_time(now));
    item
}

/// Formats `time` as ISO-8601 UTC with microseconds.
#[must_use]
pub fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Drops invalid entries from `data_items`, then finalizes the remaining ones
/// for serialization. Returns the number of entries dropped.
pub fn process_data_items_post_aggregation(data_items: &mut Vec<Value>, agent_id: &str) -> usize {
    let before = data_items.len();
    data_items.retain(is_valid_value);
    let dropped = before - data_items.len();

    for map in data_items.iter_mut().filter_map(Value::as_object_mut) {
        finalize_map(map, agent_id);
    }

    log_dropped(dropped);
    dropped
}

/// Typed variant of [`process_data_items_post_aggregation`].
pub fn process_typed_data_items(data_items: &mut Vec<DataItem>, agent_id: &str) -> usize {
    let before = data_items.len();
    data_items.retain(DataItem::is_valid);
    let dropped = before - data_items.len();

    for item in data_items.iter_mut() {
        item.finalize(agent_id);
    }

    log_dropped(dropped);
    dropped
}

fn log_dropped(dropped: usize) {
    if dropped > 0 {
        debug!("Dropped {dropped} invalid diagnostic data items");
    }
}

/// Wraps already validated `data_items` into a record for `ipname`.
///
/// `optional_attributes` go in first; the item list, source name and
/// management group id overwrite any colliding attribute.
#[must_use]
pub fn create_diag_record<I>(
    data_items: I,
    ipname: &str,
    optional_attributes: Option<&Map<String, Value>>,
) -> Record
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let mut record = optional_attributes.cloned().unwrap_or_default();

    let items: Vec<Value> = data_items.into_iter().map(Into::into).collect();
    record.insert(RECORD_DATAITEMS.to_string(), Value::Array(items));
    record.insert(RECORD_IPNAME.to_string(), Value::from(ipname));
    record.insert(RECORD_MGID.to_string(), Value::from(RECORD_MGID_VALUE));

    Record::from_map(record)
}

/// Partitions raw items by their string source name, preserving arrival order
/// within each group. Items without one fall under `default_ipname`.
#[must_use]
pub fn group_by_ipname(
    data_items: Vec<Value>,
    default_ipname: &str,
) -> BTreeMap<String, Vec<Value>> {
    let mut groups: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for item in data_items {
        let ipname = item
            .get(DI_KEY_IPNAME)
            .and_then(Value::as_str)
            .unwrap_or(default_ipname)
            .to_string();
        groups.entry(ipname).or_default().push(item);
    }
    groups
}
