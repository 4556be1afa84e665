// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The envelope sent to the backend for one batch of data items.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::{RECORD_DATAITEMS, RECORD_IPNAME, RECORD_MGID};

/// A serialized batch of data items plus routing metadata.
///
/// Records are built by [`crate::diag::create_diag_record`] and are read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `DataItems` list.
    #[must_use]
    pub fn data_items(&self) -> Option<&Vec<Value>> {
        self.0.get(RECORD_DATAITEMS).and_then(Value::as_array)
    }

    /// The `IPName` this record was built for.
    #[must_use]
    pub fn ipname(&self) -> Option<&str> {
        self.0.get(RECORD_IPNAME).and_then(Value::as_str)
    }

    /// The fixed `ManagementGroupId`.
    #[must_use]
    pub fn management_group_id(&self) -> Option<&str> {
        self.0.get(RECORD_MGID).and_then(Value::as_str)
    }

    /// Borrows the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the record, returning it as a JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
