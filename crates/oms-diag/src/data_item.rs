// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! A single diagnostic log entry.
//!
//! A [`DataItem`] is an open key/value bag serialized as a JSON object. Plugins
//! may attach any extra properties; the keys in [`crate::constants`] carry the
//! fields the backend relies on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{
    DI_KEY_AGENTGUID, DI_KEY_IPNAME, DI_KEY_LOGMESSAGE, DI_KEY_TIME, DI_KEY_TYPE, DI_TYPE_JSON,
};

/// One diagnostic log entry, serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataItem(Map<String, Value>);

impl DataItem {
    /// Creates an empty item.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if `key` is present, whatever its value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copies every pair of `properties` into the item, overwriting existing keys.
    pub fn merge(&mut self, properties: &Map<String, Value>) {
        for (key, value) in properties {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Number of keys in the item.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the item holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `LogData` message, if it is a string.
    #[must_use]
    pub fn log_message(&self) -> Option<&str> {
        self.get_str(DI_KEY_LOGMESSAGE)
    }

    /// The `IPName` source name, if it is a string.
    #[must_use]
    pub fn ipname(&self) -> Option<&str> {
        self.get_str(DI_KEY_IPNAME)
    }

    /// The formatted `time` stamp, if it is a string.
    #[must_use]
    pub fn time(&self) -> Option<&str> {
        self.get_str(DI_KEY_TIME)
    }

    /// The `type` tag, set during post-aggregation.
    #[must_use]
    pub fn item_type(&self) -> Option<&str> {
        self.get_str(DI_KEY_TYPE)
    }

    /// The agent id, set during post-aggregation.
    #[must_use]
    pub fn agent_id(&self) -> Option<&str> {
        self.get_str(DI_KEY_AGENTGUID)
    }

    /// Returns true when the log message, source name and timestamp are all
    /// present and hold strings.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_map(&self.0)
    }

    /// Prepares the item for serialization: drops the source name and stamps
    /// the type tag and `agent_id`.
    pub fn finalize(&mut self, agent_id: &str) {
        finalize_map(&mut self.0, agent_id);
    }

    /// Borrows the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the item, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for DataItem {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<DataItem> for Value {
    fn from(item: DataItem) -> Self {
        Value::Object(item.0)
    }
}

impl TryFrom<Value> for DataItem {
    type Error = Value;

    /// Accepts JSON objects only; any other value is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

/// Validity check for items that may not be objects at all.
#[must_use]
pub fn is_valid_value(value: &Value) -> bool {
    value.as_object().is_some_and(is_valid_map)
}

fn is_valid_map(map: &Map<String, Value>) -> bool {
    [DI_KEY_LOGMESSAGE, DI_KEY_IPNAME, DI_KEY_TIME]
        .iter()
        .all(|key| map.get(*key).is_some_and(Value::is_string))
}

pub(crate) fn finalize_map(map: &mut Map<String, Value>, agent_id: &str) {
    map.remove(DI_KEY_IPNAME);
    map.insert(DI_KEY_TYPE.to_string(), Value::from(DI_TYPE_JSON));
    map.insert(DI_KEY_AGENTGUID.to_string(), Value::from(agent_id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_item() -> DataItem {
        DataItem::try_from(json!({
            "LogData": "disk almost full",
            "IPName": "Diagnostics",
            "time": "2024-01-02T03:04:05.678901Z",
        }))
        .expect("object")
    }

    #[test]
    fn test_valid_item() {
        let item = valid_item();
        assert!(item.is_valid());
        assert_eq!(item.log_message(), Some("disk almost full"));
        assert_eq!(item.ipname(), Some("Diagnostics"));
        assert_eq!(item.time(), Some("2024-01-02T03:04:05.678901Z"));
        assert_eq!(item.agent_id(), None);
    }

    #[test]
    fn test_missing_time_is_invalid() {
        let mut item = valid_item();
        item.remove(DI_KEY_TIME);
        assert!(!item.is_valid());
    }

    #[test]
    fn test_non_string_time_is_invalid() {
        let mut item = valid_item();
        item.insert(DI_KEY_TIME, 1_704_164_645);
        assert!(!item.is_valid());
    }

    #[test]
    fn test_missing_ipname_is_invalid() {
        let mut item = valid_item();
        item.remove(DI_KEY_IPNAME);
        assert!(!item.is_valid());
    }

    #[test]
    fn test_non_string_message_is_invalid() {
        let mut item = valid_item();
        item.insert(DI_KEY_LOGMESSAGE, json!(["not", "a", "string"]));
        assert!(!item.is_valid());
    }

    #[test]
    fn test_non_object_values_are_invalid() {
        assert!(!is_valid_value(&json!("LogData")));
        assert!(!is_valid_value(&json!(null)));
        assert!(!is_valid_value(&json!([{"LogData": "x"}])));
        assert!(is_valid_value(&Value::from(valid_item())));
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        let rejected = DataItem::try_from(json!(42)).unwrap_err();
        assert_eq!(rejected, json!(42));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut item = DataItem::new();
        item.insert("LogData", "hello");
        let serialized = serde_json::to_string(&item).expect("serialize");
        assert_eq!(serialized, r#"{"LogData":"hello"}"#);
    }

    #[test]
    fn test_merge_overwrites_existing_keys() {
        let mut item = valid_item();
        let extras = json!({"LogData": "replaced", "Component": "in_tail"});
        item.merge(extras.as_object().expect("object"));
        assert_eq!(item.log_message(), Some("replaced"));
        assert_eq!(item.get("Component"), Some(&json!("in_tail")));
    }

    #[test]
    fn test_finalize_matches_raw_map_path() {
        let mut typed = valid_item();
        typed.insert(DI_KEY_TYPE, "System.PropertyBagData");
        let mut raw = typed.clone().into_inner();

        typed.finalize("agent-guid");
        finalize_map(&mut raw, "agent-guid");

        assert_eq!(typed.as_map(), &raw);
        assert_eq!(typed.ipname(), None);
        assert_eq!(typed.item_type(), Some(DI_TYPE_JSON));
        assert_eq!(typed.agent_id(), Some("agent-guid"));
        assert_eq!(typed.log_message(), Some("disk almost full"));
    }
}
