// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Key names and fixed values shared by data items and records.

/// Source name used when a caller does not provide one.
pub const DEFAULT_IPNAME: &str = "Diagnostics";

/// Tag used to emit diagnostic items when a caller does not provide one.
pub const DEFAULT_TAG: &str = "diag.oms";

// Data item keys
/// Log message text.
pub const DI_KEY_LOGMESSAGE: &str = "LogData";
/// Source name; removed before transmission.
pub const DI_KEY_IPNAME: &str = "IPName";
/// Data item type tag.
pub const DI_KEY_TYPE: &str = "type";
/// Timestamp formatted with [`TIME_FORMAT`].
pub const DI_KEY_TIME: &str = "time";
/// Agent id, stamped during post-aggregation.
pub const DI_KEY_AGENTGUID: &str = "sourceHealthServiceId";

// Data item type values
/// Property bag type, not produced by this crate.
pub const DI_TYPE_XML: &str = "System.PropertyBagData";
/// Type stamped on every outgoing data item.
pub const DI_TYPE_JSON: &str = "JsonData";

// Record keys
/// List of data items.
pub const RECORD_DATAITEMS: &str = "DataItems";
/// Source name the record was built for.
pub const RECORD_IPNAME: &str = "IPName";
/// Management group id.
pub const RECORD_MGID: &str = "ManagementGroupId";

/// Management group id stamped on every record.
pub const RECORD_MGID_VALUE: &str = "{00000000-0000-0000-0000-000000000002}";

/// ISO-8601 UTC with exactly six fractional digits, e.g.
/// `2024-01-02T03:04:05.678901Z`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
