// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Configuration loaded from `OMS_DIAG_*` environment variables.
//!
//! | Variable                   | Default                                          |
//! |----------------------------|--------------------------------------------------|
//! | `OMS_DIAG_LOG_LEVEL`       | `info`                                           |
//! | `OMS_DIAG_DEFAULT_TAG`     | `diag.oms`                                       |
//! | `OMS_DIAG_DEFAULT_IPNAME`  | `Diagnostics`                                    |
//! | `OMS_DIAG_AGENT_ID`        | unset, read from the admin conf file             |
//! | `OMS_DIAG_ADMIN_CONF_PATH` | `/etc/opt/microsoft/omsagent/conf/omsadmin.conf` |

use std::fs;
use std::path::{Path, PathBuf};

use figment::{providers::Env, Figment};
use serde::Deserialize;
use tracing::debug;

use crate::constants::{DEFAULT_IPNAME, DEFAULT_TAG};
use crate::diag::DiagDefaults;
use crate::errors::ConfigError;

pub const ENV_PREFIX: &str = "OMS_DIAG_";
pub const DEFAULT_ADMIN_CONF_PATH: &str = "/etc/opt/microsoft/omsagent/conf/omsadmin.conf";

/// Key holding the agent id in the admin conf file.
const AGENT_GUID_KEY: &str = "AGENT_GUID";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagConfig {
    /// `EnvFilter` directive for the relay's own logs.
    pub log_level: String,
    /// Tag used by [`crate::diag::log_diag_with_defaults`] when none is given.
    pub default_tag: String,
    /// Source name used when an item does not carry one.
    pub default_ipname: String,
    pub agent_id: Option<String>,
    pub admin_conf_path: PathBuf,
}

impl Default for DiagConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_tag: DEFAULT_TAG.to_string(),
            default_ipname: DEFAULT_IPNAME.to_string(),
            agent_id: None,
            admin_conf_path: PathBuf::from(DEFAULT_ADMIN_CONF_PATH),
        }
    }
}

impl DiagConfig {
    /// Fallbacks for [`crate::diag::log_diag_with_defaults`] and
    /// [`crate::diag::group_by_ipname`].
    #[must_use]
    pub fn defaults(&self) -> DiagDefaults<'_> {
        DiagDefaults {
            tag: &self.default_tag,
            ipname: &self.default_ipname,
        }
    }

    /// Returns the configured agent id, falling back to `AGENT_GUID` in the
    /// admin conf file.
    pub fn resolve_agent_id(&self) -> Result<String, ConfigError> {
        if let Some(agent_id) = self.agent_id.as_deref().filter(|id| !id.trim().is_empty()) {
            return Ok(agent_id.trim().to_string());
        }
        read_agent_id(&self.admin_conf_path)
    }
}

/// Loads configuration from `OMS_DIAG_*` environment variables.
pub fn get_config() -> Result<DiagConfig, ConfigError> {
    let config: DiagConfig = Figment::new()
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?;
    debug!("Loaded diagnostics configuration: {config:?}");
    Ok(config)
}

/// Reads the agent id from a `KEY=VALUE` file such as `omsadmin.conf`.
pub fn read_agent_id(path: &Path) -> Result<String, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::AgentIdFile {
        path: path.to_path_buf(),
        source,
    })?;

    contents
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == AGENT_GUID_KEY)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingAgentId(path.to_path_buf()))
}
