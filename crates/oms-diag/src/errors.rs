// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Errors returned when handing a data item to the host.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Event channel closed, dropping item tagged {0}")]
    ChannelClosed(String),
}

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Extract(#[from] figment::Error),

    #[error("Failed to read agent configuration {path}: {source}")]
    AgentIdFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No agent id configured and none found in {0}")]
    MissingAgentId(PathBuf),
}
