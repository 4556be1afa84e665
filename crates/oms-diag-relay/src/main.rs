// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::process::ExitCode;

use serde_json::Value;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use oms_diag::{
    config,
    diag::{create_diag_record, group_by_ipname, process_data_items_post_aggregation},
    logger::Formatter,
};

#[tokio::main]
pub async fn main() -> ExitCode {
    let config = match config::get_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading diagnostics relay configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter = match EnvFilter::try_new(&config.log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Could not parse log level {:?}: {e}", config.log_level);
            return ExitCode::FAILURE;
        }
    };

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .event_format(Formatter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }

    debug!("Logging subsystem enabled");

    let agent_id = match config.resolve_agent_id() {
        Ok(id) => id,
        Err(e) => {
            error!("Unable to resolve agent id, shutting down relay: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    match relay(stdin, &mut stdout, &agent_id, &config.default_ipname).await {
        Ok(records) => {
            info!("Wrote {records} diagnostic records");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Diagnostics relay failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Reads one JSON data item per line from `reader` and writes one record per
/// source name to `writer`. Items without a source name are grouped under
/// `default_ipname`. Lines that are not valid JSON are skipped. Returns the
/// number of records written.
async fn relay<R, W>(
    mut reader: R,
    writer: &mut W,
    agent_id: &str,
    default_ipname: &str,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut items = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_number += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!("Skipping non UTF-8 line {line_number}: {e}");
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(item) => items.push(item),
            Err(e) => warn!("Skipping unparsable line {line_number}: {e}"),
        }
    }

    let mut records = 0;
    for (ipname, mut group) in group_by_ipname(items, default_ipname) {
        process_data_items_post_aggregation(&mut group, agent_id);
        if group.is_empty() {
            debug!("No valid data items left for {ipname}, skipping record");
            continue;
        }

        let record = create_diag_record(group, &ipname, None);
        let mut serialized = serde_json::to_vec(&record)?;
        serialized.push(b'\n');
        writer.write_all(&serialized).await?;
        records += 1;
    }
    writer.flush().await?;

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oms_diag::constants::{DEFAULT_IPNAME, RECORD_MGID_VALUE};
    use serde_json::json;

    async fn run_bytes(input: &[u8]) -> (usize, Vec<Value>) {
        let mut output = Vec::new();
        let records = relay(input, &mut output, "agent-guid", DEFAULT_IPNAME)
            .await
            .expect("relay failed");

        let parsed = String::from_utf8(output)
            .expect("utf8")
            .lines()
            .map(|line| serde_json::from_str(line).expect("record json"))
            .collect();
        (records, parsed)
    }

    async fn run(input: &str) -> (usize, Vec<Value>) {
        run_bytes(input.as_bytes()).await
    }

    #[tokio::test]
    async fn test_groups_items_into_records() {
        let input = concat!(
            r#"{"LogData":"a1","IPName":"A","time":"2024-01-02T03:04:05.000001Z"}"#,
            "\n",
            r#"{"LogData":"b1","IPName":"B","time":"2024-01-02T03:04:05.000002Z"}"#,
            "\n\n",
            r#"{"LogData":"a2","IPName":"A","time":"2024-01-02T03:04:05.000003Z"}"#,
            "\n",
        );

        let (count, records) = run(input).await;
        assert_eq!(count, 2);
        assert_eq!(
            records[0],
            json!({
                "DataItems": [
                    {
                        "LogData": "a1",
                        "time": "2024-01-02T03:04:05.000001Z",
                        "type": "JsonData",
                        "sourceHealthServiceId": "agent-guid",
                    },
                    {
                        "LogData": "a2",
                        "time": "2024-01-02T03:04:05.000003Z",
                        "type": "JsonData",
                        "sourceHealthServiceId": "agent-guid",
                    },
                ],
                "IPName": "A",
                "ManagementGroupId": RECORD_MGID_VALUE,
            })
        );
        assert_eq!(records[1]["IPName"], json!("B"));
    }

    #[tokio::test]
    async fn test_skips_garbage_and_invalid_items() {
        let input = concat!(
            "not json\n",
            r#"{"LogData":"missing time","IPName":"A"}"#,
            "\n",
            r#"{"LogData":"ok","IPName":"B","time":"2024-01-02T03:04:05.000000Z"}"#,
            "\n",
        );

        let (count, records) = run(input).await;
        assert_eq!(count, 1);
        assert_eq!(records[0]["IPName"], json!("B"));
        assert_eq!(records[0]["DataItems"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_empty_input_writes_nothing() {
        let (count, records) = run("").await;
        assert_eq!(count, 0);
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_skipped() {
        let mut input = Vec::new();
        input.extend_from_slice(
            br#"{"LogData":"before","IPName":"A","time":"2024-01-02T03:04:05.000001Z"}"#,
        );
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(
            br#"{"LogData":"after","IPName":"A","time":"2024-01-02T03:04:05.000002Z"}"#,
        );
        input.push(b'\n');

        let (count, records) = run_bytes(&input).await;
        assert_eq!(count, 1);
        let items = records[0]["DataItems"].as_array().expect("array");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["LogData"], json!("before"));
        assert_eq!(items[1]["LogData"], json!("after"));
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_read() {
        let input = r#"{"LogData":"tail","IPName":"A","time":"2024-01-02T03:04:05.000001Z"}"#;
        let (count, records) = run(input).await;
        assert_eq!(count, 1);
        assert_eq!(records[0]["DataItems"][0]["LogData"], json!("tail"));
    }
}
