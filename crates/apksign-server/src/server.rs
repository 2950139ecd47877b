//! Stdio JSON-RPC server loop.
//!
//! Reads newline-delimited JSON-RPC 2.0 requests from stdin and writes
//! responses to stdout, one per line. Requests are handled sequentially to
//! completion; there is no shared mutable state between them. stdout
//! belongs to the protocol, so all logging goes to stderr.

use anyhow::Context;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use apksign_core::config::Config;
use apksign_core::tools::ToolRouter;

/// MCP protocol version supported.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Stdio MCP server for the apksign tool catalog.
pub struct McpServer {
    config: Config,
    router: ToolRouter,
}

impl McpServer {
    pub fn new(config: Config) -> Self {
        let router = ToolRouter::new(&config);
        Self { config, router }
    }

    /// Serves requests from stdin until EOF.
    pub async fn run_stdio(&self) -> anyhow::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut lines = stdin.lines();

        tracing::info!(
            "{} {} listening on stdio",
            self.config.server.name,
            self.config.server.version
        );

        while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Value>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => Some(rpc_error(Value::Null, -32700, format!("parse error: {e}"))),
            };

            if let Some(response) = response {
                let mut encoded =
                    serde_json::to_vec(&response).context("failed to encode response")?;
                encoded.push(b'\n');
                stdout
                    .write_all(&encoded)
                    .await
                    .context("failed to write stdout")?;
                stdout.flush().await.context("failed to flush stdout")?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Routes a JSON-RPC request to the matching handler.
    ///
    /// Returns `None` for notifications, which take no response.
    pub async fn handle_request(&self, request: Value) -> Option<Value> {
        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let Some(method) = request.get("method").and_then(|m| m.as_str()) else {
            return Some(rpc_error(id, -32600, "missing method"));
        };
        let params = request
            .get("params")
            .cloned()
            .unwrap_or_else(|| json!({}));

        match method {
            "initialize" => Some(self.handle_initialize(id)),
            "tools/list" => Some(ok_result(
                id,
                json!({ "tools": self.router.list_tools() }),
            )),
            "tools/call" => Some(self.handle_tools_call(id, &params).await),
            "ping" => Some(ok_result(id, json!({}))),
            m if m.starts_with("notifications/") => None,
            "initialized" => None,
            _ => Some(rpc_error(id, -32601, format!("method not found: {method}"))),
        }
    }

    fn handle_initialize(&self, id: Value) -> Value {
        ok_result(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": self.config.server.name,
                    "version": self.config.server.version
                }
            }),
        )
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> Value {
        let Some(name) = params.get("name").and_then(|n| n.as_str()) else {
            return rpc_error(id, -32602, "missing tool name");
        };
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let response = self.router.call_tool(name, arguments).await;
        match serde_json::to_value(&response) {
            Ok(result) => ok_result(id, result),
            Err(e) => rpc_error(id, -32603, format!("failed to encode result: {e}")),
        }
    }
}

fn ok_result(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

fn rpc_error(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into()
        }
    })
}
