/*!
 * Newline-delimited JSON-RPC transport.
 *
 * Each incoming line is handled on its own task so a slow transcript fetch
 * does not hold up other requests. Responses are funnelled through a single
 * writer task, which keeps lines on stdout whole.
 */

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::app_controller::Controller;
use crate::errors::ToolError;

use super::protocol::{
    CallToolParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, RATE_LIMITED,
};
use super::tools::ToolRegistry;

// Responses waiting for the writer
pub(crate) const RESPONSE_QUEUE_SIZE: usize = 64;

/// JSON-RPC tool server
#[derive(Debug)]
pub struct ToolServer {
    registry: ToolRegistry,
}

impl ToolServer {
    pub fn new(controller: Controller) -> Self {
        Self {
            registry: ToolRegistry::new(controller),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve requests on stdin and stdout until stdin closes
    pub async fn serve_stdio(self: Arc<Self>) -> Result<()> {
        let config = self.registry.controller().config();
        info!("Starting {} v{} on stdio", config.server.name, config.server.version);

        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
    }

    /// Serve requests read from `reader`, writing responses to `writer`
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<JsonRpcResponse>(RESPONSE_QUEUE_SIZE);
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await.context("Failed to read request line")? {
            if line.trim().is_empty() {
                continue;
            }

            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_message(&line).await {
                    if tx.send(response).await.is_err() {
                        warn!("Response dropped: writer has stopped");
                    }
                }
            });
        }

        // The writer drains until every in-flight handler has dropped its sender
        debug!("Input closed, draining in-flight requests");
        drop(tx);
        writer_task.await.context("Response writer task failed")??;
        info!("Tool server stopped");
        Ok(())
    }

    /// Handle one raw message, returning the response if one is due
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ));
            }
        };

        // Keep the id if there is one, even when the rest is malformed
        let fallback_id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    fallback_id,
                    JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e)),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                fallback_id,
                JsonRpcError::new(INVALID_REQUEST, format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
            ));
        }

        self.handle_request(request).await
    }

    /// Dispatch a parsed request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Received '{}'", request.method);

        if request.is_notification() {
            if !request.method.starts_with("notifications/") {
                warn!("Ignoring notification for unknown method '{}'", request.method);
            }
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.definitions() })),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::new(METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::failure(id, e),
        })
    }

    fn initialize_result(&self) -> Value {
        let config = self.registry.controller().config();
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": { "name": config.server.name, "version": config.server.version },
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::new(INVALID_PARAMS, "Missing params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))
            })?;

        let result = self.registry.call(params).await.map_err(|e| match &e {
            ToolError::RateLimited { retry_after_secs } => JsonRpcError::new(RATE_LIMITED, e.to_string())
                .with_data(json!({ "retry_after_secs": *retry_after_secs })),
            ToolError::UnknownTool(_) | ToolError::InvalidArguments(_) => {
                JsonRpcError::new(INVALID_PARAMS, e.to_string())
            }
        })?;

        serde_json::to_value(result)
            .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, format!("Failed to encode result: {}", e)))
    }
}

async fn write_responses<W>(mut rx: mpsc::Receiver<JsonRpcResponse>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_string(&response).context("Failed to encode response")?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await.context("Failed to write response")?;
        writer.flush().await.context("Failed to flush response")?;
    }
    writer.shutdown().await.context("Failed to close response stream")?;
    Ok(())
}
