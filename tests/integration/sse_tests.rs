/*!
 * Integration tests for the HTTP transport with server-sent events
 */

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use ytsumm::server::protocol::PARSE_ERROR;
use ytsumm::server::{JsonRpcResponse, SseSessions, ToolResult, ToolServer};

use crate::common::{self, VIDEO_ID};

/// Reads `event:`/`data:` blocks off a streaming response
struct EventReader {
    response: reqwest::Response,
    buffer: String,
}

impl EventReader {
    fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            buffer: String::new(),
        }
    }

    /// Next event carrying data, as (event name, data); keep-alive comments are skipped
    async fn next_event(&mut self) -> Result<(String, String)> {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let block: String = self.buffer.drain(..end + 2).collect();
                let mut name = "message".to_string();
                let mut data = Vec::new();
                for line in block.lines() {
                    if let Some(value) = line.strip_prefix("event:") {
                        name = value.trim().to_string();
                    } else if let Some(value) = line.strip_prefix("data:") {
                        data.push(value.trim_start().to_string());
                    }
                }
                if !data.is_empty() {
                    return Ok((name, data.join("\n")));
                }
                continue;
            }

            let chunk = tokio::time::timeout(Duration::from_secs(10), self.response.chunk())
                .await??
                .ok_or_else(|| anyhow!("event stream closed"))?;
            self.buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }

    async fn next_response(&mut self) -> Result<JsonRpcResponse> {
        let (name, data) = self.next_event().await?;
        assert_eq!(name, "message");
        Ok(serde_json::from_str(&data)?)
    }
}

/// Start an SSE server on an ephemeral port, returning its base URL
async fn start_server() -> Result<(String, SseSessions)> {
    let (controller, _provider) = common::mock_controller();
    let server = Arc::new(ToolServer::new(controller));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://{}", listener.local_addr()?);
    let sessions = SseSessions::default();
    tokio::spawn(server.serve_sse_on(listener, sessions.clone()));
    Ok((base, sessions))
}

fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().no_proxy().build()?)
}

/// Open the event stream and return the announced message endpoint
async fn connect(client: &reqwest::Client, base: &str) -> Result<(EventReader, String)> {
    let response = client.get(format!("{}/sse", base)).send().await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"), "content type: {}", content_type);

    let mut events = EventReader::new(response);
    let (name, endpoint) = events.next_event().await?;
    assert_eq!(name, "endpoint");
    Ok((events, endpoint))
}

#[tokio::test]
async fn test_sse_session_shouldAnnounceEndpointAndStreamResponses() -> Result<()> {
    let (base, sessions) = start_server().await?;
    let client = client()?;

    let (mut events, endpoint) = connect(&client, &base).await?;
    assert!(endpoint.starts_with("/messages/?session_id="), "endpoint: {}", endpoint);
    assert_eq!(sessions.len(), 1);

    let url = format!("{}{}", base, endpoint);
    let status = client
        .post(&url)
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}))
        .send()
        .await?
        .status();
    assert_eq!(status, reqwest::StatusCode::ACCEPTED);

    let response = events.next_response().await?;
    assert_eq!(response.id, json!(1));
    let result = response.result.expect("initialize result");
    assert_eq!(result["serverInfo"]["name"], "YouTube Summary MCP");

    client
        .post(&url)
        .json(&json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                      "params": {"name": "summarize_video", "arguments": {"video_url": VIDEO_ID, "summary_length": "long"}}}))
        .send()
        .await?;

    let response = events.next_response().await?;
    assert_eq!(response.id, json!(2));
    let tool_result: ToolResult = serde_json::from_value(response.result.expect("tool result"))?;
    let payload: Value = tool_result.payload().ok_or_else(|| anyhow!("tool result is not JSON"))?;
    assert_eq!(payload["success"], true);
    assert_eq!(payload["video_id"], VIDEO_ID);
    assert_eq!(common::sentences_of(payload["summary"].as_str().unwrap()).len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_sse_post_withGarbage_shouldStreamParseError() -> Result<()> {
    let (base, _sessions) = start_server().await?;
    let client = client()?;
    let (mut events, endpoint) = connect(&client, &base).await?;

    let status = client
        .post(format!("{}{}", base, endpoint))
        .body("{not json")
        .send()
        .await?
        .status();
    assert_eq!(status, reqwest::StatusCode::ACCEPTED);

    let response = events.next_response().await?;
    assert_eq!(response.id, Value::Null);
    assert_eq!(response.error.expect("error").code, PARSE_ERROR);
    Ok(())
}

#[tokio::test]
async fn test_sse_post_withoutKnownSession_shouldBeRejected() -> Result<()> {
    let (base, _sessions) = start_server().await?;
    let client = client()?;
    let ping = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});

    let missing = client.post(format!("{}/messages/", base)).json(&ping).send().await?;
    assert_eq!(missing.status(), reqwest::StatusCode::BAD_REQUEST);

    let unknown = client
        .post(format!("{}/messages/?session_id=nope", base))
        .json(&ping)
        .send()
        .await?;
    assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_sse_sessions_shouldBeIndependent() -> Result<()> {
    let (base, sessions) = start_server().await?;
    let client = client()?;

    let (mut first, first_endpoint) = connect(&client, &base).await?;
    let (mut second, second_endpoint) = connect(&client, &base).await?;
    assert_ne!(first_endpoint, second_endpoint);
    assert_eq!(sessions.len(), 2);

    client
        .post(format!("{}{}", base, second_endpoint))
        .json(&json!({"jsonrpc": "2.0", "id": "b", "method": "ping"}))
        .send()
        .await?;
    client
        .post(format!("{}{}", base, first_endpoint))
        .json(&json!({"jsonrpc": "2.0", "id": "a", "method": "ping"}))
        .send()
        .await?;

    assert_eq!(first.next_response().await?.id, json!("a"));
    assert_eq!(second.next_response().await?.id, json!("b"));
    Ok(())
}
