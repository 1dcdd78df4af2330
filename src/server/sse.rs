/*!
 * HTTP transport using server-sent events.
 *
 * A client opens the event stream at the configured path and receives an
 * `endpoint` event naming the URL to POST its JSON-RPC messages to. Each
 * posted message is answered with `202 Accepted`, and the JSON-RPC response
 * arrives later as a `message` event on that client's stream.
 */

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures_util::{StreamExt, future, stream};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::protocol::JsonRpcResponse;
use super::transport::{RESPONSE_QUEUE_SIZE, ToolServer};

/// Path clients POST their messages to
pub const MESSAGES_PATH: &str = "/messages/";

type SessionMap = HashMap<String, mpsc::Sender<JsonRpcResponse>>;

/// Open event streams, keyed by session id
#[derive(Debug, Clone, Default)]
pub struct SseSessions {
    inner: Arc<Mutex<SessionMap>>,
}

impl SseSessions {
    fn open(&self) -> (String, mpsc::Receiver<JsonRpcResponse>, SessionGuard) {
        let id = Uuid::new_v4().simple().to_string();
        let (tx, rx) = mpsc::channel(RESPONSE_QUEUE_SIZE);
        self.inner.lock().insert(id.clone(), tx);

        let guard = SessionGuard {
            id: id.clone(),
            sessions: self.clone(),
        };
        (id, rx, guard)
    }

    fn sender(&self, id: &str) -> Option<mpsc::Sender<JsonRpcResponse>> {
        self.inner.lock().get(id).cloned()
    }

    /// Number of connected clients
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

// Removes the session once its event stream is dropped
#[derive(Debug)]
struct SessionGuard {
    id: String,
    sessions: SseSessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.inner.lock().remove(&self.id);
        debug!("SSE session {} closed", self.id);
    }
}

#[derive(Debug, Clone)]
struct SseState {
    server: Arc<ToolServer>,
    sessions: SseSessions,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: Option<String>,
}

/// Build the router serving the event stream at `sse_path` and messages at [`MESSAGES_PATH`]
pub fn router(server: Arc<ToolServer>, sse_path: &str, sessions: SseSessions) -> Router {
    Router::new()
        .route(sse_path, get(open_stream))
        .route(MESSAGES_PATH, post(post_message))
        .with_state(SseState { server, sessions })
}

impl ToolServer {
    /// Serve over HTTP with server-sent events on the configured host, port and path
    pub async fn serve_sse(self: Arc<Self>) -> Result<()> {
        let config = &self.registry().controller().config().server;
        let (host, port) = (config.sse_host.clone(), config.sse_port);

        let listener = TcpListener::bind((host.as_str(), port))
            .await
            .with_context(|| format!("Failed to bind SSE server to {}:{}", host, port))?;

        self.serve_sse_on(listener, SseSessions::default()).await
    }

    /// Serve over HTTP with server-sent events on an already bound listener
    pub async fn serve_sse_on(self: Arc<Self>, listener: TcpListener, sessions: SseSessions) -> Result<()> {
        let config = self.registry().controller().config();
        let sse_path = config.server.sse_path.clone();
        let address = listener.local_addr().context("Failed to read SSE listener address")?;
        info!(
            "Starting {} v{} on http://{}{}",
            config.server.name, config.server.version, address, sse_path
        );

        let app = router(Arc::clone(&self), &sse_path, sessions);
        axum::serve(listener, app).await.context("SSE server failed")?;
        info!("SSE server stopped");
        Ok(())
    }
}

async fn open_stream(State(state): State<SseState>) -> Response {
    let (session_id, rx, guard) = state.sessions.open();
    info!("SSE session {} opened", session_id);

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?session_id={}", MESSAGES_PATH, session_id));

    // The guard travels with the stream so the session ends when the client disconnects
    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let response = rx.recv().await?;
        let event = Event::default()
            .event("message")
            .data(serde_json::to_string(&response).unwrap_or_default());
        Some((Ok::<_, Infallible>(event), (rx, guard)))
    });

    let events = stream::once(future::ready(Ok::<_, Infallible>(endpoint))).chain(messages);
    Sse::new(events).keep_alive(KeepAlive::default()).into_response()
}

async fn post_message(State(state): State<SseState>, Query(query): Query<SessionQuery>, body: String) -> Response {
    let Some(session_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "Missing session_id").into_response();
    };

    let Some(tx) = state.sessions.sender(&session_id) else {
        warn!("Message for unknown SSE session {}", session_id);
        return (StatusCode::NOT_FOUND, "Unknown session").into_response();
    };

    let server = Arc::clone(&state.server);
    tokio::spawn(async move {
        if let Some(response) = server.handle_message(&body).await {
            if tx.send(response).await.is_err() {
                warn!("Response dropped: SSE session {} has closed", session_id);
            }
        }
    });

    StatusCode::ACCEPTED.into_response()
}
