/*!
 * Tool server exposing the summarizer over JSON-RPC, on stdio or over HTTP
 * with server-sent events.
 *
 * - `protocol`: request, response and tool result types
 * - `tools`: tool catalogue and dispatch to the controller
 * - `rate_limit`: sliding window limit on tool calls
 * - `transport`: line-delimited stdio loop
 * - `sse`: HTTP event stream plus message endpoint
 */

pub mod protocol;
pub mod rate_limit;
pub mod sse;
pub mod tools;
pub mod transport;

pub use protocol::{CallToolParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolDefinition, ToolResult};
pub use rate_limit::RateLimiter;
pub use sse::SseSessions;
pub use tools::ToolRegistry;
pub use transport::ToolServer;
