//! MCP (Model Context Protocol) Server
//!
//! Exposes the history directory via MCP tools for AI integration.
//!
//! # Tools
//! - `history_list` - List turns, newest first, optionally by date range
//! - `history_get` - Get one turn by filename
//! - `history_save` - Record a new question/answer turn

mod jsonrpc;
mod server;
mod tools;

pub use server::{run_mcp_server, HistoryMcpServer};
