//! chatlog - question/answer history as markdown files
//!
//! Each turn is persisted as one markdown document whose filename encodes
//! the instant it was written (`YYYYMMDD_HHMMSS_ffffff_message.md`, UTC).
//! Listing scans the directory, filters by that instant and parses the
//! question, answer and title back out of the document.
//!
//! ## Key Concepts
//!
//! - **Filename is the index**: no database, ordering and range queries come
//!   from the encoded timestamp
//! - **Marker headings**: level-1 `# Pergunta` / `# Resposta` delimit the
//!   two sections; user headings are demoted one level on write
//! - **Lenient reads**: malformed or foreign files in the directory are
//!   skipped, never fatal

pub mod cli;
pub mod config;
pub mod core;
pub mod mcp;
pub mod service;

pub use core::{
    list_records, save_turn, ConversationTurn, DateRange, HistoryStore, Markers, StoreError,
    StoredRecord,
};
pub use mcp::run_mcp_server;
pub use service::{Answer, Answerer, ServiceClient};
