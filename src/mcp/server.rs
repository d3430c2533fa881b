//! MCP server over stdio
//!
//! One JSON-RPC message per line in, one response per line out. Logging
//! goes to stderr so stdout stays a clean protocol channel.

use std::io::{BufRead, BufReader, Write};

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::jsonrpc::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR,
};
use super::tools::{HistoryGetTool, HistoryListTool, HistorySaveTool};
use crate::core::{ConversationTurn, DateRange, HistoryStore, Markers, StoredRecord};

const PROTOCOL_VERSION: &str = "2024-11-05";

type RpcResult = Result<Value, (i64, String)>;

/// MCP handler bound to one history directory
pub struct HistoryMcpServer {
    store: HistoryStore,
    initialized: bool,
}

impl HistoryMcpServer {
    pub fn new(store: HistoryStore) -> Self {
        Self {
            store,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Dispatch one request. Notifications yield `None`.
    pub fn handle_request(&mut self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            match request.method.as_str() {
                "notifications/initialized" => {
                    self.initialized = true;
                    info!("MCP client initialized");
                }
                other => debug!(method = other, "Ignoring notification"),
            }
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "tools/list" => Ok(tool_catalog()),
            "tools/call" => self.call_tool(&request.params),
            "ping" => Ok(json!({})),
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err((code, message)) => JsonRpcResponse::error(id, code, message),
        })
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": {
                "name": "chatlog",
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": "chatlog keeps question/answer turns as markdown files. Use history_list to see recent turns, history_get to read one, history_save to record a new one."
        })
    }

    fn call_tool(&mut self, params: &Value) -> RpcResult {
        let name = params["name"]
            .as_str()
            .ok_or((INVALID_PARAMS, "Missing tool name".to_string()))?;
        let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let outcome = match name {
            "history_list" => self.history_list(args),
            "history_get" => self.history_get(args),
            "history_save" => self.history_save(args),
            _ => return Err((INVALID_PARAMS, format!("Unknown tool: {}", name))),
        };

        Ok(match outcome {
            Ok(text) => json!({ "content": [{ "type": "text", "text": text }] }),
            Err(e) => {
                warn!(tool = name, error = %e, "Tool call failed");
                json!({
                    "content": [{ "type": "text", "text": format!("Error: {}", e) }],
                    "isError": true
                })
            }
        })
    }

    fn history_list(&self, args: Value) -> Result<String, String> {
        let args: HistoryListTool =
            serde_json::from_value(args).map_err(|e| format!("Invalid params: {}", e))?;
        let range = DateRange::parse(args.start.as_deref(), args.end.as_deref())
            .map_err(|e| e.to_string())?;

        let records = self.store.list_records(&range).map_err(|e| e.to_string())?;
        if records.is_empty() {
            return Ok("No turns recorded in this range.".to_string());
        }

        let shown = records.len().min(args.limit);
        let mut out = format!("{} turn(s), showing {}:\n\n", records.len(), shown);
        for record in records.iter().take(args.limit) {
            out.push_str(&format!(
                "- {} | {} | {}\n",
                record.timestamp.to_rfc3339(),
                record.filename,
                record.title
            ));
        }
        Ok(out)
    }

    fn history_get(&self, args: Value) -> Result<String, String> {
        let args: HistoryGetTool =
            serde_json::from_value(args).map_err(|e| format!("Invalid params: {}", e))?;
        let record = self.store.get(&args.filename).map_err(|e| e.to_string())?;
        Ok(render_record(&record, self.store.markers()))
    }

    fn history_save(&mut self, args: Value) -> Result<String, String> {
        let args: HistorySaveTool =
            serde_json::from_value(args).map_err(|e| format!("Invalid params: {}", e))?;

        let mut turn = ConversationTurn::new(args.question, args.answer).with_sources(args.sources);
        if let Some(title) = args.title.filter(|t| !t.trim().is_empty()) {
            turn = turn.with_title(title);
        }

        let filename = self.store.save_turn(&turn).map_err(|e| e.to_string())?;
        Ok(format!("Saved {}", filename))
    }
}

fn render_record(record: &StoredRecord, markers: &Markers) -> String {
    let mut out = format!(
        "# {}\n\n**File:** {}\n**Recorded:** {}\n\n## {}\n\n{}\n\n## {}\n\n{}\n",
        record.title,
        record.filename,
        record.timestamp.to_rfc3339(),
        markers.question,
        record.question,
        markers.answer,
        record.answer
    );
    if !record.sources.is_empty() {
        out.push_str("\n## Sources\n\n");
        for source in &record.sources {
            out.push_str(&format!("- {}\n", source));
        }
    }
    out
}

fn tool_catalog() -> Value {
    json!({
        "tools": [
            {
                "name": "history_list",
                "description": "List recorded question/answer turns, newest first. Bounds are inclusive and accept RFC 3339 or YYYY-MM-DD. Example: history_list({\"start\": \"2024-01-01\", \"limit\": 5})",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "start": { "type": "string", "description": "Earliest instant or date to include" },
                        "end": { "type": "string", "description": "Latest instant or date to include" },
                        "limit": { "type": "integer", "description": "Max turns (default: 20)", "default": 20 }
                    }
                }
            },
            {
                "name": "history_get",
                "description": "Read one recorded turn by filename, as returned by history_list.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "filename": { "type": "string", "description": "Record filename, e.g. 20240115_143022_123456_message.md" }
                    },
                    "required": ["filename"]
                }
            },
            {
                "name": "history_save",
                "description": "Record a question/answer turn. Markdown headings inside the texts are demoted one level.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "answer": { "type": "string" },
                        "title": { "type": "string", "description": "Optional title heading" },
                        "sources": { "type": "array", "items": { "type": "string" }, "description": "Documents the answer drew from" }
                    },
                    "required": ["question", "answer"]
                }
            }
        ]
    })
}

/// Serve MCP on stdin/stdout until stdin closes
pub fn run_mcp_server(store: HistoryStore) -> anyhow::Result<()> {
    info!(dir = %store.dir().display(), "MCP server starting");

    let mut server = HistoryMcpServer::new(store);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    for line in BufReader::new(stdin.lock()).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        debug!(len = line.len(), "MCP request received");

        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(request) => server.handle_request(&request),
            Err(e) => Some(JsonRpcResponse::error(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            )),
        };

        if let Some(response) = response {
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }
    }

    info!("MCP server stopping");
    Ok(())
}
