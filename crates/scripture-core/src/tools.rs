//! Agent tool definitions and dispatch
//!
//! Function-calling schemas for chat agents plus a dispatcher that runs a tool
//! by name against a [`ScriptureService`]. Dispatch never fails: every outcome
//! is a JSON object, with an `error` key when the call could not be served.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::ScriptureError;
use crate::service::ScriptureService;

/// Default result count for keyword searches
pub const DEFAULT_KEYWORD_RESULTS: usize = 10;
/// Default result count for semantic searches
pub const DEFAULT_SEMANTIC_RESULTS: usize = 5;

/// Tool schema in OpenAI function-calling format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionSpec {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

fn bible_id_param() -> Value {
    json!({
        "type": "string",
        "description": "Bible translation ID (only 'BSB' is available)"
    })
}

fn book_filter_param() -> Value {
    json!({
        "type": "string",
        "description": "Optional book name or abbreviation to restrict results (e.g., 'Genesis', 'GEN', 'Gen')"
    })
}

/// Get all tool definitions
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            "get_scripture",
            "Get scripture passage by book, chapter, and verse range. Always returns the full chapter for proper context.",
            json!({
                "type": "object",
                "properties": {
                    "book": {
                        "type": "string",
                        "description": "Bible book name (e.g., 'John', 'Genesis')"
                    },
                    "chapter": { "type": "integer", "description": "Chapter number" },
                    "begin_verse": {
                        "type": "integer",
                        "description": "Starting verse number (optional)"
                    },
                    "end_verse": {
                        "type": "integer",
                        "description": "Ending verse number (optional)"
                    },
                    "bible_id": bible_id_param()
                },
                "required": ["book", "chapter"]
            }),
        ),
        ToolDefinition::function(
            "search_scripture_semantic",
            "Search scripture using TF-IDF semantic search. Returns chapter-level results with similarity scores.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Natural language query combining the concepts to look for"
                    },
                    "book": book_filter_param(),
                    "n_results": {
                        "type": "integer",
                        "description": "Number of results to return (default: 5, max: 20)"
                    },
                    "bible_id": bible_id_param()
                },
                "required": ["query"]
            }),
        ),
        ToolDefinition::function(
            "search_scripture_keyword",
            "Search scripture by keyword or exact phrase. Returns chapters ranked by occurrence count.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Words to count, or double-quoted exact phrases"
                    },
                    "book": book_filter_param(),
                    "n_results": {
                        "type": "integer",
                        "description": "Number of results to return (default: 10, max: 20)"
                    },
                    "bible_id": bible_id_param()
                },
                "required": ["query"]
            }),
        ),
        ToolDefinition::function(
            "list_bible_translations",
            "List available Bible translations (only BSB is offered)",
            json!({ "type": "object", "properties": {} }),
        ),
        ToolDefinition::function(
            "list_bible_books",
            "List the books of the loaded Bible in canonical order",
            json!({ "type": "object", "properties": {} }),
        ),
        ToolDefinition::function(
            "get_scripture_context",
            "Get a chapter together with the previous and next chapters of the same book",
            json!({
                "type": "object",
                "properties": {
                    "book": {
                        "type": "string",
                        "description": "Bible book name (e.g., 'John', 'Genesis')"
                    },
                    "chapter": { "type": "integer", "description": "Chapter number" }
                },
                "required": ["book", "chapter"]
            }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct PassageArgs {
    book: String,
    chapter: u32,
    begin_verse: Option<u32>,
    end_verse: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    book: Option<String>,
    n_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ChapterArgs {
    book: String,
    chapter: u32,
}

/// Run a tool by name. Always returns a JSON object.
pub async fn execute_tool(service: &ScriptureService, name: &str, arguments: Value) -> Value {
    info!("Executing tool {}", name);

    match handle_tool_call(service, name, arguments).await {
        Ok(value) => value,
        Err(ScriptureError::InvalidArgument(msg)) => {
            debug!("Tool {} rejected arguments: {}", name, msg);
            json!({ "error": format!("Tool execution failed: {}", msg) })
        }
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn handle_tool_call(
    service: &ScriptureService,
    name: &str,
    arguments: Value,
) -> Result<Value, ScriptureError> {
    match name {
        "get_scripture" => {
            let args: PassageArgs = parse_args(arguments)?;
            let passage = service
                .get_passage(&args.book, args.chapter, args.begin_verse, args.end_verse)
                .await?;
            to_json(&passage)
        }
        "search_scripture_semantic" => {
            let args: SearchArgs = parse_args(arguments)?;
            let response = service
                .search_semantic(
                    &args.query,
                    args.book.as_deref(),
                    args.n_results.unwrap_or(DEFAULT_SEMANTIC_RESULTS),
                )
                .await;
            to_json(&response)
        }
        "search_scripture_keyword" => {
            let args: SearchArgs = parse_args(arguments)?;
            let response = service
                .search_keyword(
                    &args.query,
                    args.book.as_deref(),
                    args.n_results.unwrap_or(DEFAULT_KEYWORD_RESULTS),
                )
                .await;
            to_json(&response)
        }
        "list_bible_translations" => to_json(&service.list_translations()),
        "list_bible_books" => to_json(&service.list_books().await?),
        "get_scripture_context" => {
            let args: ChapterArgs = parse_args(arguments)?;
            to_json(&service.get_context(&args.book, args.chapter).await?)
        }
        _ => Err(ScriptureError::UnknownTool(name.to_string())),
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ScriptureError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ScriptureError::InvalidArgument(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ScriptureError> {
    serde_json::to_value(value).map_err(|e| ScriptureError::InvalidArgument(e.to_string()))
}
