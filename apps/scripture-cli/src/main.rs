//! Scripture CLI
//!
//! Thin command-line surface over the scripture query façade. Results are
//! printed to stdout as pretty JSON; logs go to stderr so the output can be
//! piped straight into other tools.
//!
//! Configuration comes from `SCRIPTURE_*` environment variables, overridden by
//! the global `--source-url`, `--cache-dir` and `--timeout-secs` flags.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context as _};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scripture_core::reference::is_known_book;
use scripture_core::{
    execute_tool, tool_definitions, ScriptureConfig, ScriptureError, ScriptureService,
};

#[cfg(test)]
mod tests;

/// Command-line arguments for the scripture tool
#[derive(Parser, Debug)]
#[command(name = "scripture")]
#[command(version, about = "Scripture lookup, keyword and semantic search")]
struct Args {
    /// Corpus URL (overrides SCRIPTURE_SOURCE_URL)
    #[arg(long, global = true)]
    source_url: Option<String>,

    /// Directory for the cached corpus text (overrides SCRIPTURE_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Download timeout in seconds (overrides SCRIPTURE_FETCH_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// List books in the order the corpus introduces them
    Books,

    /// Print a full chapter, optionally highlighting a verse range
    Passage {
        book: String,
        chapter: u32,
        /// First highlighted verse
        #[arg(long)]
        begin: Option<u32>,
        /// Last highlighted verse
        #[arg(long)]
        end: Option<u32>,
    },

    /// Print a chapter with its previous and next chapters
    Context { book: String, chapter: u32 },

    /// Rank chapters by keyword occurrences (quote phrases for exact matches)
    Keyword {
        query: String,
        /// Restrict results to one book
        #[arg(long)]
        book: Option<String>,
        /// Number of results (max 20)
        #[arg(short = 'n', long = "n-results", default_value = "10")]
        n_results: usize,
    },

    /// Rank chapters by TF-IDF similarity to a natural-language query
    Semantic {
        query: String,
        /// Restrict results to one book
        #[arg(long)]
        book: Option<String>,
        /// Number of results (max 20)
        #[arg(short = 'n', long = "n-results", default_value = "5")]
        n_results: usize,
    },

    /// List available translations
    Translations,

    /// Print the agent tool schemas
    Tools,

    /// Run an agent tool with JSON arguments
    Tool {
        name: String,
        /// Tool arguments as a JSON object
        arguments: Option<String>,
    },

    /// Load the corpus and print parse statistics
    Index,
}

impl Command {
    fn needs_corpus(&self) -> bool {
        !matches!(self, Command::Translations | Command::Tools)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // stdout carries JSON results only
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = build_config(&args, ScriptureConfig::from_env()?)?;
    let output = run(args.command, &config).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    if output.get("error").is_some() {
        std::process::exit(1);
    }
    Ok(())
}

/// Apply command-line overrides on top of the environment configuration
fn build_config(args: &Args, mut config: ScriptureConfig) -> anyhow::Result<ScriptureConfig> {
    if let Some(url) = &args.source_url {
        config = config.with_source_url(url);
    }
    if let Some(dir) = &args.cache_dir {
        config = config.with_cache_dir(dir.clone());
    }
    if let Some(secs) = args.timeout_secs {
        if secs == 0 {
            bail!("--timeout-secs must be positive");
        }
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

async fn run(command: Command, config: &ScriptureConfig) -> anyhow::Result<Value> {
    let service = ScriptureService::from_config(config)?;
    if command.needs_corpus() && !service.load().await {
        bail!("Failed to load scripture corpus from {}", config.source_url);
    }

    let output = match command {
        Command::Books => render(service.list_books().await)?,
        Command::Passage {
            book,
            chapter,
            begin,
            end,
        } => render(service.get_passage(&book, chapter, begin, end).await)?,
        Command::Context { book, chapter } => render(service.get_context(&book, chapter).await)?,
        Command::Keyword {
            query,
            book,
            n_results,
        } => {
            let book = book_filter(book.as_deref());
            serde_json::to_value(service.search_keyword(&query, book, n_results).await)?
        }
        Command::Semantic {
            query,
            book,
            n_results,
        } => {
            let book = book_filter(book.as_deref());
            serde_json::to_value(service.search_semantic(&query, book, n_results).await)?
        }
        Command::Tool { name, arguments } => {
            let arguments = parse_tool_arguments(arguments.as_deref())?;
            execute_tool(&service, &name, arguments).await
        }
        Command::Index => {
            let corpus = service.corpus().await?;
            info!("Corpus ready: {} verses", corpus.verse_count());
            json!({
                "source": config.source_url,
                "books": corpus.book_count(),
                "chapters": corpus.chapter_count(),
                "verses": corpus.verse_count(),
                "vocabulary": corpus.semantic_index().vocabulary().len(),
                "report": corpus.report(),
            })
        }
        Command::Translations => serde_json::to_value(service.list_translations())?,
        Command::Tools => serde_json::to_value(tool_definitions())?,
    };

    Ok(output)
}

/// Pass a `--book` filter through, warning when it names no known book
fn book_filter(book: Option<&str>) -> Option<&str> {
    if let Some(name) = book {
        if !is_known_book(name) {
            warn!(
                "Unknown book '{}'; only a book stored under that exact name will match",
                name
            );
        }
    }
    book
}

/// Serialize a façade result, turning failures into an `error` object
fn render<T: Serialize>(result: Result<T, ScriptureError>) -> anyhow::Result<Value> {
    match result {
        Ok(value) => Ok(serde_json::to_value(value)?),
        Err(e) => Ok(json!({ "error": e.to_string() })),
    }
}

fn parse_tool_arguments(raw: Option<&str>) -> anyhow::Result<Value> {
    let Some(raw) = raw else {
        return Ok(json!({}));
    };
    let value: Value = serde_json::from_str(raw).context("Tool arguments must be valid JSON")?;
    if !value.is_object() {
        return Err(anyhow!("Tool arguments must be a JSON object"));
    }
    Ok(value)
}
