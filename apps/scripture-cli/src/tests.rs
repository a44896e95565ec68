//! Argument parsing and configuration tests for the scripture CLI

use super::*;
use pretty_assertions::assert_eq;

fn parse(argv: &[&str]) -> Args {
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn test_passage_command() {
    let args = parse(&["scripture", "passage", "John", "3", "--begin", "16", "--end", "17"]);
    assert_eq!(
        args.command,
        Command::Passage {
            book: "John".to_string(),
            chapter: 3,
            begin: Some(16),
            end: Some(17),
        }
    );
}

#[test]
fn test_search_defaults() {
    let args = parse(&["scripture", "keyword", "\"king of the Philistines\""]);
    assert_eq!(
        args.command,
        Command::Keyword {
            query: "\"king of the Philistines\"".to_string(),
            book: None,
            n_results: 10,
        }
    );

    let args = parse(&["scripture", "semantic", "good shepherd", "--book", "jhn", "-n", "3"]);
    assert_eq!(
        args.command,
        Command::Semantic {
            query: "good shepherd".to_string(),
            book: Some("jhn".to_string()),
            n_results: 3,
        }
    );
}

#[test]
fn test_global_flags_after_subcommand() {
    let args = parse(&[
        "scripture",
        "books",
        "--source-url",
        "http://localhost:8080/bsb.txt",
        "--timeout-secs",
        "5",
    ]);
    let config = build_config(&args, ScriptureConfig::default()).unwrap();
    assert_eq!(config.source_url, "http://localhost:8080/bsb.txt");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert!(config.cache_dir.is_none());
}

#[test]
fn test_flags_override_environment_config() {
    let args = parse(&["scripture", "--cache-dir", "/tmp/bsb", "index"]);
    let env_config = ScriptureConfig::default().with_source_url("http://mirror.local/bsb.txt");
    let config = build_config(&args, env_config).unwrap();
    assert_eq!(config.source_url, "http://mirror.local/bsb.txt");
    assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/bsb")));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let args = parse(&["scripture", "books", "--timeout-secs", "0"]);
    assert!(build_config(&args, ScriptureConfig::default()).is_err());
}

#[test]
fn test_offline_commands() {
    assert!(!Command::Tools.needs_corpus());
    assert!(!Command::Translations.needs_corpus());
    assert!(Command::Books.needs_corpus());
}

#[test]
fn test_book_filter_passes_names_through() {
    assert_eq!(book_filter(None), None);
    assert_eq!(book_filter(Some("jhn")), Some("jhn"));
    assert_eq!(book_filter(Some("Frobnicate")), Some("Frobnicate"));
    assert!(is_known_book("jhn"));
    assert!(!is_known_book("Frobnicate"));
}

#[test]
fn test_tool_arguments() {
    assert_eq!(parse_tool_arguments(None).unwrap(), json!({}));
    assert_eq!(
        parse_tool_arguments(Some(r#"{"book": "John", "chapter": 3}"#)).unwrap(),
        json!({ "book": "John", "chapter": 3 })
    );
    assert!(parse_tool_arguments(Some("[1, 2]")).is_err());
    assert!(parse_tool_arguments(Some("{not json")).is_err());
}

#[test]
fn test_render_maps_errors() {
    let value = render::<Value>(Err(ScriptureError::ChapterNotFound {
        book: "John".to_string(),
        chapter: 9999,
    }))
    .unwrap();
    assert_eq!(value, json!({ "error": "Chapter not found: John 9999" }));
}

#[tokio::test]
async fn test_offline_commands_run_without_network() {
    let config = ScriptureConfig::default().with_source_url("http://127.0.0.1:9/unreachable.txt");
    let tools = run(Command::Tools, &config).await.unwrap();
    assert_eq!(tools.as_array().map(|t| t.len()), Some(6));

    let translations = run(Command::Translations, &config).await.unwrap();
    assert_eq!(translations["count"], 1);
}
