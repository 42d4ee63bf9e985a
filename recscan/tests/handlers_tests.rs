use recscan::handlers::*;
use recscan_core::Category;
use recscan_core::config::{API_BASE_ENV, API_KEY_ENV, DEFAULT_CONFIG_TEMPLATE, Settings};
use recscan_core::report::{EMPTY_STATE, ReportFormat};
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn settings_for(server: &MockServer) -> Settings {
    Settings {
        api_key: Some("test-key".to_string()),
        api_base: server.uri(),
        ..Settings::default()
    }
}

async fn mount_channel(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [ { "snippet": { "channelId": "UC1", "description": "USEFUL RESOURCES:\n1. Wiki : https://en.wikipedia.org/wiki/Rust" } } ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "UC1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [ { "contentDetails": { "relatedPlaylists": { "uploads": "UU1" } } } ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UU1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [ { "snippet": { "title": "Intro to Rust", "resourceId": { "videoId": "abc" } } } ]
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Settings Tests
// ============================================================================

#[test]
fn test_resolve_settings_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings = resolve_settings(&temp_dir.path().join("config.toml"), None, no_env).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_resolve_settings_precedence() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "api_key = \"from-file\"")?;
    writeln!(file, "api_base = \"http://file.example\"")?;
    writeln!(file, "format = \"csv\"")?;

    let env: HashMap<&str, &str> = HashMap::from([(API_KEY_ENV, "from-env")]);
    let lookup = |name: &str| env.get(name).map(|v| v.to_string());

    let from_env = resolve_settings(file.path(), None, lookup)?;
    assert_eq!(from_env.api_key.as_deref(), Some("from-env"));
    assert_eq!(from_env.api_base, "http://file.example");
    assert_eq!(from_env.format, "csv");

    let from_flag = resolve_settings(file.path(), Some("from-flag"), lookup)?;
    assert_eq!(from_flag.api_key.as_deref(), Some("from-flag"));

    let base_env: HashMap<&str, &str> = HashMap::from([(API_BASE_ENV, "http://env.example")]);
    let from_base_env =
        resolve_settings(file.path(), None, |name| base_env.get(name).map(|v| v.to_string()))?;
    assert_eq!(from_base_env.api_base, "http://env.example");
    assert_eq!(from_base_env.api_key.as_deref(), Some("from-file"));

    Ok(())
}

#[test]
fn test_resolve_settings_invalid_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "timeout_secs = \"soon\"").unwrap();
    assert!(resolve_settings(file.path(), None, no_env).is_err());
}

#[test]
fn test_build_client_requires_api_key() {
    assert!(build_client(&Settings::default(), true).is_err());

    let settings = Settings {
        api_key: Some("k".to_string()),
        ..Settings::default()
    };
    let client = build_client(&settings, true).unwrap();
    assert!(client.cache().is_some());
    assert!(build_client(&settings, false).unwrap().cache().is_none());
}

#[test]
fn test_build_client_rejects_bad_api_base() {
    let settings = Settings {
        api_key: Some("k".to_string()),
        api_base: "not a url".to_string(),
        ..Settings::default()
    };
    assert!(build_client(&settings, false).is_err());
}

// ============================================================================
// Argument Parsing Tests
// ============================================================================

#[test]
fn test_parse_categories() {
    let names = vec!["books".to_string(), "Blog".to_string()];
    assert_eq!(
        parse_categories(&names).unwrap(),
        vec![Category::Books, Category::Blogs]
    );
    assert!(parse_categories(&[]).unwrap().is_empty());
    assert!(parse_categories(&["podcasts".to_string()]).is_err());
}

#[test]
fn test_parse_report_format() {
    assert_eq!(parse_report_format("md").unwrap(), ReportFormat::Markdown);
    assert_eq!(parse_report_format("JSON").unwrap(), ReportFormat::Json);
    assert!(parse_report_format("html").is_err());
}

// ============================================================================
// Extract Command Tests
// ============================================================================

#[test]
fn test_read_description_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    write!(file, "USEFUL RESOURCES:\n1. Book : https://amzn.to/1")?;
    let text = read_description(Some(file.path()))?;
    assert!(text.starts_with("USEFUL RESOURCES:"));
    Ok(())
}

#[test]
fn test_read_description_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    assert!(read_description(Some(temp_dir.path().join("nope.txt").as_path())).is_err());
}

#[test]
fn test_format_extracted_text() {
    let text = format_extracted(
        "USEFUL RESOURCES:\n1. Book : https://amzn.to/1\n2. Thread : https://twitter.com/x",
        false,
    )
    .unwrap();
    assert_eq!(
        text,
        "[Books] Book : https://amzn.to/1\n[Twitter] Thread : https://twitter.com/x\n"
    );
}

#[test]
fn test_format_extracted_empty() {
    let text = format_extracted("nothing to see", false).unwrap();
    assert_eq!(text.trim_end(), EMPTY_STATE);
    assert_eq!(format_extracted("nothing to see", true).unwrap(), "[]");
}

#[test]
fn test_format_extracted_json() {
    let text = format_extracted("USEFUL RESOURCES:\n1. Wiki : https://en.wikipedia.org/wiki/X", true)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value[0]["title"], "Wiki");
    assert_eq!(value[0]["category"], "Wikipedia");
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_write_default_config_creates_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested/recscan/config.toml");

    write_default_config(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, DEFAULT_CONFIG_TEMPLATE);
    assert_eq!(Settings::load(&path).unwrap(), Settings::default());
}

// ============================================================================
// Scan Tests
// ============================================================================

#[tokio::test]
async fn test_scan_target_from_video_url() {
    let server = MockServer::start().await;
    mount_channel(&server).await;

    let client = build_client(&settings_for(&server), true).unwrap();
    let target = ScanTarget::VideoUrl("https://youtu.be/abc".to_string());
    let outcome = scan_target(&client, &target, false).await.unwrap();

    assert_eq!(outcome.exit_code(), EXIT_SUCCESS);
    let ScanOutcome::Found(output) = outcome else {
        panic!("expected a scan result");
    };
    assert_eq!(output.channel_id, "UC1");
    assert_eq!(output.videos[0].title, "Intro to Rust");
    assert_eq!(output.resources.len(), 1);
    assert_eq!(output.resources[0].category, Category::Wikipedia);
    // The resolver and the description fetch share one cached videos request.
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_scan_target_without_video_id() {
    let server = MockServer::start().await;
    let client = build_client(&settings_for(&server), true).unwrap();

    let target = ScanTarget::VideoUrl("https://www.youtube.com/channel/UC1".to_string());
    let outcome = scan_target(&client, &target, false).await.unwrap();

    assert!(matches!(outcome, ScanOutcome::NoVideoId));
    assert_eq!(outcome.exit_code(), EXIT_NOT_FOUND);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scan_target_unknown_channel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = build_client(&settings_for(&server), false).unwrap();
    let target = ScanTarget::ChannelId("UCX".to_string());
    let outcome = scan_target(&client, &target, false).await.unwrap();

    assert!(matches!(outcome, ScanOutcome::NoUploads(ref id) if id == "UCX"));
    assert_eq!(outcome.exit_code(), EXIT_NOT_FOUND);
}

#[tokio::test]
async fn test_scan_target_api_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("quotaExceeded"))
        .mount(&server)
        .await;

    let client = build_client(&settings_for(&server), false).unwrap();
    let target = ScanTarget::ChannelId("UC1".to_string());

    let err = scan_target(&client, &target, false).await.unwrap_err();
    assert!(err.to_string().contains("403"));
}
