//! Integration tests for the mirror
//!
//! These tests use wiremock to create mock HTTP servers and run full
//! crawls end-to-end against them, writing into temporary directories.
//! Request counts are checked by the mock expectations when each server
//! is dropped.

use ripple_mirror::config::Config;
use ripple_mirror::{site_key, Mirror, MirrorError};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `root`
fn create_test_config(root: &TempDir, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.workers = 4;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.output.directory = root.path().to_path_buf();
    config
}

/// Directory a server's pages are mirrored into
fn site_dir(root: &TempDir, server: &MockServer) -> PathBuf {
    let url = url::Url::parse(&server.uri()).expect("Failed to parse server URI");
    root.path()
        .join(site_key(&url).expect("Server URI has no host"))
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, at: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_small_site_respects_depth() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/b">B</a><a href="/c">C</a>"#, 1).await;
    mount_page(&server, "/b", r#"<a href="/d">D</a>"#, 1).await;
    mount_page(&server, "/c", "leaf", 1).await;
    mount_page(&server, "/d", "too deep", 0).await;

    let root = TempDir::new().unwrap();
    let mirror = Mirror::new(create_test_config(&root, 2)).unwrap();
    let summary = mirror.start(&server.uri()).await.unwrap();

    let dir = site_dir(&root, &server);
    assert!(dir.join("index.html").is_file());
    assert!(dir.join("b").is_file());
    assert!(dir.join("c").is_file());
    assert!(!dir.join("d").exists());
    assert_eq!(summary.pages_saved, 3);

    let saved = std::fs::read_to_string(dir.join("b")).unwrap();
    assert!(saved.contains(r#"<a href="/d">D</a>"#));
}

#[tokio::test]
async fn test_cross_linked_pages_fetched_once() {
    let server = MockServer::start().await;
    let nav = r#"<a href="/">home</a><a href="/one/">one</a><a href="/two/">two</a><a href="/one/#top">one again</a>"#;
    mount_page(&server, "/", nav, 1).await;
    mount_page(&server, "/one/", nav, 1).await;
    mount_page(&server, "/two/", nav, 1).await;

    let root = TempDir::new().unwrap();
    let mirror = Mirror::new(create_test_config(&root, 5)).unwrap();
    mirror.start(&server.uri()).await.unwrap();

    let dir = site_dir(&root, &server);
    assert!(dir.join("one/index.html").is_file());
    assert!(dir.join("two/index.html").is_file());
}

#[tokio::test]
async fn test_shared_resource_downloaded_once() {
    let server = MockServer::start().await;
    let page = r#"<link rel="stylesheet" href="/css/site.css"><img src="/img/logo.PNG"><a href="/about">about</a>"#;
    mount_page(&server, "/", page, 1).await;
    mount_page(&server, "/about", page, 1).await;

    Mock::given(method("GET"))
        .and(path("/css/site.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body { color: black; }"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/logo.PNG"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]))
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let mirror = Mirror::new(create_test_config(&root, 3)).unwrap();
    let summary = mirror.start(&server.uri()).await.unwrap();

    let dir = site_dir(&root, &server);
    assert_eq!(
        std::fs::read_to_string(dir.join("css/site.css")).unwrap(),
        "body { color: black; }"
    );
    assert_eq!(
        std::fs::read(dir.join("img/logo.PNG")).unwrap(),
        vec![0x89, 0x50, 0x4e, 0x47]
    );
    assert_eq!(summary.resources_saved, 2);
}

#[tokio::test]
async fn test_failed_resources_leave_no_file() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<script src="/missing.js"></script><script src="/slow.js"></script>"#,
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing.js"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("var slow = true;")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let mut config = create_test_config(&root, 1);
    config.crawler.resource_timeout_ms = 200;
    let mirror = Mirror::new(config).unwrap();
    let summary = mirror.start(&server.uri()).await.unwrap();

    let dir = site_dir(&root, &server);
    assert!(dir.join("index.html").is_file());
    assert!(!dir.join("missing.js").exists());
    assert!(!dir.join("slow.js").exists());
    assert_eq!(summary.resources_failed, 2);
}

#[tokio::test]
async fn test_error_status_page_mirrored_and_followed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/gone">gone</a><a href="/here">here</a>"#, 1).await;
    mount_page(&server, "/here", "still here", 1).await;
    mount_page(&server, "/after", "found from the error page", 1).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"<html><body>Not found. <a href="/after">Try this</a></body></html>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let mirror = Mirror::new(create_test_config(&root, 3)).unwrap();
    let summary = mirror.start(&server.uri()).await.unwrap();

    let dir = site_dir(&root, &server);
    let saved = std::fs::read_to_string(dir.join("gone")).unwrap();
    assert!(saved.contains("Not found."));
    assert!(dir.join("here").is_file());
    assert!(dir.join("after").is_file());
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.pages_saved, 4);
}

#[tokio::test]
async fn test_slow_page_times_out_without_stopping_siblings() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/slow">slow</a><a href="/here">here</a>"#, 1).await;
    mount_page(&server, "/here", "still here", 1).await;
    mount_page(&server, "/beyond", "only linked from the slow page", 0).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html(r#"<a href="/beyond">beyond</a>"#).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let mut config = create_test_config(&root, 3);
    config.crawler.page_timeout_ms = 200;
    let mirror = Mirror::new(config).unwrap();
    let summary = mirror.start(&server.uri()).await.unwrap();

    let dir = site_dir(&root, &server);
    assert!(!dir.join("slow").exists());
    assert!(dir.join("here").is_file());
    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.pages_saved, 2);
}

#[tokio::test]
async fn test_other_site_links_ignored_but_assets_fetched() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="{0}/page">elsewhere</a><img src="{0}/logo.png">"#,
            other.uri()
        ),
        1,
    )
    .await;
    mount_page(&other, "/page", "not ours", 0).await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .expect(1)
        .mount(&other)
        .await;

    let root = TempDir::new().unwrap();
    let mirror = Mirror::new(create_test_config(&root, 3)).unwrap();
    mirror.start(&server.uri()).await.unwrap();

    let other_dir = site_dir(&root, &other);
    assert_eq!(std::fs::read(other_dir.join("logo.png")).unwrap(), vec![1, 2, 3]);
    assert!(!other_dir.join("page").exists());
}

#[tokio::test]
async fn test_configured_user_agent_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(html("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let mirror = Mirror::new(create_test_config(&root, 1)).unwrap();
    let summary = mirror.start(&server.uri()).await.unwrap();

    assert_eq!(summary.pages_saved, 1);
}

#[tokio::test]
async fn test_depth_zero_fetches_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(html("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let out = root.path().join("nested/mirror");
    let mut config = create_test_config(&root, 0);
    config.output.directory = out.clone();
    let mirror = Mirror::new(config).unwrap();
    let summary = mirror.start(&server.uri()).await.unwrap();

    assert!(out.is_dir());
    assert_eq!(summary.files_written(), 0);
}

#[tokio::test]
async fn test_invalid_start_url() {
    let root = TempDir::new().unwrap();
    let mirror = Mirror::new(create_test_config(&root, 2)).unwrap();

    let result = mirror.start("::not a url::").await;
    assert!(matches!(result, Err(MirrorError::InvalidStartUrl { .. })));
}

#[tokio::test]
async fn test_start_function() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/next">next</a>"#, 1).await;
    mount_page(&server, "/next", "end", 1).await;

    let root = TempDir::new().unwrap();
    let summary = ripple_mirror::start(&server.uri(), 2, root.path(), 2)
        .await
        .unwrap();

    assert_eq!(summary.pages_saved, 2);
    assert!(site_dir(&root, &server).join("next").is_file());
}
