//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use link_crawler::config::Config;
use link_crawler::crawler::{download_assets, Coordinator, FetchFailure};
use link_crawler::output::write_link_files;
use link_crawler::{CrawlError, CrawlPhase, CrawlTarget};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration with the given budget and worker count
fn create_test_config(max_visits: u32, workers: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_visits = max_visits;
    config.crawler.workers = workers;
    config.crawler.request_timeout_secs = 2;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config
}

/// An HTML page with the given body
fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Mounts a page that must be requested exactly once
async fn mount_page_once(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Serves `/page/N` linking to `/page/N+1`, forever
struct EndlessChain {
    delay: Duration,
}

impl Respond for EndlessChain {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let n: u64 = request
            .url
            .path()
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
            .unwrap_or(0);

        html(&format!(r#"<a href="/page/{}">next</a>"#, n + 1)).set_delay(self.delay)
    }
}

#[tokio::test]
async fn test_end_to_end_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"
            <a href="/about">About</a>
            <a href="https://external.com">External</a>
            <a href="mailto:test@example.com">Mail</a>
        "#,
    )
    .await;
    mount_page(&server, "/about", r#"<a href="/">Home</a>"#).await;

    let coordinator = Coordinator::new(create_test_config(5, 4), &base).unwrap();
    let report = coordinator.run().await.unwrap();
    let export = report.export();

    assert!(export.internal.contains(&format!("{}/about", base)));
    assert!(export.external.contains(&"https://external.com/".to_string()));
    assert_eq!(export.emails, vec!["test@example.com"]);
    assert!(report.summary.total_visited <= 5);
    assert_eq!(report.summary.total_visited, 2);
    assert_eq!(report.stopped_by, CrawlPhase::Exhausted);
    assert_eq!(report.host(), "127.0.0.1");
}

#[tokio::test]
async fn test_cyclic_links_are_fetched_once() {
    let server = MockServer::start().await;

    mount_page_once(&server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;
    mount_page_once(&server, "/a", r#"<a href="/">home</a><a href="/b">b</a>"#).await;
    mount_page_once(&server, "/b", r#"<a href="/a">a</a><a href="/">home</a>"#).await;

    let coordinator = Coordinator::new(create_test_config(30, 4), &server.uri()).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.summary.total_visited, 3);
    assert_eq!(report.stopped_by, CrawlPhase::Exhausted);
    // Mock expectations are verified when the server drops
}

#[tokio::test]
async fn test_budget_on_endless_chain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(EndlessChain {
            delay: Duration::ZERO,
        })
        .mount(&server)
        .await;

    let seed = format!("{}/page/0", server.uri());
    let coordinator = Coordinator::new(create_test_config(10, 3), &seed).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.summary.total_visited, 10);
    assert_eq!(report.stopped_by, CrawlPhase::BudgetReached);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 10);
}

#[tokio::test]
async fn test_query_variants_are_deduplicated() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"
            <a href="/page?x=1">one</a>
            <a href="/page?x=2#section">two</a>
            <a href="/page#top">three</a>
        "#,
    )
    .await;
    mount_page_once(&server, "/page", "done").await;

    let coordinator = Coordinator::new(create_test_config(30, 2), &base).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.export().internal, vec![format!("{}/page", base)]);
    assert_eq!(report.summary.total_visited, 2);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/broken">b</a><a href="/ok">ok</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", r#"<a href="/deeper">deeper</a>"#).await;
    mount_page(&server, "/deeper", "end").await;

    let coordinator = Coordinator::new(create_test_config(30, 2), &base).unwrap();
    let report = coordinator.run().await.unwrap();

    let broken = CrawlTarget::parse_seed(&format!("{}/broken", base)).unwrap();
    assert_eq!(
        report.results.failure_for(&broken),
        Some(&FetchFailure::HttpStatus(500))
    );
    assert_eq!(report.summary.failed_count, 1);
    assert_eq!(report.summary.total_visited, 4);
    assert!(report.export().internal.contains(&format!("{}/deeper", base)));
}

#[tokio::test]
async fn test_non_html_page_is_a_failure() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/data.json">data</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"href": "/hidden"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(30, 2), &base).unwrap();
    let report = coordinator.run().await.unwrap();

    let data = CrawlTarget::parse_seed(&format!("{}/data.json", base)).unwrap();
    assert!(matches!(
        report.results.failure_for(&data),
        Some(FetchFailure::NonHtmlContent(_))
    ));
    assert_eq!(report.export().internal.len(), 1);
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new/"))
        .mount(&server)
        .await;
    mount_page(&server, "/new/", r#"<a href="child">child</a>"#).await;
    mount_page(&server, "/new/child", "leaf").await;

    let seed = format!("{}/old", base);
    let coordinator = Coordinator::new(create_test_config(30, 2), &seed).unwrap();
    let report = coordinator.run().await.unwrap();

    assert!(report.export().internal.contains(&format!("{}/new/child", base)));
}

#[tokio::test]
async fn test_redirect_target_is_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page_once(&server, "/", r#"<a href="/old">old</a><a href="/new">new</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page_once(&server, "/new", "landing").await;

    let report = Coordinator::new(create_test_config(30, 1), &base)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.stopped_by, CrawlPhase::Exhausted);
    assert_eq!(report.summary.total_visited, 2);
}

#[tokio::test]
async fn test_unreachable_seed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(30, 2), &server.uri()).unwrap();
    let err = coordinator.run().await.unwrap_err();

    assert!(matches!(
        err,
        CrawlError::SeedUnreachable {
            reason: FetchFailure::HttpStatus(500),
            ..
        }
    ));
    assert_eq!(err.exit_code(), 1);
}

async fn mount_robots_site(server: &MockServer, private_hits: u64) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"))
        .mount(server)
        .await;
    mount_page(
        server,
        "/",
        r#"<a href="/private/secret">secret</a><a href="/public">public</a>"#,
    )
    .await;
    mount_page(server, "/public", "public").await;
    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(html("secret"))
        .expect(private_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_robots_disallow_is_honored_when_enabled() {
    let server = MockServer::start().await;
    mount_robots_site(&server, 0).await;

    let mut config = create_test_config(30, 2);
    config.crawler.respect_robots = true;
    let report = Coordinator::new(config, &server.uri())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.robots_skipped, 1);
    assert_eq!(report.summary.total_visited, 2);
    // Disallowed links are still reported
    assert!(report
        .export()
        .internal
        .contains(&format!("{}/private/secret", server.uri())));
}

#[tokio::test]
async fn test_oversized_crawl_delay_does_not_abort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nCrawl-delay: 1e300"))
        .mount(&server)
        .await;
    mount_page(&server, "/", "home").await;

    let mut config = create_test_config(30, 1);
    config.crawler.respect_robots = true;
    let coordinator = Coordinator::new(config, &server.uri()).unwrap();

    let report = tokio::time::timeout(Duration::from_secs(10), coordinator.run())
        .await
        .expect("crawl should not wait on the robots.txt delay")
        .unwrap();

    assert_eq!(report.summary.total_visited, 1);
}

#[tokio::test]
async fn test_robots_is_ignored_by_default() {
    let server = MockServer::start().await;
    mount_robots_site(&server, 1).await;

    let report = Coordinator::new(create_test_config(30, 2), &server.uri())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.robots_skipped, 0);
    assert_eq!(report.summary.total_visited, 3);
}

#[tokio::test]
async fn test_collect_and_download_images() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<img src="/img/logo.png?v=2"><img src="/img/logo.png"><a href="/gallery">g</a>"#,
    )
    .await;
    mount_page(&server, "/gallery", r#"<img src="photos/cat.jpg">"#).await;
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photos/cat.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![4u8, 5]))
        .mount(&server)
        .await;

    let mut config = create_test_config(30, 2);
    config.crawler.collect_assets = true;
    let coordinator = Coordinator::new(config, &base).unwrap();
    let fetcher = coordinator.fetcher().clone();
    let report = coordinator.run().await.unwrap();

    assert_eq!(
        report.export().assets,
        vec![
            format!("{}/img/logo.png", base),
            format!("{}/photos/cat.jpg", base)
        ]
    );
    assert_eq!(report.summary.asset_count, 2);

    let temp_dir = TempDir::new().unwrap();
    let summary = download_assets(&fetcher, report.results.assets(), temp_dir.path(), 2)
        .await
        .unwrap();
    assert_eq!(summary.downloaded, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(std::fs::read(temp_dir.path().join("logo.png")).unwrap(), vec![1u8, 2, 3]);
    assert_eq!(std::fs::read(temp_dir.path().join("cat.jpg")).unwrap(), vec![4u8, 5]);
}

#[tokio::test]
async fn test_cancel_before_start() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "never fetched").await;

    let coordinator = Coordinator::new(create_test_config(30, 2), &server.uri()).unwrap();
    coordinator.cancellation_token().cancel();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.stopped_by, CrawlPhase::Cancelled);
    assert!(report.was_cancelled());
    assert_eq!(report.summary.total_visited, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_stops_running_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(EndlessChain {
            delay: Duration::from_millis(100),
        })
        .mount(&server)
        .await;

    let seed = format!("{}/page/0", server.uri());
    let coordinator = Coordinator::new(create_test_config(1000, 1), &seed).unwrap();
    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(350)).await;
        cancel.cancel();
    });

    let report = coordinator.run().await.unwrap();

    assert_eq!(report.stopped_by, CrawlPhase::Cancelled);
    assert!(report.summary.total_visited >= 1);
    assert!(report.summary.total_visited < 20);
}

#[tokio::test]
async fn test_write_link_files_after_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/about">About</a><a href="https://external.com/x">X</a><a href="mailto:a@b.com">M</a>"#,
    )
    .await;
    mount_page(&server, "/about", "about").await;

    let report = Coordinator::new(create_test_config(5, 2), &base)
        .unwrap()
        .run()
        .await
        .unwrap();

    let temp_dir = TempDir::new().unwrap();
    let written = write_link_files(temp_dir.path(), report.host(), &report.export(), false).unwrap();
    assert_eq!(written.len(), 3);

    let internal =
        std::fs::read_to_string(temp_dir.path().join("127.0.0.1_internal_links.txt")).unwrap();
    assert_eq!(internal, format!("{}/about\n", base));

    let external =
        std::fs::read_to_string(temp_dir.path().join("127.0.0.1_external_links.txt")).unwrap();
    assert_eq!(external, "https://external.com/x\n");

    let emails =
        std::fs::read_to_string(temp_dir.path().join("127.0.0.1_email_addresses.txt")).unwrap();
    assert_eq!(emails, "a@b.com\n");
}
