//! End-to-end crawl tests against a local mockito server

use mockito::{Mock, Server, ServerGuard};
use page_harvester::{run_crawl, CrawlConfig, MemoryStore, PageStore};
use std::sync::Arc;
use std::time::Duration;

/// Builds a page whose <article> holds `words` distinct words, followed by a
/// "related pages" section linking to every entry of `links`
fn article_page(title: &str, words: usize, links: &[&str]) -> String {
    let text = (0..words)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>{}</title></head>
<body>
    <nav><a href="/">Home</a></nav>
    <article><p>{}</p></article>
    <section class="related">{}</section>
    <footer>Copyright</footer>
</body>
</html>"#,
        title, text, anchors
    )
}

/// A page with a few words of text only
fn thin_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><body><main>Too short to keep.</main><div>{}</div></body></html>",
        anchors
    )
}

async fn html_mock(server: &mut ServerGuard, path: &str, body: String, hits: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

async fn never_requested(server: &mut ServerGuard, path: &str) -> Mock {
    server.mock("GET", path).expect(0).create_async().await
}

fn config(server: &ServerGuard, max_depth: usize, max_pages: usize) -> CrawlConfig {
    CrawlConfig::builder(format!("{}/", server.url()))
        .max_depth(max_depth)
        .max_pages(max_pages)
        .concurrency(4)
        .build()
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_seed_and_same_host_article_only() {
    let mut server = Server::new_async().await;
    let seed = html_mock(
        &mut server,
        "/",
        article_page("Home", 60, &["/about", "https://ads.test/banner", "/logo.png"]),
        1,
    )
    .await;
    let about = html_mock(&mut server, "/about", article_page("About", 300, &["/"]), 1).await;
    let logo = never_requested(&mut server, "/logo.png").await;

    let store = Arc::new(MemoryStore::new());
    let result = run_crawl(config(&server, 1, 10), "site", store.clone())
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.contains_url(&format!("{}/", server.url())));
    assert!(result.contains_url(&format!("{}/about", server.url())));
    assert!(!result.pages().iter().any(|p| p.url().contains("ads.test")));
    assert_eq!(result.urls_claimed(), 2);

    let about_page = result
        .pages()
        .iter()
        .find(|p| p.url().ends_with("/about"))
        .unwrap();
    assert_eq!(about_page.title(), "About");
    assert_eq!(about_page.word_count(), 300);
    assert_eq!(about_page.language(), "en");
    // Navigation and footer text never reach the content
    assert!(!about_page.content().contains("Copyright"));

    seed.assert_async().await;
    about.assert_async().await;
    logo.assert_async().await;

    assert_eq!(store.list_pages("site").await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_page_budget_is_never_exceeded() {
    let mut server = Server::new_async().await;
    let paths: Vec<String> = (0..10).map(|i| format!("/p{}", i)).collect();
    let links: Vec<&str> = paths.iter().map(String::as_str).collect();

    let _home = html_mock(&mut server, "/", article_page("Home", 50, &links), 1).await;
    let mut children = Vec::new();
    for path in &paths {
        let mock = server
            .mock("GET", path.as_str())
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(article_page(path, 50, &[]))
            .expect_at_most(1)
            .create_async()
            .await;
        children.push(mock);
    }

    let result = run_crawl(config(&server, 3, 4), "site", Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    assert_eq!(result.urls_claimed(), 4);
    assert_eq!(result.len(), 4);
    for mock in &children {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_depth_limit() {
    let mut server = Server::new_async().await;
    let _home = html_mock(&mut server, "/", article_page("Home", 50, &["/a"]), 1).await;
    let _a = html_mock(&mut server, "/a", article_page("A", 50, &["/b"]), 1).await;
    let b = never_requested(&mut server, "/b").await;

    let result = run_crawl(config(&server, 1, 50), "site", Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    b.assert_async().await;
}

#[tokio::test]
async fn test_depth_zero_fetches_only_the_seed() {
    let mut server = Server::new_async().await;
    let _home = html_mock(&mut server, "/", article_page("Home", 50, &["/a"]), 1).await;
    let a = never_requested(&mut server, "/a").await;

    let result = run_crawl(config(&server, 0, 50), "site", Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.urls_claimed(), 1);
    a.assert_async().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_link_fetched_once() {
    let mut server = Server::new_async().await;
    let _home = html_mock(&mut server, "/", article_page("Home", 50, &["/left", "/right"]), 1).await;
    let _left = html_mock(
        &mut server,
        "/left",
        article_page("Left", 50, &["/shared", "/shared#section"]),
        1,
    )
    .await;
    let _right = html_mock(&mut server, "/right", article_page("Right", 50, &["/shared"]), 1).await;
    let shared = html_mock(&mut server, "/shared", article_page("Shared", 50, &["/"]), 1).await;

    let result = run_crawl(config(&server, 2, 50), "site", Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    let shared_url = format!("{}/shared", server.url());
    let copies = result.pages().iter().filter(|p| p.url() == shared_url).count();
    assert_eq!(copies, 1);
    assert_eq!(result.len(), 4);
    shared.assert_async().await;
}

#[tokio::test]
async fn test_failed_pages_do_not_stop_the_crawl() {
    let mut server = Server::new_async().await;
    let _home = html_mock(&mut server, "/", article_page("Home", 50, &["/broken", "/ok"]), 1).await;
    let _broken = server
        .mock("GET", "/broken")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;
    let _ok = html_mock(&mut server, "/ok", article_page("Ok", 50, &[]), 1).await;

    let result = run_crawl(config(&server, 1, 50), "site", Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.contains_url(&format!("{}/ok", server.url())));
    assert!(!result.contains_url(&format!("{}/broken", server.url())));
    assert_eq!(result.urls_claimed(), 3);
}

#[tokio::test]
async fn test_thin_pages_are_filtered_and_not_expanded() {
    let mut server = Server::new_async().await;
    let _home = html_mock(&mut server, "/", article_page("Home", 50, &["/thin", "/rich"]), 1).await;
    let _thin = html_mock(&mut server, "/thin", thin_page(&["/hidden"]), 1).await;
    let _rich = html_mock(&mut server, "/rich", article_page("Rich", 25, &[]), 1).await;
    let hidden = never_requested(&mut server, "/hidden").await;

    let store = Arc::new(MemoryStore::new());
    let result = run_crawl(config(&server, 2, 50), "site", store.clone())
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert!(!result.contains_url(&format!("{}/thin", server.url())));
    assert!(result.contains_url(&format!("{}/rich", server.url())));
    hidden.assert_async().await;

    let stored = store.list_pages("site").await.unwrap();
    assert!(stored.iter().all(|p| !p.page.url().ends_with("/thin")));
}

#[tokio::test]
async fn test_follow_rejected_links_reaches_past_thin_pages() {
    let mut server = Server::new_async().await;
    let _home = html_mock(&mut server, "/", article_page("Home", 50, &["/thin"]), 1).await;
    let _thin = html_mock(&mut server, "/thin", thin_page(&["/hidden"]), 1).await;
    let _hidden = html_mock(&mut server, "/hidden", article_page("Hidden", 50, &[]), 1).await;

    let config = CrawlConfig::builder(format!("{}/", server.url()))
        .max_depth(2)
        .follow_rejected_links(true)
        .build()
        .unwrap();
    let result = run_crawl(config, "site", Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.contains_url(&format!("{}/hidden", server.url())));
}

#[tokio::test]
async fn test_client_identifier_is_sent() {
    let mut server = Server::new_async().await;
    let seed = server
        .mock("GET", "/")
        .match_header("user-agent", "harvest-test/2.0")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(article_page("Home", 50, &[]))
        .expect(1)
        .create_async()
        .await;

    let config = CrawlConfig::builder(format!("{}/", server.url()))
        .client_identifier("harvest-test/2.0")
        .build()
        .unwrap();
    let result = run_crawl(config, "site", Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    seed.assert_async().await;
}

#[tokio::test]
async fn test_links_in_navigation_and_footer_are_not_followed() {
    let mut server = Server::new_async().await;
    let text = vec!["content"; 40].join(" ");
    let body = format!(
        r#"<html><body>
            <nav><a href="/navonly">Docs</a></nav>
            <header><a href="/headeronly">Logo</a></header>
            <main>{}</main>
            <footer><a href="/footeronly">Imprint</a></footer>
        </body></html>"#,
        text
    );
    let _home = html_mock(&mut server, "/", body, 1).await;
    let nav = never_requested(&mut server, "/navonly").await;
    let header = never_requested(&mut server, "/headeronly").await;
    let footer = never_requested(&mut server, "/footeronly").await;

    let result = run_crawl(config(&server, 1, 50), "site", Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.urls_claimed(), 1);
    nav.assert_async().await;
    header.assert_async().await;
    footer.assert_async().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_timed_out_page_does_not_stop_the_crawl() {
    let mut server = Server::new_async().await;
    // The slow page lives on its own server (same host, other port) so its
    // stalled handler can't hold up the other responses
    let mut slow_server = Server::new_async().await;
    let slow_url = format!("{}/slow", slow_server.url());

    let _home = html_mock(
        &mut server,
        "/",
        article_page("Home", 50, &["/ok", slow_url.as_str()]),
        1,
    )
    .await;
    let _ok = html_mock(&mut server, "/ok", article_page("Ok", 50, &[]), 1).await;
    let _slow = slow_server
        .mock("GET", "/slow")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body_from_request(|_| {
            std::thread::sleep(Duration::from_millis(1500));
            b"<article>too late</article>".to_vec()
        })
        .create_async()
        .await;

    let config = CrawlConfig::builder(format!("{}/", server.url()))
        .max_depth(1)
        .fetch_timeout(Duration::from_millis(400))
        .build()
        .unwrap();
    let result = run_crawl(config, "site", Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    assert_eq!(result.urls_claimed(), 3);
    assert_eq!(result.len(), 2);
    assert!(result.contains_url(&format!("{}/ok", server.url())));
    assert!(!result.contains_url(&slow_url));
}
