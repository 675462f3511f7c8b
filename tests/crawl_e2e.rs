//! End-to-end crawls against a local mock of the IMDb pages.
//!
//! The real `HttpFetcher` talks to a wiremock server, so these cover header
//! handling, URL templates, pagination and name resolution.

use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, headers, method, path, query_param},
};

use imdb_company_scrape::{
    CompanyQuery, CrawlOutcome, Crawler, HttpFetcher, JsonLinesSink, MovieRecord, ScrapeConfig,
    ScrapeError, ScrapeRequest, Stars,
};

const LISTING: &str = include_str!("fixtures/listing_page.html");
const LAST_PAGE: &str = include_str!("fixtures/listing_last_page.html");
const SEARCH: &str = include_str!("fixtures/company_search.html");

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn crawler_for(server: &MockServer) -> Crawler<HttpFetcher> {
    let config = ScrapeConfig::with_origin(&server.uri()).expect("mock origin");
    let fetcher = HttpFetcher::new(&config).expect("http client");
    Crawler::new(fetcher, config).expect("crawler")
}

/// First listing page and the page its "Next" link points at.
async fn mount_listing(server: &MockServer, first_hits: u64, second_hits: u64) {
    Mock::given(method("GET"))
        .and(path("/search/title/"))
        .and(query_param("companies", "co0071509"))
        .and(query_param("start", "51"))
        .respond_with(html(LAST_PAGE))
        .with_priority(1)
        .expect(second_hits)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/title/"))
        .and(query_param("companies", "co0071509"))
        .respond_with(html(LISTING))
        .expect(first_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_mode_fetches_exactly_one_page() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 0).await;

    let crawler = crawler_for(&server);
    let mut movies: Vec<MovieRecord> = Vec::new();
    let request = ScrapeRequest::by_id("co0071509").test_mode(true);
    let summary = crawler.run(&request, &mut movies).await.unwrap();

    assert_eq!(summary.outcome, CrawlOutcome::TestModeCap);
    assert_eq!(summary.pages, 1);
    assert_eq!(movies.len(), 3);

    let matrix = &movies[0];
    assert_eq!(matrix.id.as_deref(), Some("tt0133093"));
    assert_eq!(
        matrix.url.as_deref(),
        Some(format!("{}/title/tt0133093/", server.uri()).as_str())
    );
    assert_eq!(
        movies[1].stars,
        Stars::Joined("Alice Example| Bob Example".into())
    );
}

#[tokio::test]
async fn follows_pagination_to_the_last_page() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 1).await;

    let crawler = crawler_for(&server);
    let mut movies: Vec<MovieRecord> = Vec::new();
    let summary = crawler
        .run(&ScrapeRequest::by_id("co0071509"), &mut movies)
        .await
        .unwrap();

    assert_eq!(summary.outcome, CrawlOutcome::Exhausted);
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.movies, 4);
    assert_eq!(movies[3].id.as_deref(), Some("tt0000502"));
    assert_eq!(
        movies[3].big_poster_url.as_deref(),
        Some("https://m.media-amazon.com/images/M/MV5BMTk2._V1_SY1000_CR0,0,674,1000_AL_.jpg")
    );
}

#[tokio::test]
async fn sends_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/title/"))
        .and(header("user-agent", imdb_company_scrape::config::USER_AGENT))
        .and(headers("accept-language", vec!["en-GB", "en;q=0.5"]))
        .and(header("upgrade-insecure-requests", "1"))
        .respond_with(html(LAST_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = crawler_for(&server);
    let mut movies: Vec<MovieRecord> = Vec::new();
    let request = ScrapeRequest::by_id("co0071509").test_mode(true);
    crawler.run(&request, &mut movies).await.unwrap();
    assert_eq!(movies.len(), 1);
}

#[tokio::test]
async fn resolves_company_name_then_crawls_its_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/find"))
        .and(query_param("s", "co"))
        .and(query_param("q", "studio x"))
        .respond_with(html(SEARCH))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/company/co0000003/"))
        .respond_with(html(LAST_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = crawler_for(&server);
    let query = CompanyQuery::new("Studio X").country("US").kind("production");
    let mut out = JsonLinesSink::new(Vec::new());
    let summary = crawler
        .run(&ScrapeRequest::by_name(query), &mut out)
        .await
        .unwrap();

    assert_eq!(summary.outcome, CrawlOutcome::Exhausted);
    let lines = String::from_utf8(out.into_inner()).unwrap();
    let record: serde_json::Value = serde_json::from_str(lines.trim()).unwrap();
    assert_eq!(record["title"], "Bezhin Meadow");
    assert_eq!(record["year"], "1937");
    assert_eq!(record["stars"], serde_json::json!([]));
}

#[tokio::test]
async fn unknown_company_stops_without_listing_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/find"))
        .respond_with(html(SEARCH))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/company/co0000003/"))
        .respond_with(html(LAST_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = crawler_for(&server);
    let query = CompanyQuery::new("Studio X").country("US").kind("sales");
    let mut movies: Vec<MovieRecord> = Vec::new();
    let summary = crawler
        .run(&ScrapeRequest::by_name(query), &mut movies)
        .await
        .unwrap();

    assert_eq!(summary.outcome, CrawlOutcome::CompanyNotFound);
    assert!(movies.is_empty());
}

#[tokio::test]
async fn error_status_ends_the_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/title/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = crawler_for(&server);
    let mut movies: Vec<MovieRecord> = Vec::new();
    let err = crawler
        .run(&ScrapeRequest::by_id("co0071509"), &mut movies)
        .await
        .unwrap_err();

    match err {
        ScrapeError::Status { status, .. } => assert_eq!(status.as_u16(), 503),
        other => panic!("unexpected error: {other}"),
    }
    assert!(movies.is_empty());
}
