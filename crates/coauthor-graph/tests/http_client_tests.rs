//! Retry pacing and error mapping of the shared HTTP client.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use coauthor_graph::client::HttpClient;
use coauthor_graph::config::Config;
use coauthor_graph::error::ClientError;

/// Answers with `failures` in order, then 200, and records when each request arrived.
#[derive(Clone)]
struct Scripted {
    failures: Vec<ResponseTemplate>,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Scripted {
    fn new(failures: Vec<ResponseTemplate>) -> Self {
        Self { failures, arrivals: Arc::new(Mutex::new(Vec::new())) }
    }

    fn arrivals(&self) -> Vec<Instant> {
        self.arrivals.lock().unwrap().clone()
    }
}

impl Respond for Scripted {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let mut arrivals = self.arrivals.lock().unwrap();
        arrivals.push(Instant::now());
        self.failures
            .get(arrivals.len() - 1)
            .cloned()
            .unwrap_or_else(|| ResponseTemplate::new(200).set_body_string("ok"))
    }
}

fn config(mock_server: &MockServer, max_retries: u32) -> Config {
    let mut config = Config::for_testing(&mock_server.uri());
    config.max_retries = max_retries;
    config
}

#[tokio::test]
async fn test_retry_waits_source_delay() {
    let mock_server = MockServer::start().await;
    let responder = Scripted::new(vec![ResponseTemplate::new(503)]);

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(responder.clone())
        .expect(2)
        .mount(&mock_server)
        .await;

    let delay = Duration::from_millis(400);
    let client = HttpClient::new(&config(&mock_server, 1), delay).unwrap();
    let body = client.get_text(&format!("{}/flaky", mock_server.uri()), &[]).await.unwrap();
    assert_eq!(body, "ok");

    let arrivals = responder.arrivals();
    assert_eq!(arrivals.len(), 2);
    let gap = arrivals[1] - arrivals[0];
    assert!(gap >= delay, "retry came after {gap:?}");
}

#[tokio::test]
async fn test_retry_after_is_honored() {
    let mock_server = MockServer::start().await;
    let responder = Scripted::new(vec![ResponseTemplate::new(429).insert_header("Retry-After", "1")]);

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(responder.clone())
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(&config(&mock_server, 1), Duration::ZERO).unwrap();
    let body = client.get_text(&format!("{}/limited", mock_server.uri()), &[]).await.unwrap();
    assert_eq!(body, "ok");

    let arrivals = responder.arrivals();
    assert!(arrivals[1] - arrivals[0] >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(&config(&mock_server, 2), Duration::ZERO).unwrap();
    let err = client.get_text(&format!("{}/down", mock_server.uri()), &[]).await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 503, .. }));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(&config(&mock_server, 3), Duration::ZERO).unwrap();
    let err = client.get_text(&format!("{}/missing", mock_server.uri()), &[]).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_slow_response_maps_to_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config(&mock_server, 0);
    config.request_timeout = Duration::from_millis(200);
    let client = HttpClient::new(&config, Duration::ZERO).unwrap();
    let err = client.get_text(&format!("{}/slow", mock_server.uri()), &[]).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(t) if t == Duration::from_millis(200)));
    assert!(err.is_retryable());
}
