#![cfg(feature = "reqwest")]

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::prelude::*;
use parking_lot::Mutex;
use tower::{Service, ServiceBuilder, ServiceExt};
// self
use proxycrawl::{
	client::{Client, ClientBuilder, RequestMode},
	error::{ConfigError, Error, RoundTripError},
	http::{self, StatusCode, header::USER_AGENT},
	reqwest,
	round_trip::{PlainRoundTripper, RenderedRoundTripper, RoundTrip},
	transport::{HttpRequest, HttpResponse, ReqwestTransport, TransportFuture, UpstreamTransport},
	url::Url,
};

#[derive(Debug, thiserror::Error)]
#[error("Fake transport failure.")]
struct FakeError;

#[derive(Default)]
struct RecordingTransport {
	urls: Mutex<Vec<Url>>,
}
impl UpstreamTransport for RecordingTransport {
	type TransportError = FakeError;

	fn get(&self, url: Url) -> TransportFuture<'_, Self::TransportError> {
		self.urls.lock().push(url);

		Box::pin(async {
			let mut response = HttpResponse::new(b"crawled".to_vec());

			response
				.headers_mut()
				.insert("original_status", http::HeaderValue::from_static("200"));

			Ok(response)
		})
	}
}

fn recording_client() -> Arc<Client<RecordingTransport>> {
	let client = ClientBuilder::new("normal-token", "rendered-token")
		.base_url(Url::parse("https://crawler.test").expect("Test base URL should parse."))
		.build(Arc::new(RecordingTransport::default()))
		.expect("Test client should build.");

	Arc::new(client)
}

/// Reqwest transport that trusts the self-signed certificate `httpmock` serves.
fn mock_server_transport() -> ReqwestTransport {
	let client = reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Insecure reqwest client for the mock server should build.");

	ReqwestTransport::with_client(client)
}

/// Stand-in for HTTP code that only knows about tower services.
async fn fetch_status<S>(service: S, request: HttpRequest) -> Result<StatusCode, S::Error>
where
	S: Service<HttpRequest, Response = HttpResponse>,
{
	service.oneshot(request).await.map(|response| response.status())
}

fn get(uri: &str, user_agent: &str) -> HttpRequest {
	http::Request::get(uri)
		.header(USER_AGENT, user_agent)
		.body(Vec::new())
		.expect("Test request should build.")
}

fn query(url: &Url) -> Vec<(String, String)> {
	url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}

#[tokio::test(start_paused = true)]
async fn rendered_adapter_lifts_request_into_crawler_query() {
	let client = recording_client();
	let transport: Arc<dyn RoundTrip> = Arc::new(RenderedRoundTripper::new(client.clone()));
	let response = transport
		.round_trip(get("https://example.com/", "test-agent"))
		.await
		.expect("Rendered round trip should succeed.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.body().as_slice(), b"crawled");
	assert!(response.headers().contains_key("original_status"));

	let urls = client.transport().urls.lock();

	assert_eq!(urls.len(), 1);
	assert_eq!(
		query(&urls[0]),
		vec![
			("url".into(), "https://example.com/".into()),
			("user_agent".into(), "test-agent".into()),
			("page_wait".into(), "3000".into()),
			("get_headers".into(), "true".into()),
			("token".into(), "rendered-token".into()),
		]
	);
}

#[tokio::test(start_paused = true)]
async fn plain_adapter_uses_normal_token_without_page_wait() {
	let client = recording_client();
	let transport: Arc<dyn RoundTrip> = Arc::new(PlainRoundTripper::new(client.clone()));

	transport
		.round_trip(get("https://example.com/search?q=rust", "test-agent"))
		.await
		.expect("Plain round trip should succeed.");

	let urls = client.transport().urls.lock();
	let pairs = query(&urls[0]);

	assert!(pairs.iter().all(|(name, _)| name != "page_wait"));
	assert!(pairs.contains(&("url".into(), "https://example.com/search?q=rust".into())));
	assert_eq!(pairs.last(), Some(&("token".into(), "normal-token".into())));
}

#[tokio::test(start_paused = true)]
async fn custom_page_wait_overrides_default() {
	let client = recording_client();
	let transport =
		RenderedRoundTripper::new(client.clone()).with_page_wait(Duration::from_secs(8));

	transport
		.round_trip(get("https://example.com/", "test-agent"))
		.await
		.expect("Rendered round trip should succeed.");

	let urls = client.transport().urls.lock();

	assert!(query(&urls[0]).contains(&("page_wait".into(), "8000".into())));
}

#[tokio::test(start_paused = true)]
async fn adapter_failures_are_tagged_with_the_mode() {
	let client = recording_client();
	let transport: Arc<dyn RoundTrip> = Arc::new(PlainRoundTripper::new(client.clone()));
	let err = transport
		.round_trip(get("ftp://example.com/archive.tar", "test-agent"))
		.await
		.expect_err("Non-HTTP targets should be rejected.");

	assert_eq!(err.mode, RequestMode::Normal);
	assert!(matches!(err.source, Error::Config(ConfigError::InvalidTargetUrl { .. })));
	assert!(err.to_string().starts_with("Proxycrawl normal round trip failed: "));
	assert!(client.transport().urls.lock().is_empty());
}

#[tokio::test]
async fn rendered_adapter_round_trips_through_reqwest() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/")
				.query_param("url", "https://example.com/")
				.query_param("user_agent", "test-agent")
				.query_param("page_wait", "3000")
				.query_param("get_headers", "true")
				.query_param("token", "rendered-token");
			then.status(404).header("original_status", "404").body("missing");
		})
		.await;
	let client = ClientBuilder::new("normal-token", "rendered-token")
		.base_url(Url::parse(&server.base_url()).expect("Mock server URL should parse."))
		.build(Arc::new(mock_server_transport()))
		.expect("Client should build against the mock server.");
	let transport: Arc<dyn RoundTrip> = Arc::new(RenderedRoundTripper::new(Arc::new(client)));
	let response = transport
		.round_trip(get("https://example.com/", "test-agent"))
		.await
		.expect("Upstream error statuses are normal responses.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(response.body().as_slice(), b"missing");

	mock.assert_async().await;
}

#[tokio::test(start_paused = true)]
async fn adapters_serve_generic_tower_callers() {
	let client = recording_client();
	let status = fetch_status(
		RenderedRoundTripper::new(client.clone()),
		get("https://example.com/", "test-agent"),
	)
	.await
	.expect("Rendered service should answer.");

	assert_eq!(status, StatusCode::OK);

	let err: RoundTripError = fetch_status(
		PlainRoundTripper::new(client.clone()),
		get("ftp://example.com/", "test-agent"),
	)
	.await
	.expect_err("Plain service should reject non-HTTP targets.");

	assert_eq!(err.mode, RequestMode::Normal);

	let urls = client.transport().urls.lock();

	assert_eq!(urls.len(), 1);
	assert!(query(&urls[0]).contains(&("token".into(), "rendered-token".into())));
}

#[tokio::test(start_paused = true)]
async fn adapters_compose_with_tower_layers() {
	let client = recording_client();
	let mut service = ServiceBuilder::new()
		.map_request(|mut request: HttpRequest| {
			request
				.headers_mut()
				.insert(USER_AGENT, http::HeaderValue::from_static("layered-agent"));

			request
		})
		.service(PlainRoundTripper::new(client.clone()));
	let response = ServiceExt::<HttpRequest>::ready(&mut service)
		.await
		.expect("Adapter is always ready.")
		.call(get("https://example.com/", "original-agent"))
		.await
		.expect("Layered plain round trip should succeed.");

	assert_eq!(response.body().as_slice(), b"crawled");

	let urls = client.transport().urls.lock();

	assert!(query(&urls[0]).contains(&("user_agent".into(), "layered-agent".into())));
}

#[tokio::test]
async fn tower_caller_reaches_the_crawler_over_reqwest() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/")
				.query_param("url", "https://example.com/feed.xml")
				.query_param("user_agent", "feed-reader/2.0")
				.query_param("token", "normal-token");
			then.status(503).body("upstream busy");
		})
		.await;
	let client = ClientBuilder::new("normal-token", "rendered-token")
		.base_url(Url::parse(&server.base_url()).expect("Mock server URL should parse."))
		.build(Arc::new(mock_server_transport()))
		.expect("Client should build against the mock server.");
	let status = fetch_status(
		PlainRoundTripper::new(Arc::new(client)),
		get("https://example.com/feed.xml", "feed-reader/2.0"),
	)
	.await
	.expect("Upstream error statuses are normal responses.");

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

	mock.assert_async().await;
}

#[tokio::test(start_paused = true)]
async fn undecodable_user_agent_never_reaches_the_wire() {
	let client = recording_client();
	let mut request = get("https://example.com/", "placeholder");

	request.headers_mut().insert(
		USER_AGENT,
		http::HeaderValue::from_bytes(b"bad\xffagent")
			.expect("Obs-text header bytes are valid."),
	);

	RenderedRoundTripper::new(client.clone())
		.round_trip(request)
		.await
		.expect("Rendered round trip should succeed without an agent.");

	let urls = client.transport().urls.lock();

	assert!(query(&urls[0]).iter().all(|(name, _)| name != "user_agent"));
}
