#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use proxycrawl::{
	client::{Client, ClientBuilder, RequestMode},
	error::{Error, TransportError},
	options::{Country, Device, RequestOptions, ResponseFormat},
	reqwest,
	transport::ReqwestTransport,
	url::Url,
};

const NORMAL_TOKEN: &str = "normal-token";
const RENDERED_TOKEN: &str = "rendered-token";

/// Reqwest transport that trusts the self-signed certificate `httpmock` serves.
fn mock_server_transport() -> ReqwestTransport {
	let client = reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Insecure reqwest client for the mock server should build.");

	ReqwestTransport::with_client(client)
}

fn build_client(base_url: &str) -> Client<ReqwestTransport> {
	ClientBuilder::new(NORMAL_TOKEN, RENDERED_TOKEN)
		.base_url(Url::parse(base_url).expect("Mock server URL should parse."))
		.build(Arc::new(mock_server_transport()))
		.expect("Client should build against the mock server.")
}

#[tokio::test]
async fn dispatch_sends_encoded_options_with_normal_token() {
	let server = MockServer::start_async().await;
	let client = build_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/")
				.query_param("url", "https://example.com/products?page=2")
				.query_param("device", "mobile")
				.query_param("country", "US")
				.query_param("format", "json")
				.query_param("user_agent", "Crawler/1.0 (+https://bot.example)")
				.query_param("token", NORMAL_TOKEN);
			then.status(200).header("pc_status", "200").body("{\"body\":\"ok\"}");
		})
		.await;
	let options = RequestOptions::new("https://example.com/products?page=2")
		.with_device(Device::Mobile)
		.with_country(Country::UNITED_STATES)
		.with_format(ResponseFormat::Json)
		.with_user_agent("Crawler/1.0 (+https://bot.example)");
	let response = client
		.dispatch(&options, RequestMode::Normal)
		.await
		.expect("Dispatch against the mock server should succeed.");

	assert_eq!(response.status(), 200);
	assert_eq!(
		response.headers().get("pc_status").and_then(|value| value.to_str().ok()),
		Some("200")
	);
	assert_eq!(response.body().as_slice(), b"{\"body\":\"ok\"}");

	mock.assert_async().await;
}

#[tokio::test]
async fn rendered_dispatch_attaches_rendered_token() {
	let server = MockServer::start_async().await;
	let client = build_client(&server.base_url());
	let rendered = server
		.mock_async(|when, then| {
			when.method(GET).path("/").query_param("token", RENDERED_TOKEN);
			then.status(200).body("rendered");
		})
		.await;
	let normal = server
		.mock_async(|when, then| {
			when.method(GET).path("/").query_param("token", NORMAL_TOKEN);
			then.status(200).body("normal");
		})
		.await;
	let response = client
		.dispatch(
			&RequestOptions::new("https://example.com").with_css_click_selector("#more"),
			RequestMode::Rendered,
		)
		.await
		.expect("Rendered dispatch should succeed.");

	assert_eq!(response.body().as_slice(), b"rendered");

	rendered.assert_calls_async(1).await;
	normal.assert_calls_async(0).await;
}

#[tokio::test]
async fn upstream_error_status_is_a_normal_response() {
	let server = MockServer::start_async().await;
	let client = build_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/");
			then.status(429).header("retry-after", "1").body("Too Many Requests");
		})
		.await;
	let response = client
		.dispatch(&RequestOptions::new("https://example.com"), RequestMode::Normal)
		.await
		.expect("Error statuses are passed through, not raised.");

	assert_eq!(response.status(), 429);
	assert!(response.headers().contains_key("retry-after"));
	assert_eq!(response.body().as_slice(), b"Too Many Requests");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn unreachable_upstream_surfaces_transport_error() {
	// Port 9 (discard) is not served on the loopback interface in test environments.
	let client = build_client("http://127.0.0.1:9");
	let err = client
		.dispatch(&RequestOptions::new("https://example.com"), RequestMode::Normal)
		.await
		.expect_err("Connection failures should surface to the caller.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
}
