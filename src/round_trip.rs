//! Drop-in round-trip transports that route arbitrary HTTP requests through the crawler.
//!
//! Both adapters are [`tower::Service`]s over `http::Request<Vec<u8>>`, so any tower stack
//! or `Service`-generic HTTP code can be pointed at the crawler unchanged. Code written
//! against the object-safe [`RoundTrip`] (typically `Arc<dyn RoundTrip>`) works the same
//! way. Each adapter lifts the request URI and `User-Agent` header into
//! [`RequestOptions`], asks the crawler for the original headers, and dispatches through
//! the shared [`Client`].

// std
use std::task::{Context, Poll};
// crates.io
use tower::Service;
// self
use crate::{
	_prelude::*,
	client::{Client, RequestMode},
	error::RoundTripError,
	options::RequestOptions,
	transport::{HttpRequest, HttpResponse, UpstreamTransport},
};

/// Boxed future returned by [`RoundTrip::round_trip`].
pub type RoundTripFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, RoundTripError>> + 'a + Send>>;

/// Pluggable "send one request, get one response" capability.
pub trait RoundTrip
where
	Self: Send + Sync,
{
	/// Executes `request` and returns its response.
	fn round_trip(&self, request: HttpRequest) -> RoundTripFuture<'_>;
}

/// Default page wait applied by [`RenderedRoundTripper`].
pub const DEFAULT_PAGE_WAIT: Duration = Duration::from_secs(3);

/// Round trips through the headless-browser crawler.
pub struct RenderedRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	client: Arc<Client<T>>,
	/// Time the browser waits before capturing the page.
	pub page_wait: Duration,
}
impl<T> RenderedRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	/// Wraps `client` with the default 3 second page wait.
	pub fn new(client: Arc<Client<T>>) -> Self {
		Self { client, page_wait: DEFAULT_PAGE_WAIT }
	}

	/// Overrides the page wait.
	pub fn with_page_wait(mut self, page_wait: Duration) -> Self {
		self.page_wait = page_wait;

		self
	}

	/// Client every round trip dispatches through.
	pub fn client(&self) -> &Arc<Client<T>> {
		&self.client
	}
}
impl<T> Clone for RenderedRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	fn clone(&self) -> Self {
		Self { client: self.client.clone(), page_wait: self.page_wait }
	}
}
impl<T> Debug for RenderedRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RenderedRoundTripper").field("page_wait", &self.page_wait).finish()
	}
}
impl<T> RoundTrip for RenderedRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	fn round_trip(&self, request: HttpRequest) -> RoundTripFuture<'_> {
		Box::pin(self.client.round_trip(request, RequestMode::Rendered, self.page_wait))
	}
}
impl<T> Service<HttpRequest> for RenderedRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	type Error = RoundTripError;
	type Future = RoundTripFuture<'static>;
	type Response = HttpResponse;

	fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		// Back-pressure lives in the client's rate limiter, which every call awaits.
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, request: HttpRequest) -> Self::Future {
		let client = self.client.clone();
		let page_wait = self.page_wait;

		Box::pin(
			async move { client.round_trip(request, RequestMode::Rendered, page_wait).await },
		)
	}
}

/// Round trips through the plain crawler.
pub struct PlainRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	client: Arc<Client<T>>,
}
impl<T> PlainRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	/// Wraps `client`.
	pub fn new(client: Arc<Client<T>>) -> Self {
		Self { client }
	}

	/// Client every round trip dispatches through.
	pub fn client(&self) -> &Arc<Client<T>> {
		&self.client
	}
}
impl<T> Clone for PlainRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	fn clone(&self) -> Self {
		Self { client: self.client.clone() }
	}
}
impl<T> Debug for PlainRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PlainRoundTripper").finish()
	}
}
impl<T> RoundTrip for PlainRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	fn round_trip(&self, request: HttpRequest) -> RoundTripFuture<'_> {
		Box::pin(self.client.round_trip(request, RequestMode::Normal, Duration::ZERO))
	}
}
impl<T> Service<HttpRequest> for PlainRoundTripper<T>
where
	T: ?Sized + UpstreamTransport,
{
	type Error = RoundTripError;
	type Future = RoundTripFuture<'static>;
	type Response = HttpResponse;

	fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, request: HttpRequest) -> Self::Future {
		let client = self.client.clone();

		Box::pin(
			async move { client.round_trip(request, RequestMode::Normal, Duration::ZERO).await },
		)
	}
}

impl RequestOptions {
	/// Lifts an outbound request into crawler options: target URI, `User-Agent`, original
	/// headers requested, and the given page wait.
	///
	/// A `User-Agent` that is not visible ASCII is left out rather than forwarded mangled;
	/// the crawler then picks its own agent.
	pub fn for_round_trip(request: &HttpRequest, page_wait: Duration) -> Self {
		let user_agent = request
			.headers()
			.get(http::header::USER_AGENT)
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default();
		let mut options = Self::new(request.uri().to_string())
			.with_user_agent(user_agent)
			.with_page_wait(page_wait);

		options.get_headers = true;

		options
	}
}

impl<T> Client<T>
where
	T: ?Sized + UpstreamTransport,
{
	/// Performs one round trip for `request` in `mode`.
	///
	/// The adapters call this; use it directly when the mode or page wait varies per call.
	/// Failures are tagged with a [`RoundTripError`] so they read as crawler dispatch
	/// failures rather than plain network errors.
	pub async fn round_trip(
		&self,
		request: HttpRequest,
		mode: RequestMode,
		page_wait: Duration,
	) -> Result<HttpResponse, RoundTripError> {
		let options = RequestOptions::for_round_trip(&request, page_wait);

		self.dispatch(&options, mode).await.map_err(|e| RoundTripError::new(mode, e))
	}
}
