//! Transport primitives for reaching the crawler endpoint.
//!
//! [`UpstreamTransport`] is the client's only dependency on an HTTP stack: it issues a
//! single `GET` for a fully built crawler URL and hands back the buffered response
//! untouched. The default [`ReqwestTransport`] lives behind the `reqwest` feature; tests and
//! downstream crates can plug in their own implementation.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Outbound request shape accepted by the round-trip adapters.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Buffered response returned by transports and adapters.
pub type HttpResponse = http::Response<Vec<u8>>;

/// Boxed future returned by [`UpstreamTransport::get`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// HTTP stack capable of issuing crawler `GET` requests.
///
/// Implementations must pass status, headers, and body through verbatim; the client
/// never interprets them. They are shared behind an `Arc` by every dispatch, so they must
/// be `Send + Sync + 'static`.
pub trait UpstreamTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Issues a `GET` for `url`.
	fn get(&self, url: Url) -> TransportFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with reqwest's default settings, reporting TLS or resolver
	/// initialization failures instead of panicking.
	pub fn new() -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().build()?))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl UpstreamTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn get(&self, url: Url) -> TransportFuture<'_, Self::TransportError> {
		Box::pin(async move {
			let response = self.0.get(url).send().await?;
			let status = response.status();
			let version = response.version();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.version_mut() = version;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
