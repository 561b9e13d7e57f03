//! Shared crawler client: access tokens, the upstream endpoint, the transport, and the
//! rate limiter every dispatch goes through.

pub mod config;
pub mod token;

mod dispatch;

pub use config::*;
pub use token::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	rate_limit::{RateLimitConfig, RateLimiter},
	transport::UpstreamTransport,
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

/// Default crawler endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.proxycrawl.com";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestProxyClient = Client<ReqwestTransport>;

/// Selects which access token is attached to a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMode {
	/// Plain fetch with the normal token.
	Normal,
	/// Headless-browser fetch with the JavaScript token.
	Rendered,
}
impl RequestMode {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestMode::Normal => "normal",
			RequestMode::Rendered => "rendered",
		}
	}
}
impl Display for RequestMode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Crawler client shared by every request of a process or tenant.
///
/// The client is immutable after construction; the only state that changes is the token
/// count inside its [`RateLimiter`], which it owns exclusively. Share it behind an `Arc`
/// (the round-trip adapters require one) rather than cloning, so all callers draw from the
/// same bucket.
pub struct Client<T>
where
	T: ?Sized + UpstreamTransport,
{
	transport: Arc<T>,
	base_url: Url,
	normal_token: AccessToken,
	rendered_token: AccessToken,
	rate_limiter: RateLimiter,
}
impl<T> Client<T>
where
	T: ?Sized + UpstreamTransport,
{
	/// Builds a client from a parsed [`ClientConfig`].
	pub fn from_config(config: ClientConfig, transport: Arc<T>) -> Result<Self> {
		Ok(config.into_builder()?.build(transport)?)
	}

	/// Upstream endpoint every dispatch targets.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Rate limiter shared by every dispatch on this client.
	pub fn rate_limiter(&self) -> &RateLimiter {
		&self.rate_limiter
	}

	/// Transport used for upstream calls.
	pub fn transport(&self) -> &Arc<T> {
		&self.transport
	}

	/// Token attached for `mode`.
	pub fn token(&self, mode: RequestMode) -> &AccessToken {
		match mode {
			RequestMode::Normal => &self.normal_token,
			RequestMode::Rendered => &self.rendered_token,
		}
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client with the default reqwest transport, endpoint, and rate limit.
	pub fn new(
		normal_token: impl Into<AccessToken>,
		rendered_token: impl Into<AccessToken>,
	) -> Result<Self> {
		let transport = Arc::new(ReqwestTransport::new()?);

		Ok(ClientBuilder::new(normal_token, rendered_token).build(transport)?)
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized + UpstreamTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.base_url.as_str())
			.field("normal_token", &self.normal_token)
			.field("rendered_token", &self.rendered_token)
			.field("rate_limit", &self.rate_limiter.config())
			.finish()
	}
}

/// Builder for [`Client`] values.
#[derive(Debug)]
pub struct ClientBuilder {
	/// Token attached to [`RequestMode::Normal`] dispatches.
	pub normal_token: AccessToken,
	/// Token attached to [`RequestMode::Rendered`] dispatches.
	pub rendered_token: AccessToken,
	/// Upstream endpoint; defaults to [`DEFAULT_BASE_URL`].
	pub base_url: Option<Url>,
	/// Bucket settings; defaults to one request per 60ms.
	pub rate_limit: RateLimitConfig,
}
impl ClientBuilder {
	/// Creates a builder seeded with the provided tokens.
	pub fn new(
		normal_token: impl Into<AccessToken>,
		rendered_token: impl Into<AccessToken>,
	) -> Self {
		Self {
			normal_token: normal_token.into(),
			rendered_token: rendered_token.into(),
			base_url: None,
			rate_limit: RateLimitConfig::default(),
		}
	}

	/// Overrides the upstream endpoint.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the rate limit.
	pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
		self.rate_limit = config;

		self
	}

	/// Consumes the builder, validating the endpoint and rate limit.
	pub fn build<T>(self, transport: Arc<T>) -> Result<Client<T>, ConfigError>
	where
		T: ?Sized + UpstreamTransport,
	{
		let base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL)
				.map_err(|source| ConfigError::InvalidBaseUrl { source })?,
		};

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::BaseUrlCannotBeABase { url: base_url.into() });
		}

		Ok(Client {
			transport,
			base_url,
			normal_token: self.normal_token,
			rendered_token: self.rendered_token,
			rate_limiter: RateLimiter::new(self.rate_limit)?,
		})
	}
}
