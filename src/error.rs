//! Client-level error types shared by the encoder, dispatcher, and round-trip adapters.

// self
use crate::{_prelude::*, client::RequestMode};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem; nothing reached the network.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The caller's cancellation signal fired before the dispatch completed.
	#[error("Dispatch was cancelled while {stage}.")]
	Cancelled {
		/// Suspension point the dispatch was parked on.
		stage: CancelStage,
	},
}
impl Error {
	/// Returns true when the caller gave up instead of the upstream failing.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled { .. })
	}
}

/// Suspension points a dispatch can be cancelled at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CancelStage {
	/// Parked on the rate limiter; no token was deducted.
	RateLimit,
	/// Waiting on the upstream HTTP call; the rate-limit token was already spent.
	Network,
}
impl CancelStage {
	/// Describes what the dispatch was waiting on.
	pub const fn as_str(self) -> &'static str {
		match self {
			CancelStage::RateLimit => "waiting for a rate-limit token",
			CancelStage::Network => "waiting for the upstream response",
		}
	}

	/// Short identifier used for span fields.
	pub const fn label(self) -> &'static str {
		match self {
			CancelStage::RateLimit => "rate_limit",
			CancelStage::Network => "network",
		}
	}
}
impl Display for CancelStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Upstream base URL cannot be parsed.
	#[error("Upstream base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Upstream base URL cannot carry a query string.
	#[error("Upstream base URL `{url}` cannot carry query parameters.")]
	BaseUrlCannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Client configuration document could not be parsed.
	#[error("Client configuration is malformed.")]
	ConfigParse {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},

	/// Target URL is missing or uses a scheme the crawler cannot fetch.
	#[error("Target URL `{url}` must start with http:// or https://.")]
	InvalidTargetUrl {
		/// Offending URL.
		url: String,
	},
	/// Country code is not two ASCII letters.
	#[error("Country code `{value}` must be two ASCII letters.")]
	InvalidCountry {
		/// Offending value.
		value: String,
	},
	/// Rate limit settings cannot produce a working bucket.
	#[error("Rate limit is invalid: {reason}.")]
	InvalidRateLimit {
		/// Which constraint failed.
		reason: &'static str,
	},
	/// Caller asked for more tokens than the bucket can ever hold.
	#[error("Cannot acquire {requested} tokens from a bucket holding at most {capacity}.")]
	AcquireExceedsCapacity {
		/// Tokens requested.
		requested: u64,
		/// Bucket capacity.
		capacity: u64,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the crawler endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failure surfaced by a round-trip adapter, tagged so callers can tell crawler dispatch
/// failures apart from their own transport errors.
#[derive(Debug, ThisError)]
#[error("Proxycrawl {mode} round trip failed: {source}")]
pub struct RoundTripError {
	/// Request mode the adapter dispatched with.
	pub mode: RequestMode,
	/// Dispatch failure.
	#[source]
	pub source: Error,
}
impl RoundTripError {
	/// Tags a dispatch failure with the adapter's mode.
	pub fn new(mode: RequestMode, source: Error) -> Self {
		Self { mode, source }
	}
}
