//! Serializable client settings.
//!
//! Where the settings come from (files, secrets managers, environment) is up to the
//! caller; this module only parses and validates them.

// self
use crate::{
	_prelude::*,
	client::{AccessToken, ClientBuilder},
	error::ConfigError,
	rate_limit::RateLimitConfig,
};

/// Client settings as they appear in a configuration document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
	/// Token for [`RequestMode::Normal`](crate::client::RequestMode::Normal) dispatches.
	pub normal_token: AccessToken,
	/// Token for [`RequestMode::Rendered`](crate::client::RequestMode::Rendered) dispatches.
	#[serde(alias = "javascript_token")]
	pub rendered_token: AccessToken,
	/// Upstream endpoint override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base_url: Option<String>,
	/// Rate limit override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rate_limit: Option<RateLimitConfig>,
}
impl ClientConfig {
	/// Parses a JSON document, reporting the path of the first offending field.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(json);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::ConfigParse { source })
	}

	/// Converts the settings into a [`ClientBuilder`].
	pub fn into_builder(self) -> Result<ClientBuilder, ConfigError> {
		let mut builder = ClientBuilder::new(self.normal_token, self.rendered_token);

		if let Some(raw) = self.base_url {
			let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

			builder = builder.base_url(url);
		}
		if let Some(rate_limit) = self.rate_limit {
			builder = builder.rate_limit(rate_limit);
		}

		Ok(builder)
	}
}
