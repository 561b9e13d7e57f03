//! Typed crawl request options and their query-parameter encoding.
//!
//! [`RequestOptions`] mirrors the crawler API's optional parameters. Every field carries a
//! natural absent value (`""`, `false`, `0`, or `None`) and [`RequestOptions::encode`] drops
//! fields sitting at that value, so callers only pay for what they set.

mod country;
mod encode;

pub use country::*;
pub use encode::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Response format returned by the crawler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
	/// Raw page HTML; crawler metadata travels in response headers.
	Html,
	/// JSON envelope carrying the page body and crawler metadata.
	Json,
}
impl ResponseFormat {
	/// Returns the wire value expected by the crawler API.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResponseFormat::Html => "html",
			ResponseFormat::Json => "json",
		}
	}
}
impl Display for ResponseFormat {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Device class the crawler should emulate when no user agent is supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
	/// Desktop browser.
	Desktop,
	/// Mobile browser.
	Mobile,
}
impl Device {
	/// Returns the wire value expected by the crawler API.
	pub const fn as_str(self) -> &'static str {
		match self {
			Device::Desktop => "desktop",
			Device::Mobile => "mobile",
		}
	}
}
impl Display for Device {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One crawl request.
///
/// Only `target_url` is required. Rendering knobs (`page_wait_ms`, `ajax_wait_ms`,
/// `css_click_selector`, `screenshot`) only take effect when dispatched with
/// [`RequestMode::Rendered`](crate::client::RequestMode::Rendered).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
	/// Page to crawl; must start with `http://` or `https://`.
	pub target_url: String,
	/// Response format; `None` leaves the crawler default (HTML).
	pub format: Option<ResponseFormat>,
	/// User agent forwarded to the target site.
	pub user_agent: String,
	/// Milliseconds to wait before the browser captures the rendered page.
	pub page_wait_ms: u64,
	/// Milliseconds to wait for in-flight AJAX requests before capture.
	pub ajax_wait_ms: u64,
	/// CSS selector clicked before capture, e.g. `#load-more`.
	pub css_click_selector: String,
	/// Device class to emulate.
	pub device: Option<Device>,
	/// Return the cookies set by the target site.
	pub get_cookies: bool,
	/// Return the headers sent by the target site.
	pub get_headers: bool,
	/// Reuse one upstream proxy across calls sharing this value.
	pub proxy_session: String,
	/// Carry cookies across calls sharing this value.
	pub cookies_session: String,
	/// Capture a JPEG screenshot of the rendered page.
	pub screenshot: bool,
	/// Keep a copy of the response in the crawler's cloud storage.
	pub store: bool,
	/// Run the crawler's data scraper for the page.
	pub scraper: bool,
	/// Ask the crawler to auto-parse the page into JSON.
	pub autoparse: bool,
	/// Geolocate the request from this country.
	pub country: Option<Country>,
	/// Crawl through the Tor network (onion sites).
	pub tor_network: bool,
}
impl RequestOptions {
	/// Creates options for the provided target URL with every other field absent.
	pub fn new(target_url: impl Into<String>) -> Self {
		Self { target_url: target_url.into(), ..Default::default() }
	}

	/// Sets the response format.
	pub fn with_format(mut self, format: ResponseFormat) -> Self {
		self.format = Some(format);

		self
	}

	/// Sets the forwarded user agent.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Sets the rendered page wait.
	pub fn with_page_wait(mut self, wait: Duration) -> Self {
		self.page_wait_ms = duration_millis(wait);

		self
	}

	/// Sets the AJAX wait.
	pub fn with_ajax_wait(mut self, wait: Duration) -> Self {
		self.ajax_wait_ms = duration_millis(wait);

		self
	}

	/// Sets the CSS selector clicked before capture.
	pub fn with_css_click_selector(mut self, selector: impl Into<String>) -> Self {
		self.css_click_selector = selector.into();

		self
	}

	/// Sets the emulated device.
	pub fn with_device(mut self, device: Device) -> Self {
		self.device = Some(device);

		self
	}

	/// Sets the proxy session token.
	pub fn with_proxy_session(mut self, session: impl Into<String>) -> Self {
		self.proxy_session = session.into();

		self
	}

	/// Sets the cookies session token.
	pub fn with_cookies_session(mut self, session: impl Into<String>) -> Self {
		self.cookies_session = session.into();

		self
	}

	/// Sets the geolocation country.
	pub fn with_country(mut self, country: Country) -> Self {
		self.country = Some(country);

		self
	}

	/// Checks the invariants the crawler enforces before a request may be built.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let url = self.target_url.as_str();
		let has_scheme = ["http://", "https://"].iter().any(|scheme| {
			url.len() > scheme.len()
				&& url.get(..scheme.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
		});

		if has_scheme {
			Ok(())
		} else {
			Err(ConfigError::InvalidTargetUrl { url: self.target_url.clone() })
		}
	}
}

fn duration_millis(wait: Duration) -> u64 {
	u64::try_from(wait.as_millis()).unwrap_or(u64::MAX)
}
