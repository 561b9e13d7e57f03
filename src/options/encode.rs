//! Static field table that turns [`RequestOptions`] into crawler query parameters.
//!
//! Each row pairs an external parameter name with an accessor returning a typed
//! [`ParamValue`]. Absence is decided per type (`""`, `false`, `0`, `None`) before any
//! string rendering happens, so a present value can never be mistaken for a sentinel.
//! Percent-encoding is left to the URL builder.

// std
use std::borrow::Cow;
// self
use crate::{_prelude::*, options::RequestOptions};

/// Typed view of a single option value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamValue<'a> {
	/// Free-form text; absent when empty.
	Text(&'a str),
	/// Boolean switch; absent when `false`.
	Flag(bool),
	/// Millisecond count; absent when zero.
	Millis(u64),
	/// Enumerated keyword; absent when `None`.
	Keyword(Option<&'a str>),
}
impl<'a> ParamValue<'a> {
	/// Returns true when the value sits at its type's absent sentinel.
	pub fn is_absent(self) -> bool {
		match self {
			Self::Text(text) => text.is_empty(),
			Self::Flag(flag) => !flag,
			Self::Millis(millis) => millis == 0,
			Self::Keyword(keyword) => keyword.is_none(),
		}
	}

	/// Renders a present value; absent values yield `None`.
	pub fn render(self) -> Option<Cow<'a, str>> {
		if self.is_absent() {
			return None;
		}

		match self {
			Self::Text(text) => Some(Cow::Borrowed(text)),
			Self::Flag(_) => Some(Cow::Borrowed("true")),
			Self::Millis(millis) => Some(Cow::Owned(millis.to_string())),
			Self::Keyword(keyword) => keyword.map(Cow::Borrowed),
		}
	}
}

/// One row of the parameter table.
#[derive(Clone, Copy)]
pub struct OptionField {
	/// External parameter name understood by the crawler API.
	pub name: &'static str,
	read: for<'a> fn(&'a RequestOptions) -> ParamValue<'a>,
}
impl OptionField {
	/// Reads this field from `options`.
	pub fn read<'a>(&self, options: &'a RequestOptions) -> ParamValue<'a> {
		(self.read)(options)
	}
}
impl Debug for OptionField {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OptionField").field("name", &self.name).finish()
	}
}

/// Every [`RequestOptions`] field in wire order.
pub const OPTION_FIELDS: [OptionField; 17] = [
	OptionField { name: "url", read: |o| ParamValue::Text(&o.target_url) },
	OptionField { name: "format", read: |o| ParamValue::Keyword(o.format.map(|f| f.as_str())) },
	OptionField { name: "user_agent", read: |o| ParamValue::Text(&o.user_agent) },
	OptionField { name: "page_wait", read: |o| ParamValue::Millis(o.page_wait_ms) },
	OptionField { name: "ajax_wait", read: |o| ParamValue::Millis(o.ajax_wait_ms) },
	OptionField { name: "css_click_selector", read: |o| ParamValue::Text(&o.css_click_selector) },
	OptionField { name: "device", read: |o| ParamValue::Keyword(o.device.map(|d| d.as_str())) },
	OptionField { name: "get_cookies", read: |o| ParamValue::Flag(o.get_cookies) },
	OptionField { name: "get_headers", read: |o| ParamValue::Flag(o.get_headers) },
	OptionField { name: "proxy_session", read: |o| ParamValue::Text(&o.proxy_session) },
	OptionField { name: "cookies_session", read: |o| ParamValue::Text(&o.cookies_session) },
	OptionField { name: "screenshot", read: |o| ParamValue::Flag(o.screenshot) },
	OptionField { name: "store", read: |o| ParamValue::Flag(o.store) },
	OptionField { name: "scraper", read: |o| ParamValue::Flag(o.scraper) },
	OptionField { name: "autoparse", read: |o| ParamValue::Flag(o.autoparse) },
	OptionField {
		name: "country",
		read: |o| ParamValue::Keyword(o.country.as_ref().map(|c| c.as_str())),
	},
	OptionField { name: "tor_network", read: |o| ParamValue::Flag(o.tor_network) },
];

/// Ordered `(name, value)` pairs produced by [`RequestOptions::encode`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodedParams(Vec<(&'static str, String)>);
impl EncodedParams {
	/// Returns the value emitted for `name`, if any.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
	}

	/// Iterates pairs in wire order.
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
		self.0.iter().map(|(key, value)| (*key, value.as_str()))
	}

	/// Number of emitted parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when nothing was emitted.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl RequestOptions {
	/// Encodes present fields into ordered query parameters, skipping absent ones.
	pub fn encode(&self) -> EncodedParams {
		EncodedParams(
			OPTION_FIELDS
				.iter()
				.filter_map(|field| {
					field.read(self).render().map(|value| (field.name, value.into_owned()))
				})
				.collect(),
		)
	}
}
