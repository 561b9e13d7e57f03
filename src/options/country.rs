//! Two-letter country codes accepted by the crawler's geolocation parameter.

// self
use crate::{_prelude::*, error::ConfigError};

/// Validated ISO 3166-1 alpha-2 country code, normalized to upper case.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country([u8; 2]);
impl Country {
	/// Austria.
	pub const AUSTRIA: Self = Self(*b"AT");
	/// Australia.
	pub const AUSTRALIA: Self = Self(*b"AU");
	/// Belarus.
	pub const BELARUS: Self = Self(*b"BY");
	/// Canada.
	pub const CANADA: Self = Self(*b"CA");
	/// China.
	pub const CHINA: Self = Self(*b"CN");
	/// Czechia.
	pub const CZECHIA: Self = Self(*b"CZ");
	/// Germany.
	pub const GERMANY: Self = Self(*b"DE");
	/// Estonia.
	pub const ESTONIA: Self = Self(*b"EE");
	/// Spain.
	pub const SPAIN: Self = Self(*b"ES");
	/// France.
	pub const FRANCE: Self = Self(*b"FR");
	/// United Kingdom.
	pub const UNITED_KINGDOM: Self = Self(*b"GB");
	/// Hong Kong.
	pub const HONG_KONG: Self = Self(*b"HK");
	/// Israel.
	pub const ISRAEL: Self = Self(*b"IL");
	/// India.
	pub const INDIA: Self = Self(*b"IN");
	/// Japan.
	pub const JAPAN: Self = Self(*b"JP");
	/// Kuwait.
	pub const KUWAIT: Self = Self(*b"KW");
	/// Latvia.
	pub const LATVIA: Self = Self(*b"LV");
	/// Moldova.
	pub const MOLDOVA: Self = Self(*b"MD");
	/// Netherlands.
	pub const NETHERLANDS: Self = Self(*b"NL");
	/// Poland.
	pub const POLAND: Self = Self(*b"PL");
	/// Romania.
	pub const ROMANIA: Self = Self(*b"RO");
	/// Russia.
	pub const RUSSIA: Self = Self(*b"RU");
	/// Turkey.
	pub const TURKEY: Self = Self(*b"TR");
	/// Ukraine.
	pub const UKRAINE: Self = Self(*b"UA");
	/// United States.
	pub const UNITED_STATES: Self = Self(*b"US");

	/// Parses a two-letter code, accepting either case.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ConfigError> {
		let view = value.as_ref();

		match view.as_bytes() {
			[a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() =>
				Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()])),
			_ => Err(ConfigError::InvalidCountry { value: view.to_owned() }),
		}
	}

	/// Returns the upper-case code.
	pub fn as_str(&self) -> &str {
		// Both bytes are ASCII letters by construction.
		std::str::from_utf8(&self.0).unwrap_or_default()
	}
}
impl AsRef<str> for Country {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl From<Country> for String {
	fn from(value: Country) -> Self {
		value.as_str().to_owned()
	}
}
impl TryFrom<String> for Country {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for Country {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for Country {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Country({})", self.as_str())
	}
}
impl Display for Country {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
