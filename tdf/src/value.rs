/*!
# Literal value kinds (§3 DATA MODEL, "Literal value kinds")

The closed set of literal kinds TDF knows about. Each variant is backed by
the matching collaborator type from §6 rather than a hand-rolled
representation.
*/
use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use email_address::EmailAddress;
use iri_string::types::IriReferenceString;
use mime::Mime;
use num_bigint::BigInt;
use phonenumber::PhoneNumber;
use uuid::Uuid;

/// A compiled regular expression literal.
///
/// Wraps [`regex::Regex`], which has neither `PartialEq` nor `Eq`; equality
/// here is defined as pattern-source equality, which is what §8's
/// "Parse-safe escaping" and round-trip properties actually need.
#[derive(Debug, Clone)]
pub struct RegexValue(regex::Regex);

impl RegexValue {
	pub fn new(pattern: &str) -> Result<Self, regex::Error> {
		Ok(RegexValue(regex::Regex::new(pattern)?))
	}

	pub fn as_regex(&self) -> &regex::Regex {
		&self.0
	}

	pub fn pattern(&self) -> &str {
		self.0.as_str()
	}
}

impl PartialEq for RegexValue {
	fn eq(&self, other: &Self) -> bool {
		self.pattern() == other.pattern()
	}
}

impl Eq for RegexValue {}

/// Numeric literal kinds (§4.4 "Number grammar").
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
	/// A fixed-width integer that fit in `i64`, typed `integer`.
	Long(i64),
	/// An integer that overflowed `i64`, or was `$`-prefixed with no
	/// fraction/exponent, typed `integer`.
	BigInt(BigInt),
	/// A floating-point number with no `$` prefix, typed `number`.
	Double(f64),
	/// A `$`-prefixed number with a fraction or exponent, typed `decimal`.
	BigDecimal(BigDecimal),
}

/// Temporal literal kinds, discriminated at parse time by partial-match
/// lookahead (§4.4 "Temporal dispatch").
#[derive(Debug, Clone, PartialEq)]
pub enum Temporal {
	Year(i32),
	YearMonth(i32, u32),
	MonthDay(u32, u32),
	LocalDate(NaiveDate),
	LocalTime(NaiveTime),
	OffsetTime(NaiveTime, FixedOffset),
	LocalDateTime(NaiveDateTime),
	Instant(DateTime<Utc>),
	OffsetDateTime(DateTime<FixedOffset>),
	ZonedDateTime(DateTime<FixedOffset>, Tz),
}

impl Temporal {
	/// The subtype name, as used in error messages and in deciding
	/// round-trip fidelity (§8 "Temporal subtype fidelity").
	pub fn subtype_name(&self) -> &'static str {
		match self {
			Temporal::Year(_) => "Year",
			Temporal::YearMonth(..) => "YearMonth",
			Temporal::MonthDay(..) => "MonthDay",
			Temporal::LocalDate(_) => "LocalDate",
			Temporal::LocalTime(_) => "LocalTime",
			Temporal::OffsetTime(..) => "OffsetTime",
			Temporal::LocalDateTime(_) => "LocalDateTime",
			Temporal::Instant(_) => "Instant",
			Temporal::OffsetDateTime(_) => "OffsetDateTime",
			Temporal::ZonedDateTime(..) => "ZonedDateTime",
		}
	}
}

/// The closed set of literal value kinds (§3).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Binary(Vec<u8>),
	Boolean(bool),
	Character(char),
	Email(EmailAddress),
	Iri(IriReferenceString),
	MediaType(Mime),
	Number(Number),
	Regex(RegexValue),
	String(String),
	Telephone(PhoneNumber),
	Temporal(Temporal),
	Uuid(Uuid),
}

impl Value {
	/// A short name for the value's kind, for error messages.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Value::Binary(_) => "binary",
			Value::Boolean(_) => "boolean",
			Value::Character(_) => "character",
			Value::Email(_) => "email address",
			Value::Iri(_) => "IRI",
			Value::MediaType(_) => "media type",
			Value::Number(_) => "number",
			Value::Regex(_) => "regular expression",
			Value::String(_) => "string",
			Value::Telephone(_) => "telephone number",
			Value::Temporal(_) => "temporal",
			Value::Uuid(_) => "UUID",
		}
	}
}

/// Debug-oriented rendering, **not** the canonical TDF surface syntax —
/// that's [`crate::writer`]'s job, since it alone knows about alias
/// generation and formatting knobs. This exists for error messages and
/// `{:?}`-adjacent diagnostics.
impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Binary(bytes) => write!(f, "%{}", base64_url_no_pad(bytes)),
			Value::Boolean(b) => write!(f, "{}", b),
			Value::Character(c) => write!(f, "'{}'", c),
			Value::Email(e) => write!(f, "^{}", e),
			Value::Iri(iri) => write!(f, "<{}>", iri),
			Value::MediaType(m) => write!(f, ">{}", m),
			Value::Number(n) => fmt::Display::fmt(n, f),
			Value::Regex(r) => write!(f, "/{}/", r.pattern()),
			Value::String(s) => write!(f, "{:?}", s),
			Value::Telephone(t) => write!(f, "+{:?}", t),
			Value::Temporal(t) => write!(f, "@{:?}", t),
			Value::Uuid(u) => write!(f, "&{}", u),
		}
	}
}

impl fmt::Display for Number {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Number::Long(n) => write!(f, "{}", n),
			Number::BigInt(n) => write!(f, "${}", n),
			Number::Double(n) => write!(f, "{}", n),
			Number::BigDecimal(n) => write!(f, "${}", n),
		}
	}
}

pub(crate) fn base64_url_no_pad(bytes: &[u8]) -> String {
	use base64::engine::general_purpose::URL_SAFE_NO_PAD;
	use base64::Engine;
	URL_SAFE_NO_PAD.encode(bytes)
}
