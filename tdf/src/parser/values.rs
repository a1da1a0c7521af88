/*!
# Value parsers (C4, §4.4)

One parser per literal kind. Each consumes the current position and
advances past the terminator.
*/
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::TimeZone as _;
use num_bigint::BigInt;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::Lexer;
use crate::value::{Number, RegexValue, Temporal, Value};

fn collaborate<T, E: std::error::Error + Send + Sync + 'static>(
	lx: &Lexer,
	what: &'static str,
	result: Result<T, E>,
) -> Result<T, ParseError> {
	result.map_err(|e| ParseError::new(lx.position(), ParseErrorKind::Collaborator(what, Box::new(e))))
}

/// Read one escaped or literal character inside a char/string literal,
/// given the literal's delimiter (the delimiter is always escape-able,
/// §4.4).
fn read_escaped_char(lx: &mut Lexer, delimiter: char) -> Result<char, ParseError> {
	let c = lx.read_required("in escaped literal")?;
	if c != '\\' {
		return Ok(c);
	}
	let esc = lx.read_required("after '\\'")?;
	if esc == delimiter {
		return Ok(delimiter);
	}
	if let Some(lit) = tdf_grammar::simple_escape(esc) {
		return Ok(lit);
	}
	if esc == 'u' {
		let hex = lx.read_required_count(4, "in \\u escape")?;
		let cp = u32::from_str_radix(&hex, 16)
			.map_err(|_| ParseError::new(lx.position(), ParseErrorKind::IllegalEscape('u')))?;
		if (0xd800..=0xdbff).contains(&cp) {
			// high surrogate: a low surrogate \uXXXX must follow.
			lx.check('\\', "low surrogate after high surrogate")?;
			lx.check('u', "low surrogate after high surrogate")?;
			let low_hex = lx.read_required_count(4, "in low surrogate \\u escape")?;
			let low = u32::from_str_radix(&low_hex, 16)
				.map_err(|_| ParseError::new(lx.position(), ParseErrorKind::IllegalEscape('u')))?;
			if !(0xdc00..=0xdfff).contains(&low) {
				return Err(ParseError::new(lx.position(), ParseErrorKind::IllegalEscape('u')));
			}
			let combined = 0x10000 + ((cp - 0xd800) << 10) + (low - 0xdc00);
			return char::from_u32(combined)
				.ok_or_else(|| ParseError::new(lx.position(), ParseErrorKind::IllegalEscape('u')));
		}
		return char::from_u32(cp)
			.ok_or_else(|| ParseError::new(lx.position(), ParseErrorKind::IllegalEscape('u')));
	}
	Err(ParseError::new(lx.position(), ParseErrorKind::IllegalEscape(esc)))
}

/// Parse text delimited by `delimiter` on both sides, applying the shared
/// escape table. Used by both the string literal and the `|"id"|` label
/// form.
pub(crate) fn parse_quoted_text(lx: &mut Lexer, delimiter: char) -> Result<String, ParseError> {
	lx.check(delimiter, "at start of quoted text")?;
	let mut out = String::new();
	loop {
		if lx.at_eof() {
			return Err(ParseError::new(lx.position(), ParseErrorKind::UnexpectedEof("in quoted text")));
		}
		if lx.peek() == delimiter {
			lx.check(delimiter, "closing quoted text")?;
			break;
		}
		out.push(read_escaped_char(lx, delimiter)?);
	}
	Ok(out)
}

/// `'c'` — a single code point (§4.4).
pub fn parse_character(lx: &mut Lexer) -> Result<Value, ParseError> {
	lx.check('\'', "at start of character literal")?;
	let c = read_escaped_char(lx, '\'')?;
	lx.check('\'', "closing character literal")?;
	Ok(Value::Character(c))
}

/// `"s"` — a string (§4.4).
pub fn parse_string(lx: &mut Lexer) -> Result<Value, ParseError> {
	Ok(Value::String(parse_quoted_text(lx, '"')?))
}

/// `%...` — base64url, no padding (§4.4).
pub fn parse_binary(lx: &mut Lexer) -> Result<Value, ParseError> {
	lx.check('%', "at start of binary literal")?;
	let text = lx.read_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
	use base64::engine::general_purpose::URL_SAFE_NO_PAD;
	use base64::Engine;
	let bytes = collaborate(lx, "base64 data", URL_SAFE_NO_PAD.decode(text))?;
	Ok(Value::Binary(bytes))
}

/// `^...` — email address (§4.4).
pub fn parse_email(lx: &mut Lexer) -> Result<Value, ParseError> {
	lx.check('^', "at start of email literal")?;
	parse_email_body(lx)
}

fn parse_email_body(lx: &mut Lexer) -> Result<Value, ParseError> {
	let text = lx.read_while(|c| !is_value_terminator(c));
	let email = collaborate(lx, "email address", text.parse::<email_address::EmailAddress>())?;
	Ok(Value::Email(email))
}

/// `+...` — telephone number (§4.4).
pub fn parse_telephone(lx: &mut Lexer) -> Result<Value, ParseError> {
	lx.check('+', "at start of telephone literal")?;
	parse_telephone_body(lx)
}

fn parse_telephone_body(lx: &mut Lexer) -> Result<Value, ParseError> {
	let text = lx.read_while(|c| c.is_ascii_digit() || c == ' ' || c == '-' || c == '(' || c == ')');
	let full = format!("+{}", text);
	let number = collaborate(lx, "telephone number", phonenumber::parse(None, &full))?;
	Ok(Value::Telephone(number))
}

/// `&...` — UUID (§4.4).
pub fn parse_uuid(lx: &mut Lexer) -> Result<Value, ParseError> {
	lx.check('&', "at start of UUID literal")?;
	parse_uuid_body(lx)
}

fn parse_uuid_body(lx: &mut Lexer) -> Result<Value, ParseError> {
	let text = lx.read_while(|c| c.is_ascii_hexdigit() || c == '-');
	let uuid = collaborate(lx, "UUID", uuid::Uuid::parse_str(text))?;
	Ok(Value::Uuid(uuid))
}

/// `>...` — media type (§4.4). Reads until a value/sequence terminator;
/// media types carry no bracketing delimiter of their own.
pub fn parse_media_type(lx: &mut Lexer) -> Result<Value, ParseError> {
	lx.check('>', "at start of media type literal")?;
	let text = lx.read_while(|c| !is_value_terminator(c));
	let mime = collaborate(lx, "media type", text.parse::<mime::Mime>())?;
	Ok(Value::MediaType(mime))
}

/// Characters that end a bare (undelimited) literal's text run: filler,
/// sequence delimiters, and every structural delimiter in the grammar.
fn is_value_terminator(c: char) -> bool {
	matches!(
		c,
		' ' | '\t' | '\n' | '\r' | ',' | ';' | ':' | '=' | '[' | ']' | '{' | '}' | '(' | ')' | '<' | '>' | '|' | '\\'
	) || c == crate::lexer::EOF
}

/// `<...>` — an IRI, or, if the content starts with `^`/`+`/`&`, a
/// bracketed short form of an email/telephone/UUID literal (§4.4).
pub fn parse_iri(lx: &mut Lexer) -> Result<Value, ParseError> {
	lx.check('<', "at start of IRI literal")?;
	let value = match lx.peek() {
		'^' => {
			lx.check('^', "at start of bracketed email")?;
			parse_email_body(lx)?
		}
		'+' => {
			lx.check('+', "at start of bracketed telephone number")?;
			parse_telephone_body(lx)?
		}
		'&' => {
			lx.check('&', "at start of bracketed UUID")?;
			parse_uuid_body(lx)?
		}
		_ => {
			let text = lx.read_until(|c| c == '>' || c == crate::lexer::EOF).to_string();
			let iri = collaborate(lx, "IRI", text.parse::<iri_string::types::IriReferenceString>())?;
			Value::Iri(iri)
		}
	};
	lx.check('>', "closing IRI literal")?;
	Ok(value)
}

/// `/regex/` — a regular expression pattern (§4.4). The delimiter `/` is
/// always escape-able via the shared escape table (`\/`).
pub fn parse_regex(lx: &mut Lexer) -> Result<Value, ParseError> {
	lx.check('/', "at start of regex literal")?;
	let mut pattern = String::new();
	loop {
		if lx.at_eof() {
			return Err(ParseError::new(lx.position(), ParseErrorKind::UnexpectedEof("in regex literal")));
		}
		if lx.peek() == '/' {
			lx.check('/', "closing regex literal")?;
			break;
		}
		pattern.push(read_escaped_char(lx, '/')?);
	}
	let regex = collaborate(lx, "regular expression", RegexValue::new(&pattern))?;
	Ok(Value::Regex(regex))
}

/// `$`? `-`? digits (`.` digits)? ([eE] `-`/`+`? digits)? — number (§4.4
/// "Number grammar").
pub fn parse_number(lx: &mut Lexer) -> Result<Value, ParseError> {
	let forced_decimal = lx.confirm('$');
	let start = lx.mark();
	lx.confirm('-');
	let int_start = lx.mark();
	lx.read_while(|c| c.is_ascii_digit());
	if lx.mark() == int_start {
		return Err(ParseError::new(lx.position(), ParseErrorKind::UnexpectedChar(lx.peek(), "in number")));
	}
	let mut has_fraction = false;
	if lx.peek() == '.' && lx.peek2().is_ascii_digit() {
		has_fraction = true;
		lx.check('.', "in number fraction")?;
		lx.read_while(|c| c.is_ascii_digit());
	}
	let mut has_exponent = false;
	if lx.peek() == 'e' || lx.peek() == 'E' {
		has_exponent = true;
		lx.read_required("in number exponent")?;
		if lx.peek() == '+' || lx.peek() == '-' {
			lx.read_required("in number exponent sign")?;
		}
		let exp_digits_start = lx.mark();
		lx.read_while(|c| c.is_ascii_digit());
		if lx.mark() == exp_digits_start {
			return Err(ParseError::new(lx.position(), ParseErrorKind::UnexpectedChar(lx.peek(), "in number exponent")));
		}
	}
	let end = lx.mark();
	let text = &lx.source()[start..end];

	let number = match (forced_decimal, has_fraction || has_exponent) {
		(true, true) => {
			let d = collaborate(lx, "decimal", BigDecimal::from_str(text))?;
			Number::BigDecimal(d)
		}
		(true, false) => {
			let i = collaborate(lx, "big integer", BigInt::from_str(text))?;
			Number::BigInt(i)
		}
		(false, true) => {
			let d = collaborate(lx, "double", f64::from_str(text))?;
			Number::Double(d)
		}
		(false, false) => match i64::from_str(text) {
			Ok(n) => Number::Long(n),
			Err(_) => {
				let i = collaborate(lx, "big integer", BigInt::from_str(text))?;
				Number::BigInt(i)
			}
		},
	};
	Ok(Value::Number(number))
}

/// `@...` — one of nine temporal subtypes, discriminated by partial-match
/// lookahead (§4.4 "Temporal dispatch").
pub fn parse_temporal(lx: &mut Lexer) -> Result<Value, ParseError> {
	lx.check('@', "at start of temporal literal")?;
	let temporal = if lx.peek() == '-' {
		parse_month_day(lx)?
	} else {
		let digit_run_start = lx.mark();
		lx.read_while(|c| c.is_ascii_digit());
		let len = lx.mark() - digit_run_start;
		match len {
			4 => parse_from_year(lx, digit_run_start)?,
			2 => parse_from_hour(lx, digit_run_start)?,
			_ => return Err(ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape)),
		}
	};
	Ok(Value::Temporal(temporal))
}

fn parse_month_day(lx: &mut Lexer) -> Result<Temporal, ParseError> {
	lx.check('-', "in --MM-DD literal")?;
	lx.check('-', "in --MM-DD literal")?;
	let month = read_fixed_digits(lx, 2, "month")?;
	lx.check('-', "between month and day")?;
	let day = read_fixed_digits(lx, 2, "day")?;
	Ok(Temporal::MonthDay(month, day))
}

fn read_fixed_digits(lx: &mut Lexer, n: usize, what: &'static str) -> Result<u32, ParseError> {
	let text = lx.read_required_count(n, "in temporal literal")?;
	text.parse().map_err(|_| ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape)).map(|v: u32| {
		let _ = what;
		v
	})
}

fn parse_from_year(lx: &mut Lexer, year_start: usize) -> Result<Temporal, ParseError> {
	let year: i32 = lx.source()[year_start..lx.mark()]
		.parse()
		.map_err(|_| ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape))?;
	if lx.peek() != '-' {
		return Ok(Temporal::Year(year));
	}
	lx.check('-', "between year and month")?;
	let month = read_fixed_digits(lx, 2, "month")?;
	if lx.peek() != '-' {
		return Ok(Temporal::YearMonth(year, month));
	}
	lx.check('-', "between month and day")?;
	let day = read_fixed_digits(lx, 2, "day")?;
	let date = chrono::NaiveDate::from_ymd_opt(year, month, day)
		.ok_or_else(|| ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape))?;
	if lx.peek() != 'T' {
		return Ok(Temporal::LocalDate(date));
	}
	lx.check('T', "at start of time-of-day tail")?;
	parse_datetime_tail(lx, date)
}

fn parse_from_hour(lx: &mut Lexer, hour_start: usize) -> Result<Temporal, ParseError> {
	let hour: u32 = lx.source()[hour_start..lx.mark()]
		.parse()
		.map_err(|_| ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape))?;
	lx.check(':', "between hour and minute")?;
	let minute = read_fixed_digits(lx, 2, "minute")?;
	let mut second = 0;
	let mut nanos = 0;
	if lx.confirm(':') {
		second = read_fixed_digits(lx, 2, "second")?;
		if lx.confirm('.') {
			let frac_start = lx.mark();
			lx.read_while(|c| c.is_ascii_digit());
			let frac = &lx.source()[frac_start..lx.mark()];
			let mut digits = frac.to_string();
			digits.truncate(9);
			while digits.len() < 9 {
				digits.push('0');
			}
			nanos = digits.parse().unwrap_or(0);
		}
	}
	let time = chrono::NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
		.ok_or_else(|| ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape))?;
	parse_time_tail(lx, time)
}

fn parse_time_tail(lx: &mut Lexer, time: chrono::NaiveTime) -> Result<Temporal, ParseError> {
	match lx.peek() {
		'Z' => {
			lx.check('Z', "at UTC marker")?;
			Ok(Temporal::OffsetTime(time, chrono::FixedOffset::east_opt(0).unwrap()))
		}
		'+' | '-' => {
			let offset = parse_offset(lx)?;
			Ok(Temporal::OffsetTime(time, offset))
		}
		_ => Ok(Temporal::LocalTime(time)),
	}
}

fn parse_datetime_tail(lx: &mut Lexer, date: chrono::NaiveDate) -> Result<Temporal, ParseError> {
	let hour_start = lx.mark();
	let hour: u32 = {
		lx.read_while(|c| c.is_ascii_digit());
		lx.source()[hour_start..lx.mark()]
			.parse()
			.map_err(|_| ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape))?
	};
	lx.check(':', "between hour and minute")?;
	let minute = read_fixed_digits(lx, 2, "minute")?;
	let mut second = 0;
	let mut nanos = 0;
	if lx.confirm(':') {
		second = read_fixed_digits(lx, 2, "second")?;
		if lx.confirm('.') {
			let frac_start = lx.mark();
			lx.read_while(|c| c.is_ascii_digit());
			let frac = &lx.source()[frac_start..lx.mark()];
			let mut digits = frac.to_string();
			digits.truncate(9);
			while digits.len() < 9 {
				digits.push('0');
			}
			nanos = digits.parse().unwrap_or(0);
		}
	}
	let time = chrono::NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
		.ok_or_else(|| ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape))?;
	let naive = chrono::NaiveDateTime::new(date, time);

	match lx.peek() {
		'Z' => {
			lx.check('Z', "at UTC marker")?;
			let instant = chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(naive, chrono::Utc);
			if lx.peek() == '[' {
				let tz = parse_zone_designation(lx)?;
				let fixed = instant.with_timezone(&tz).fixed_offset();
				return Ok(Temporal::ZonedDateTime(fixed, tz));
			}
			Ok(Temporal::Instant(instant))
		}
		'+' | '-' => {
			let offset = parse_offset(lx)?;
			let fixed = offset
				.from_local_datetime(&naive)
				.single()
				.ok_or_else(|| ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape))?;
			if lx.peek() == '[' {
				let tz = parse_zone_designation(lx)?;
				return Ok(Temporal::ZonedDateTime(fixed, tz));
			}
			Ok(Temporal::OffsetDateTime(fixed))
		}
		_ => Ok(Temporal::LocalDateTime(naive)),
	}
}

fn parse_offset(lx: &mut Lexer) -> Result<chrono::FixedOffset, ParseError> {
	let sign = if lx.confirm('+') {
		1
	} else {
		lx.check('-', "at start of offset")?;
		-1
	};
	let hour = read_fixed_digits(lx, 2, "offset hour")?;
	lx.check(':', "in offset")?;
	let minute = read_fixed_digits(lx, 2, "offset minute")?;
	let total_seconds = sign * (hour as i32 * 3600 + minute as i32 * 60);
	chrono::FixedOffset::east_opt(total_seconds)
		.ok_or_else(|| ParseError::new(lx.position(), ParseErrorKind::InvalidTemporalShape))
}

fn parse_zone_designation(lx: &mut Lexer) -> Result<chrono_tz::Tz, ParseError> {
	lx.check('[', "at start of zone designation")?;
	let text = lx.read_until(|c| c == ']' || c == crate::lexer::EOF);
	let tz: chrono_tz::Tz = collaborate(lx, "time zone", text.parse::<chrono_tz::Tz>())?;
	lx.check(']', "closing zone designation")?;
	Ok(tz)
}
