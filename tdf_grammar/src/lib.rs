/*!
# Grammar constants and validators for TDF

This is a supplementary crate for [`tdf`](https://docs.rs/tdf). It is
factored out of the main crate so that the fixed delimiter alphabet,
name-token rules and escape tables have exactly one definition, shared by
the lexer (scanning raw input) and the serializer (deciding what must be
escaped on the way out).
*/
use std::fmt;

pub mod selectors;

use selectors::{is_name_token_begin, is_name_token_char};

/// Error produced while validating an already-lexed piece of text against a
/// TDF grammar production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// A name-token was empty.
	Empty,
	/// An invalid character was encountered at the given index.
	InvalidChar(usize, char),
	/// A handle had no segments, or a `/`-qualified handle was missing its
	/// namespace-local half.
	MalformedHandle,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("name-token must not be empty"),
			Self::InvalidChar(pos, c) => {
				write!(f, "character U+{:04x} not allowed at byte {}", *c as u32, pos)
			}
			Self::MalformedHandle => f.write_str("handle is missing a required segment"),
		}
	}
}

impl std::error::Error for Error {}

/// Check whether `s` is a valid name-token: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// ```
/// use tdf_grammar::validate_name_token;
/// assert!(validate_name_token("creator").is_ok());
/// assert!(validate_name_token("2fast").is_err());
/// assert!(validate_name_token("").is_err());
/// ```
pub fn validate_name_token(s: &str) -> Result<(), Error> {
	let mut chars = s.char_indices();
	match chars.next() {
		None => return Err(Error::Empty),
		Some((i, c)) if !is_name_token_begin(c) => return Err(Error::InvalidChar(i, c)),
		_ => {}
	}
	for (i, c) in chars {
		if !is_name_token_char(c) {
			return Err(Error::InvalidChar(i, c));
		}
	}
	Ok(())
}

/// Check whether `s` is a valid handle body: one or more name-tokens
/// separated by `-`, optionally preceded by `alias/`, optionally suffixed by
/// `+`, optionally suffixed by `#idToken`.
///
/// This validates already-segmented text (the lexer does the segmenting);
/// it exists so callers constructing a `Handle` from outside the parser
/// (e.g. the serializer re-deriving a handle for a tag) go through the same
/// check as parsed input.
///
/// ```
/// use tdf_grammar::validate_handle;
/// assert!(validate_handle("urf/dc-creator").is_ok());
/// assert!(validate_handle("many+").is_ok());
/// assert!(validate_handle("Ex#bar").is_ok());
/// assert!(validate_handle("").is_err());
/// assert!(validate_handle("-leading").is_err());
/// ```
pub fn validate_handle(s: &str) -> Result<(), Error> {
	let (namespaced, rest) = match s.split_once('/') {
		Some((alias, rest)) => {
			validate_name_token(alias)?;
			(true, rest)
		}
		None => (false, s),
	};
	let (rest, _id) = match rest.split_once('#') {
		Some((rest, id)) => {
			validate_name_token(id)?;
			(rest, Some(id))
		}
		None => (rest, None),
	};
	let rest = rest.strip_suffix('+').unwrap_or(rest);
	if rest.is_empty() {
		return Err(if namespaced { Error::MalformedHandle } else { Error::Empty });
	}
	for segment in rest.split('-') {
		validate_name_token(segment)?;
	}
	Ok(())
}

/// Escape table shared by character and string literals (§4.4).
///
/// Returns the character an escape sequence denotes, given the character
/// that follows the backslash. `\u` is handled separately by the caller
/// since it consumes four more characters.
pub fn simple_escape(c: char) -> Option<char> {
	match c {
		'\\' => Some('\\'),
		'/' => Some('/'),
		'b' => Some('\u{8}'),
		'f' => Some('\u{c}'),
		'n' => Some('\n'),
		'r' => Some('\r'),
		't' => Some('\t'),
		'v' => Some('\u{b}'),
		_ => None,
	}
}

/// Inverse of [`simple_escape`] for characters that have a short escape
/// form, excluding `\/` (which is only needed when the char is the
/// containing delimiter — the serializer decides that itself).
pub fn escape_for(c: char) -> Option<char> {
	match c {
		'\\' => Some('\\'),
		'\u{8}' => Some('b'),
		'\u{c}' => Some('f'),
		'\n' => Some('n'),
		'\r' => Some('r'),
		'\t' => Some('t'),
		'\u{b}' => Some('v'),
		_ => None,
	}
}

/// Whether `c` must be escaped (as `\uXXXX`) in a string/character literal
/// regardless of which delimiter is in use: C0 controls other than the ones
/// with short escapes.
pub fn needs_unicode_escape(c: char) -> bool {
	(c as u32) < 0x20 && simple_escape(c).is_none() && escape_for(c).is_none()
}

/// The fixed namespace under which bare handles resolve (§6 "Default
/// namespace").
pub const DEFAULT_NAMESPACE: &str = "https://urf.name/";

/// The fixed namespace under which properties introduced without a
/// declared namespace alias live (§6 "Ad-hoc namespace").
pub const AD_HOC_NAMESPACE: &str = "https://urf.name/ad-hoc/";

/// Media type of the general (root-sequence) document variant.
pub const MEDIA_TYPE_GENERAL: &str = "text/urf";
/// Media type of the properties-only document variant.
pub const MEDIA_TYPE_PROPERTIES: &str = "text/urf-properties";
/// Filename extension of the general document variant.
pub const EXTENSION_GENERAL: &str = "urf";
/// Filename extension of the properties-only document variant.
pub const EXTENSION_PROPERTIES: &str = "urfprops";

/// Synthetic property tag used for list items (§4.5 "Collection parsing"):
/// `process_statement(list, elementTypeTag#i, itemValue)`, where `#i` is the
/// item's 0-based index, appended via [`crate::DEFAULT_NAMESPACE`]-relative
/// fragment construction by the caller.
///
/// These four constants are internal to the event-sink representation of
/// collections — they never appear in the textual surface syntax, which
/// represents collections purely positionally (`[...]`, `(...)`, `{...}`).
pub const COLLECTION_ELEMENT_PROPERTY: &str = "https://urf.name/rdf/element";
/// Synthetic property tag for set membership and for a map's edges to its
/// synthetic entry resources (§4.5: "a member-property from the map to the
/// entry"). The same tag is reused for both, since both express plain
/// membership with no further structure.
pub const COLLECTION_MEMBER_PROPERTY: &str = "https://urf.name/rdf/member";
/// Synthetic property tag from a map entry resource to its key.
pub const MAP_ENTRY_KEY_PROPERTY: &str = "https://urf.name/rdf/key";
/// Synthetic property tag from a map entry resource to its value.
pub const MAP_ENTRY_VALUE_PROPERTY: &str = "https://urf.name/rdf/value";

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn name_token_smoketest() {
		assert!(validate_name_token("foobar").is_ok());
		assert!(validate_name_token("_foo").is_ok());
		assert!(validate_name_token("").is_err());
		assert!(validate_name_token("1abc").is_err());
		assert!(validate_name_token("foo bar").is_err());
	}

	#[test]
	fn handle_smoketest() {
		assert!(validate_handle("dc-creator").is_ok());
		assert!(validate_handle("urf/dc-creator").is_ok());
		assert!(validate_handle("many+").is_ok());
		assert!(validate_handle("Ex#bar").is_ok());
		assert!(validate_handle("true").is_ok());
		assert!(validate_handle("").is_err());
		assert!(validate_handle("/bare").is_err());
	}

	#[test]
	fn escape_roundtrip() {
		for &(esc, lit) in &[('n', '\n'), ('t', '\t'), ('r', '\r'), ('\\', '\\')] {
			assert_eq!(simple_escape(esc), Some(lit));
			assert_eq!(escape_for(lit), Some(esc));
		}
		assert!(needs_unicode_escape('\u{1}'));
		assert!(!needs_unicode_escape('a'));
	}
}
