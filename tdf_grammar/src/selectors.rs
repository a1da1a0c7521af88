/*!
# Character classes for TDF grammar productions

Mirrors the character-selector style used for the XML `Name`/`NCName`
productions in the teacher crate: small, composable predicates over `char`,
with no allocation.
*/

/// First character of a name-token: an ASCII letter or underscore.
///
/// Name-tokens back handle segments, aliases and `idToken` suffixes; they
/// are deliberately far more restrictive than XML `Name` since they must be
/// unambiguous against the begin-character dispatch table in the resource
/// parser.
pub fn is_name_token_begin(c: char) -> bool {
	c.is_ascii_alphabetic() || c == '_'
}

/// Non-leading character of a name-token.
pub fn is_name_token_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

/// Horizontal whitespace: space and tab, but not line endings.
///
/// Filler treats line endings specially (they participate in sequence
/// delimiting), so this selector exists separately from `is_line_break`.
pub fn is_horizontal_whitespace(c: char) -> bool {
	c == ' ' || c == '\t'
}

/// `\n` or `\r`; `\r\n` is handled by the lexer as a single line break.
pub fn is_line_break(c: char) -> bool {
	c == '\n' || c == '\r'
}

/// Any filler character: horizontal whitespace or a line break.
///
/// Comments are not characters and are handled separately by the lexer's
/// `skip_filler` routine.
pub fn is_filler_whitespace(c: char) -> bool {
	is_horizontal_whitespace(c) || is_line_break(c)
}

/// Hex digit, for `\uXXXX` escapes.
pub fn is_hex_digit(c: char) -> bool {
	c.is_ascii_hexdigit()
}

/// Begin-characters that start a value per the §4.4 dispatch table.
///
/// Used by the resource parser to decide, without consuming input, which
/// literal/compound parser to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueBegin {
	Binary,
	Character,
	Email,
	Iri,
	MediaType,
	Number,
	Regex,
	String,
	Telephone,
	Temporal,
	Uuid,
	List,
	Map,
	Set,
	Object,
	Handle,
}

/// Classify the current lookahead character per the begin-character table
/// in §4.4. Returns `None` if `c` cannot begin a value.
pub fn classify_value_begin(c: char) -> Option<ValueBegin> {
	use ValueBegin::*;
	match c {
		'%' => Some(Binary),
		'\'' => Some(Character),
		'^' => Some(Email),
		'<' => Some(Iri),
		'>' => Some(MediaType),
		'$' => Some(Number),
		c if c.is_ascii_digit() || c == '-' => Some(Number),
		'/' => Some(Regex),
		'"' => Some(String),
		'+' => Some(Telephone),
		'@' => Some(Temporal),
		'&' => Some(Uuid),
		'[' => Some(List),
		'{' => Some(Map),
		'(' => Some(Set),
		'*' => Some(Object),
		c if is_name_token_begin(c) => Some(Handle),
		_ => None,
	}
}
