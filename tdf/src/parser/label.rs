/*!
# Label & reference resolver (C3, §4.3)
*/
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::Lexer;
use crate::namespace::NamespaceRegistry;
use crate::strings::{Handle, NameToken};
use crate::tag::Tag;

use tdf_grammar::selectors::{is_name_token_begin, is_name_token_char};

/// The three label forms (§4.3 "Label parsing").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
	Tag(Tag),
	Id(String),
	Alias(NameToken),
}

/// Parse a `|...|` label. The current character must be `|`.
pub fn parse_label(lx: &mut Lexer) -> Result<Label, ParseError> {
	lx.check('|', "at start of label")?;
	let label = match lx.peek() {
		'<' => {
			let text = parse_iri_literal_text(lx)?;
			let tag = Tag::from_iri_literal(&text).map_err(|e| e.reposition(lx.position()))?;
			Label::Tag(tag)
		}
		'"' => {
			let s = super::values::parse_quoted_text(lx, '"')?;
			Label::Id(s)
		}
		_ => {
			let name = parse_name_token(lx, "in label")?;
			Label::Alias(NameToken::try_from(name.as_str()).map_err(|_| {
				ParseError::new(lx.position(), ParseErrorKind::InvalidSyntax("invalid alias name-token"))
			})?)
		}
	};
	lx.check('|', "closing label")?;
	Ok(label)
}

/// Parse the raw text of an IRI literal `<...>`, without the surrounding
/// angle brackets. Shared between label parsing (`|<...>|`) and the IRI
/// value parser (§4.4), which additionally supports `^`/`+`/`&`
/// redirection inside the brackets.
pub(crate) fn parse_iri_literal_text(lx: &mut Lexer) -> Result<String, ParseError> {
	lx.check('<', "at start of IRI literal")?;
	let text = lx.read_until(|c| c == '>' || c == crate::lexer::EOF).to_string();
	lx.check('>', "closing IRI literal")?;
	Ok(text)
}

/// Parse a bare name-token: `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn parse_name_token(lx: &mut Lexer, ctx: &'static str) -> Result<String, ParseError> {
	let c = lx.peek();
	if !is_name_token_begin(c) {
		return Err(ParseError::new(lx.position(), ParseErrorKind::UnexpectedChar(c, ctx)));
	}
	let start = lx.mark();
	lx.read_while(is_name_token_char);
	let end = lx.mark();
	Ok(lx.source()[start..end].to_string())
}

/// Parse a handle: name-token, optional `/name-token`, zero or more
/// `-name-token`, optional `+`, optional `#idToken` (§4.3 "Handle
/// parsing").
pub fn parse_handle(lx: &mut Lexer) -> Result<Handle, ParseError> {
	let start = lx.mark();
	let c = lx.peek();
	if !is_name_token_begin(c) {
		return Err(ParseError::new(lx.position(), ParseErrorKind::UnexpectedChar(c, "at start of handle")));
	}
	lx.read_while(is_name_token_char);
	if lx.peek() == '/' {
		lx.check('/', "in namespace-qualified handle")?;
		let c = lx.peek();
		if !is_name_token_begin(c) {
			return Err(ParseError::new(
				lx.position(),
				ParseErrorKind::UnexpectedChar(c, "after '/' in handle"),
			));
		}
		lx.read_while(is_name_token_char);
	}
	while lx.peek() == '-' {
		let mark = lx.mark();
		lx.check('-', "in handle segment").ok();
		let c = lx.peek();
		if !is_name_token_begin(c) {
			// not a segment separator after all (e.g. trailing `-` is
			// invalid); back off and let the caller see the plain `-`.
			lx.reset(mark);
			break;
		}
		lx.read_while(is_name_token_char);
	}
	lx.confirm('+');
	if lx.confirm('#') {
		let c = lx.peek();
		if !is_name_token_begin(c) {
			return Err(ParseError::new(
				lx.position(),
				ParseErrorKind::UnexpectedChar(c, "in #idToken"),
			));
		}
		lx.read_while(is_name_token_char);
	}
	let end = lx.mark();
	let text = &lx.source()[start..end];
	Handle::try_from(text)
		.map_err(|_| ParseError::new(lx.position(), ParseErrorKind::InvalidSyntax("malformed handle")))
}

/// Resolve a handle to a tag via the namespace registry and the fixed
/// default namespace (§3 "Handle", §4.8).
pub fn resolve_handle(handle: &Handle, registry: &NamespaceRegistry, lx: &Lexer) -> Result<Tag, ParseError> {
	let alias = handle.namespace_alias();
	let local = handle.segments();
	let base = registry.resolve(alias, local).ok_or_else(|| {
		ParseError::new(
			lx.position(),
			ParseErrorKind::UnregisteredAlias(alias.unwrap_or("").to_string()),
		)
	})?;
	let full = match handle.id_token() {
		Some(id) => format!("{}#{}", base, id),
		None => base,
	};
	Tag::parse(&full).map_err(|e| e.reposition(lx.position()))
}

/// §4.3 "Tag reference": `|<...>|` label, or a handle resolved via the
/// registry.
pub fn parse_tag_ref(lx: &mut Lexer, registry: &NamespaceRegistry) -> Result<Tag, ParseError> {
	Ok(parse_tag_ref_n_ary(lx, registry)?.0)
}

/// Like [`parse_tag_ref`], but also reports whether the reference was a
/// handle carrying the `+` n-ary marker (§4.3): a property declared with
/// this marker may be assigned a comma-separated value sequence rather
/// than exactly one value. Label-form tag references are never n-ary.
pub fn parse_tag_ref_n_ary(lx: &mut Lexer, registry: &NamespaceRegistry) -> Result<(Tag, bool), ParseError> {
	if lx.peek() == '|' {
		match parse_label(lx)? {
			Label::Tag(tag) => Ok((tag, false)),
			_ => Err(ParseError::new(lx.position(), ParseErrorKind::NonTagLabel)),
		}
	} else {
		let handle = parse_handle(lx)?;
		let tag = resolve_handle(&handle, registry, lx)?;
		Ok((tag, handle.is_n_ary()))
	}
}

