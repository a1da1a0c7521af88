/*!
# Resource parser (C5, §4.5) and document framing

Ties the lexer (C1), label/reference resolver (C3) and value parsers (C4)
together into the recursive-descent parse of a whole document, driving a
user-supplied [`crate::sink::Processor`] (C6).

Unlike the teacher's incremental, feedable [`crate::driver`]-style state
machine (built for streaming XML over a socket), this parser is a single
synchronous pass over a borrowed `&str` — per §5, a parser instance handles
exactly one document and is not re-entrant, so there is no reason to split
parsing across multiple `feed()` calls the way `rxml` does for sources that
arrive in chunks.
*/
pub mod label;
pub mod values;

use std::convert::Infallible;

use crate::error::{ParseError, ParseErrorKind, Position};
use crate::lexer::{Lexer, SequenceState};
use crate::namespace::NamespaceRegistry;
use crate::resource::Document;
use crate::sink::{DocumentError, GraphBuilder, Processor, ResourceShape};
use crate::strings::NameToken;
use crate::tag::Tag;
use crate::value::Value;

use label::{parse_handle, parse_label, parse_tag_ref_n_ary, Label};

use tdf_grammar::selectors::{classify_value_begin, is_name_token_begin, ValueBegin};
use tdf_grammar::{
	COLLECTION_ELEMENT_PROPERTY, COLLECTION_MEMBER_PROPERTY, MAP_ENTRY_KEY_PROPERTY, MAP_ENTRY_VALUE_PROPERTY,
	MEDIA_TYPE_GENERAL, MEDIA_TYPE_PROPERTIES,
};

use crate::resource::CollectionKind;

/// Which of the two body shapes (§6 "Media types") a document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentVariant {
	/// `rootSeq`: a top-level sequence of resources, each reported as a
	/// root.
	General,
	/// `propertiesBody`: a sequence of `propertyHandle=value` pairs applied
	/// to one implicit blank root.
	PropertiesOnly,
}

impl DocumentVariant {
	/// Full MIME-style media type (§6), as it would appear after `===` if a
	/// header spelled it out in full rather than using the abbreviated form.
	pub fn media_type(&self) -> &'static str {
		match self {
			DocumentVariant::General => MEDIA_TYPE_GENERAL,
			DocumentVariant::PropertiesOnly => MEDIA_TYPE_PROPERTIES,
		}
	}

	/// The abbreviated header token this crate's own serializer emits (§6
	/// "file extension doubling as an abbreviated media type").
	pub fn abbreviated_media_type(&self) -> &'static str {
		match self {
			DocumentVariant::General => tdf_grammar::EXTENSION_GENERAL,
			DocumentVariant::PropertiesOnly => "urf-properties",
		}
	}
}

/// Parser-wide configuration knobs.
///
/// `allow_description_on_literals` resolves the §9 open question ("the
/// samples and comments disagree on whether a description may follow a
/// non-object value... Preserve the pass-through flag but surface the
/// choice in configuration"): when `true` (the default, matching the
/// unconditional application the source code shows in most places), a `:`
/// immediately following *any* parsed value — literal or compound — is
/// parsed as a description and attached via [`Processor::process_statement`]
/// calls against that value's resource handle. When `false`, only compound
/// (object/collection) resources may carry a trailing description.
#[derive(Debug, Clone)]
pub struct ParserOptions {
	pub allow_description_on_literals: bool,
	/// Body shape to expect if the document carries no header, or if the
	/// header's media type does not match either known variant (§4.5
	/// "the body media type must match the caller's expected variant, else
	/// defaults to the canonical one").
	pub expected_variant: DocumentVariant,
}

impl Default for ParserOptions {
	fn default() -> Self {
		ParserOptions {
			allow_description_on_literals: true,
			expected_variant: DocumentVariant::General,
		}
	}
}

/// The resource parser (C5): owns the lexer, the namespace registry it
/// populates from the header, the label table (§3 "Lifecycles": "the
/// parser's internal alias table lives only for the parse"), and the
/// [`Processor`] it drives.
pub struct Parser<'a, P: Processor> {
	lx: Lexer<'a>,
	pub(crate) registry: NamespaceRegistry,
	pub(crate) sink: P,
	options: ParserOptions,
	alias_table: std::collections::HashMap<NameToken, P::Resource>,
	tag_table: std::collections::HashMap<Tag, P::Resource>,
	element_property: Tag,
	member_property: Tag,
	map_key_property: Tag,
	map_value_property: Tag,
}

impl<'a, P: Processor> Parser<'a, P> {
	pub fn new(input: &'a str, sink: P, options: ParserOptions) -> Self {
		Parser {
			lx: Lexer::new(input),
			registry: NamespaceRegistry::new(),
			sink,
			options,
			alias_table: std::collections::HashMap::new(),
			tag_table: std::collections::HashMap::new(),
			element_property: Tag::parse(COLLECTION_ELEMENT_PROPERTY).expect("valid built-in tag"),
			member_property: Tag::parse(COLLECTION_MEMBER_PROPERTY).expect("valid built-in tag"),
			map_key_property: Tag::parse(MAP_ENTRY_KEY_PROPERTY).expect("valid built-in tag"),
			map_value_property: Tag::parse(MAP_ENTRY_VALUE_PROPERTY).expect("valid built-in tag"),
		}
	}

	/// Seed the namespace registry externally (e.g. well-known aliases the
	/// caller wants available even if the document's own header doesn't
	/// declare them). Must be called before [`Parser::parse_document`].
	pub fn seed_registry(&mut self, registry: NamespaceRegistry) {
		self.registry = registry;
	}

	fn err(&self, kind: ParseErrorKind) -> DocumentError<P::Error> {
		DocumentError::Parse(ParseError::new(self.lx.position(), kind))
	}

	fn pos(&self) -> Position {
		self.lx.position()
	}

	/// Lift a raw sink error into [`DocumentError::Sink`].
	///
	/// A blanket `impl<E> From<E> for DocumentError<E>` would conflict with
	/// the `From<ParseError>` impl when `P::Error = ParseError`, so call
	/// sites go through this helper instead of relying on `?`'s implicit
	/// conversion.
	fn wrap<T>(r: Result<T, P::Error>) -> Result<T, DocumentError<P::Error>> {
		r.map_err(DocumentError::Sink)
	}

	// ---- document framing (§4.5 "Document framing (parser)") ----

	/// Parse a whole document and return whatever the sink produces.
	pub fn parse_document(mut self) -> Result<P::Output, DocumentError<P::Error>> {
		self.lx.skip_filler();
		let variant = self.parse_optional_header()?;
		self.lx.skip_filler();
		self.parse_optional_doc_description()?;
		self.lx.skip_filler();
		match variant {
			DocumentVariant::General => self.parse_root_sequence()?,
			DocumentVariant::PropertiesOnly => {
				let root = self.parse_properties_body()?;
				Self::wrap(self.sink.report_root(root))?;
			}
		}
		Ok(self.sink.finish())
	}

	/// `header ::= "===" mediaType (description of namespaces) "<"`.
	///
	/// The trailing `<` is not shown in §6's grammar outline but is present
	/// in every header-bearing example in §8's concrete scenarios; treated
	/// here as a required header terminator (recorded in DESIGN.md).
	fn parse_optional_header(&mut self) -> Result<DocumentVariant, DocumentError<P::Error>> {
		if self.lx.peek() != '=' {
			return Ok(self.options.expected_variant);
		}
		let mark = self.lx.mark();
		if !(self.lx.confirm('=') && self.lx.confirm('=') && self.lx.confirm('=')) {
			self.lx.reset(mark);
			return Ok(self.options.expected_variant);
		}
		self.lx.check('>', "at start of header media type")?;
		let text = self.lx.read_while(|c| !is_header_media_type_terminator(c)).to_string();
		let variant = match text.as_str() {
			MEDIA_TYPE_GENERAL | "urf" => DocumentVariant::General,
			MEDIA_TYPE_PROPERTIES | "urf-properties" => DocumentVariant::PropertiesOnly,
			_ => self.options.expected_variant,
		};
		if self.lx.peek() == ':' {
			self.parse_header_namespace_decls()?;
		}
		self.lx.check('<', "closing header")?;
		Ok(variant)
	}

	/// `:aliasName=<namespaceIri>(,aliasName=<namespaceIri>)*;`
	fn parse_header_namespace_decls(&mut self) -> Result<(), DocumentError<P::Error>> {
		self.lx.check(':', "at start of header namespace declarations")?;
		self.lx.skip_filler();
		if self.lx.peek() != ';' {
			loop {
				let alias = label::parse_name_token(&mut self.lx, "namespace alias")?;
				self.lx.skip_filler();
				self.lx.check('=', "between alias and namespace IRI")?;
				self.lx.skip_filler();
				let iri = label::parse_iri_literal_text(&mut self.lx)?;
				self.registry.register(alias, iri);
				match self.lx.skip_sequence_delimiters() {
					SequenceState::RequiredNext => continue,
					SequenceState::OptionalNext => {
						if self.lx.peek() == ';' {
							break;
						}
						continue;
					}
					SequenceState::None => break,
				}
			}
		}
		self.lx.check(';', "closing header namespace declarations")?;
		Ok(())
	}

	/// `# … #`: an optional document-description block applying a bare
	/// `propDecl (sep propDecl)*` sequence — not a `:…;` description — to a
	/// synthetic document resource (§4.5 "pre-body properties"). This
	/// resource is never reported as a root — it exists purely to give the
	/// pre-body properties somewhere to land, per the §11 resolution that
	/// every described resource needs a concrete identity in the sink.
	fn parse_optional_doc_description(&mut self) -> Result<(), DocumentError<P::Error>> {
		if self.lx.peek() != '#' {
			return Ok(());
		}
		self.lx.check('#', "at start of document description")?;
		let doc_resource = Self::wrap(self.sink.declare_resource(None, None, ResourceShape::Object))?;
		self.lx.skip_filler();
		if self.lx.peek() != '#' {
			loop {
				self.parse_property_decl(doc_resource)?;
				self.lx.skip_filler();
				if self.lx.peek() == '#' {
					break;
				}
				match self.lx.skip_sequence_delimiters() {
					SequenceState::RequiredNext => continue,
					SequenceState::OptionalNext => {
						if self.lx.peek() == '#' {
							break;
						}
						continue;
					}
					SequenceState::None => break,
				}
			}
		}
		self.lx.check('#', "closing document description")?;
		Ok(())
	}

	fn parse_root_sequence(&mut self) -> Result<(), DocumentError<P::Error>> {
		self.lx.skip_filler();
		if self.lx.at_eof() {
			return Ok(());
		}
		loop {
			let res = self.parse_resource(true)?;
			Self::wrap(self.sink.report_root(res))?;
			self.lx.skip_filler();
			if self.lx.at_eof() {
				break;
			}
			match self.lx.skip_sequence_delimiters() {
				SequenceState::RequiredNext => continue,
				SequenceState::OptionalNext => {
					if self.lx.at_eof() {
						break;
					}
					continue;
				}
				SequenceState::None => {
					if self.lx.at_eof() {
						break;
					}
					return Err(self.err(ParseErrorKind::SequenceItemRequired));
				}
			}
		}
		Ok(())
	}

	fn parse_properties_body(&mut self) -> Result<P::Resource, DocumentError<P::Error>> {
		let root = Self::wrap(self.sink.declare_resource(None, None, ResourceShape::Object))?;
		self.lx.skip_filler();
		if !self.lx.at_eof() {
			loop {
				let (prop_tag, _n_ary) = parse_tag_ref_n_ary(&mut self.lx, &self.registry)?;
				let prop = self.declare_property(prop_tag)?;
				self.lx.skip_filler();
				self.lx.check('=', "in properties-body entry")?;
				self.lx.skip_filler();
				let value = self.parse_resource(self.options.allow_description_on_literals)?;
				Self::wrap(self.sink.process_statement(root, prop, value))?;
				self.lx.skip_filler();
				if self.lx.at_eof() {
					break;
				}
				match self.lx.skip_sequence_delimiters() {
					SequenceState::RequiredNext => continue,
					SequenceState::OptionalNext => {
						if self.lx.at_eof() {
							break;
						}
						continue;
					}
					SequenceState::None => break,
				}
			}
		}
		Ok(root)
	}

	// ---- resource parsing (§4.5 algorithm) ----

	/// `resource ::= label? value description?`.
	pub fn parse_resource(&mut self, allow_description: bool) -> Result<P::Resource, DocumentError<P::Error>> {
		self.lx.skip_filler();
		let label = if self.lx.peek() == '|' { Some(parse_label(&mut self.lx)?) } else { None };

		// Step 1: a repeated alias is a pure reference — no value, no
		// description. A repeated tag may still carry a description, whose
		// edges are merged onto the existing resource (§4.3 "Identity
		// rules on second encounter").
		if let Some(label) = &label {
			match label {
				Label::Alias(name) => {
					if let Some(&res) = self.alias_table.get(name.as_str()) {
						return Ok(res);
					}
				}
				Label::Tag(tag) => {
					if let Some(&res) = self.tag_table.get(tag) {
						self.lx.skip_filler();
						if self.lx.peek() == ':' {
							self.parse_description_body(res)?;
						}
						return Ok(res);
					}
				}
				Label::Id(_) => {}
			}
		}

		self.lx.skip_filler();
		let begin = classify_value_begin(self.lx.peek());
		let is_collection = matches!(begin, Some(ValueBegin::List) | Some(ValueBegin::Set) | Some(ValueBegin::Map));
		let is_object = matches!(begin, Some(ValueBegin::Object));
		let has_tag_or_id_label = matches!(label, Some(Label::Tag(_)) | Some(Label::Id(_)));

		if has_tag_or_id_label && is_collection {
			return Err(self.err(ParseErrorKind::InvalidSyntax(
				"a tag or ID label may not be placed on a list, set or map",
			)));
		}
		if matches!(label, Some(Label::Id(_))) && begin.is_some() && !is_object {
			return Err(self.err(ParseErrorKind::IdWithoutType));
		}
		if has_tag_or_id_label && begin.is_some() && !is_object {
			return Err(self.err(ParseErrorKind::InvalidSyntax(
				"a tag or ID label may only be combined with an object body",
			)));
		}

		let (resource, is_compound) = match begin {
			None => (self.parse_bare_labeled_resource(&label)?, true),
			Some(ValueBegin::Object) => (self.parse_object(&label)?, true),
			Some(ValueBegin::List) => (self.parse_list()?, true),
			Some(ValueBegin::Set) => (self.parse_set()?, true),
			Some(ValueBegin::Map) => (self.parse_map()?, true),
			Some(ValueBegin::Handle) => self.parse_handle_value(&label)?,
			Some(literal) => {
				let value = self.parse_literal_value(literal)?;
				let res = Self::wrap(self.sink.declare_literal(value))?;
				(res, false)
			}
		};

		if let Some(Label::Alias(name)) = &label {
			if !self.alias_table.contains_key(name.as_str()) {
				self.alias_table.insert(name.clone(), resource);
			}
		}

		let allow_desc = allow_description && (is_compound || self.options.allow_description_on_literals);
		if allow_desc && self.lx.peek() == ':' {
			self.parse_description_body(resource)?;
		}

		Ok(resource)
	}

	/// A label with nothing following it (§4.5 "a bare alias label may
	/// stand alone as a blank, declared resource"), generalised to tag
	/// labels too: `|<tag>|` alone declares a blank tagged object.
	fn parse_bare_labeled_resource(&mut self, label: &Option<Label>) -> Result<P::Resource, DocumentError<P::Error>> {
		match label {
			Some(Label::Alias(_)) | None => Ok(Self::wrap(self.sink.declare_resource(None, None, ResourceShape::Object))?),
			Some(Label::Tag(tag)) => self.get_or_declare_tagged(tag.clone(), None, ResourceShape::Object),
			Some(Label::Id(_)) => Err(self.err(ParseErrorKind::IdWithoutType)),
		}
	}

	/// `object ::= "*" tagRef?`.
	fn parse_object(&mut self, label: &Option<Label>) -> Result<P::Resource, DocumentError<P::Error>> {
		self.lx.check('*', "at start of object")?;
		let type_tag = if self.lx.peek() == '|' || is_name_token_begin(self.lx.peek()) {
			Some(label::parse_tag_ref(&mut self.lx, &self.registry)?)
		} else {
			None
		};
		match label {
			Some(Label::Tag(tag)) => self.get_or_declare_tagged(tag.clone(), type_tag.as_ref(), ResourceShape::Object),
			Some(Label::Id(id)) => {
				let type_tag = type_tag.ok_or_else(|| self.err(ParseErrorKind::IdWithoutType))?;
				// §9 open question, resolved "reject": an explicit fragment
				// on the type tag that disagrees with the ID label is an
				// error, not a silent override.
				if let Some(frag) = type_tag.fragment() {
					if frag != id.as_str() {
						return Err(self.err(ParseErrorKind::IdTagConflict));
					}
				}
				let type_tag = type_tag.id_type_tag();
				let tag = Tag::with_fragment(&type_tag, id).map_err(|e| DocumentError::Parse(e.reposition(self.pos())))?;
				self.get_or_declare_tagged(tag, Some(&type_tag), ResourceShape::Object)
			}
			Some(Label::Alias(_)) | None => Self::wrap(
				self.sink
					.declare_resource(None, type_tag.as_ref(), ResourceShape::Object),
			),
		}
	}

	/// A handle in value position: either the literal tokens `true`/`false`
	/// (§4.4 "`t`/`f`... Boolean-handle ambiguity"), a reference to a tagged
	/// resource (declared on first sight if not already known), or — if the
	/// handle is immediately followed by `*` — the compact `Type#id*Type`
	/// declaration form from §4.7's decision table: the handle supplies the
	/// full tag (fragment included, if present), and `*` introduces an
	/// explicit type tag exactly the way [`Parser::parse_object`] does for a
	/// `|<tag>|` label.
	///
	/// Returns whether the produced resource is compound (an object) as
	/// opposed to a literal (only the Boolean case), so the caller can allow
	/// a trailing description unconditionally for the former.
	fn parse_handle_value(&mut self, label: &Option<Label>) -> Result<(P::Resource, bool), DocumentError<P::Error>> {
		let handle = parse_handle(&mut self.lx)?;
		if handle.as_str() == "true" {
			return Ok((Self::wrap(self.sink.declare_literal(Value::Boolean(true)))?, false));
		}
		if handle.as_str() == "false" {
			return Ok((Self::wrap(self.sink.declare_literal(Value::Boolean(false)))?, false));
		}
		let tag = label::resolve_handle(&handle, &self.registry, &self.lx)?;
		if matches!(label, Some(Label::Alias(_))) {
			return Err(self.err(ParseErrorKind::AliasOnTaggedResource));
		}
		if self.lx.peek() == '*' {
			self.lx.check('*', "at start of object")?;
			let type_tag = if self.lx.peek() == '|' || is_name_token_begin(self.lx.peek()) {
				Some(label::parse_tag_ref(&mut self.lx, &self.registry)?)
			} else {
				None
			};
			let res = self.get_or_declare_tagged(tag, type_tag.as_ref(), ResourceShape::Object)?;
			return Ok((res, true));
		}
		// A handle's own `#idToken` suffix (§4.3) makes this an ID tag; its
		// ID-type tag is then recoverable without a separate `*Type`
		// marker (§4.7 decision table row "`Type#id`"), so a compact
		// handle reference can declare a typed ID resource on its own.
		let type_tag = if tag.has_fragment() { Some(tag.id_type_tag()) } else { None };
		let res = self.get_or_declare_tagged(tag, type_tag.as_ref(), ResourceShape::Object)?;
		Ok((res, true))
	}

	fn parse_literal_value(&mut self, begin: ValueBegin) -> Result<Value, DocumentError<P::Error>> {
		let value = match begin {
			ValueBegin::Binary => values::parse_binary(&mut self.lx)?,
			ValueBegin::Character => values::parse_character(&mut self.lx)?,
			ValueBegin::Email => values::parse_email(&mut self.lx)?,
			ValueBegin::Iri => values::parse_iri(&mut self.lx)?,
			ValueBegin::MediaType => values::parse_media_type(&mut self.lx)?,
			ValueBegin::Number => values::parse_number(&mut self.lx)?,
			ValueBegin::Regex => values::parse_regex(&mut self.lx)?,
			ValueBegin::String => values::parse_string(&mut self.lx)?,
			ValueBegin::Telephone => values::parse_telephone(&mut self.lx)?,
			ValueBegin::Temporal => values::parse_temporal(&mut self.lx)?,
			ValueBegin::Uuid => values::parse_uuid(&mut self.lx)?,
			ValueBegin::List | ValueBegin::Map | ValueBegin::Set | ValueBegin::Object | ValueBegin::Handle => {
				unreachable!("compound kinds are dispatched before parse_literal_value")
			}
		};
		Ok(value)
	}

	fn get_or_declare_tagged(
		&mut self,
		tag: Tag,
		type_tag: Option<&Tag>,
		shape: ResourceShape,
	) -> Result<P::Resource, DocumentError<P::Error>> {
		if let Some(&res) = self.tag_table.get(&tag) {
			return Ok(res);
		}
		let res = Self::wrap(self.sink.declare_resource(Some(&tag), type_tag, shape))?;
		self.tag_table.insert(tag, res);
		Ok(res)
	}

	fn declare_property(&mut self, tag: Tag) -> Result<P::Resource, DocumentError<P::Error>> {
		self.get_or_declare_tagged(tag, None, ResourceShape::Object)
	}

	// ---- descriptions (§4.5 "Description sequence termination") ----

	/// `description ::= ":" (propDecl (sep propDecl)*)? ";"`.
	fn parse_description_body(&mut self, subject: P::Resource) -> Result<(), DocumentError<P::Error>> {
		self.lx.check(':', "at start of description")?;
		self.lx.skip_filler();
		if self.lx.peek() != ';' {
			loop {
				self.parse_property_decl(subject)?;
				self.lx.skip_filler();
				match self.lx.skip_sequence_delimiters() {
					SequenceState::RequiredNext => continue,
					SequenceState::OptionalNext => {
						if self.lx.peek() == ';' {
							break;
						}
						continue;
					}
					SequenceState::None => break,
				}
			}
		}
		self.lx.check(';', "closing description")?;
		Ok(())
	}

	/// `propDecl ::= tagRef ("=" resource | description)`.
	fn parse_property_decl(&mut self, subject: P::Resource) -> Result<(), DocumentError<P::Error>> {
		let (prop_tag, _n_ary) = parse_tag_ref_n_ary(&mut self.lx, &self.registry)?;
		let prop = self.declare_property(prop_tag)?;
		self.lx.skip_filler();
		if self.lx.confirm('=') {
			self.lx.skip_filler();
			let value = self.parse_resource(self.options.allow_description_on_literals)?;
			Self::wrap(self.sink.process_statement(subject, prop, value))?;
		} else if self.lx.peek() == ':' {
			let obj = Self::wrap(self.sink.declare_resource(None, None, ResourceShape::Object))?;
			self.parse_description_body(obj)?;
			Self::wrap(self.sink.process_statement(subject, prop, obj))?;
		} else {
			return Err(self.err(ParseErrorKind::UnexpectedChar(self.lx.peek(), "expected '=' or ':' after property reference")));
		}
		Ok(())
	}

	// ---- collections (§4.5 "Collection parsing") ----

	/// `list ::= "[" (resource (sep resource)*)? "]"`.
	fn parse_list(&mut self) -> Result<P::Resource, DocumentError<P::Error>> {
		self.lx.check('[', "at start of list")?;
		let list = Self::wrap(
			self.sink
				.declare_resource(None, None, ResourceShape::Collection(CollectionKind::List)),
		)?;
		self.lx.skip_filler();
		let mut index: u64 = 0;
		if self.lx.peek() != ']' {
			loop {
				let item = self.parse_resource(true)?;
				let element_tag = Tag::with_fragment(&self.element_property, &index.to_string())
					.map_err(|e| DocumentError::Parse(e.reposition(self.pos())))?;
				let prop = self.declare_property(element_tag)?;
				Self::wrap(self.sink.process_statement(list, prop, item))?;
				index += 1;
				self.lx.skip_filler();
				match self.lx.skip_sequence_delimiters() {
					SequenceState::RequiredNext => continue,
					SequenceState::OptionalNext => {
						if self.lx.peek() == ']' {
							break;
						}
						continue;
					}
					SequenceState::None => break,
				}
			}
		}
		self.lx.check(']', "closing list")?;
		Ok(list)
	}

	/// `set ::= "(" (resource (sep resource)*)? ")"`.
	fn parse_set(&mut self) -> Result<P::Resource, DocumentError<P::Error>> {
		self.lx.check('(', "at start of set")?;
		let set = Self::wrap(
			self.sink
				.declare_resource(None, None, ResourceShape::Collection(CollectionKind::Set)),
		)?;
		self.lx.skip_filler();
		if self.lx.peek() != ')' {
			loop {
				let item = self.parse_resource(true)?;
				let prop = self.declare_property(self.member_property.clone())?;
				Self::wrap(self.sink.process_statement(set, prop, item))?;
				self.lx.skip_filler();
				match self.lx.skip_sequence_delimiters() {
					SequenceState::RequiredNext => continue,
					SequenceState::OptionalNext => {
						if self.lx.peek() == ')' {
							break;
						}
						continue;
					}
					SequenceState::None => break,
				}
			}
		}
		self.lx.check(')', "closing set")?;
		Ok(set)
	}

	/// `map ::= "{" (mapEntry (sep mapEntry)*)? "}"`, `mapEntry ::= mapKey
	/// ":" resource`, `mapKey ::= resource | "\" resource "\"`.
	fn parse_map(&mut self) -> Result<P::Resource, DocumentError<P::Error>> {
		self.lx.check('{', "at start of map")?;
		let map = Self::wrap(
			self.sink
				.declare_resource(None, None, ResourceShape::Collection(CollectionKind::Map)),
		)?;
		self.lx.skip_filler();
		if self.lx.peek() != '}' {
			loop {
				self.lx.skip_filler();
				let bracketed = self.lx.confirm('\\');
				let key = self.parse_resource(true)?;
				if bracketed {
					self.lx.check('\\', "closing bracketed map key")?;
				}
				self.lx.skip_filler();
				self.lx.check(':', "between map key and value")?;
				self.lx.skip_filler();
				let value = self.parse_resource(true)?;

				let entry = Self::wrap(self.sink.declare_resource(None, None, ResourceShape::Object))?;
				let key_prop = self.declare_property(self.map_key_property.clone())?;
				let value_prop = self.declare_property(self.map_value_property.clone())?;
				Self::wrap(self.sink.process_statement(entry, key_prop, key))?;
				Self::wrap(self.sink.process_statement(entry, value_prop, value))?;
				let member_prop = self.declare_property(self.member_property.clone())?;
				Self::wrap(self.sink.process_statement(map, member_prop, entry))?;

				self.lx.skip_filler();
				match self.lx.skip_sequence_delimiters() {
					SequenceState::RequiredNext => continue,
					SequenceState::OptionalNext => {
						if self.lx.peek() == '}' {
							break;
						}
						continue;
					}
					SequenceState::None => break,
				}
			}
		}
		self.lx.check('}', "closing map")?;
		Ok(map)
	}
}

/// Whether `c` ends the bare text run of a header's media type token.
fn is_header_media_type_terminator(c: char) -> bool {
	matches!(c, ':' | '<' | ' ' | '\t' | '\n' | '\r') || c == crate::lexer::EOF
}

/// Parse `input` into an owned [`Document`] using the built-in
/// [`GraphBuilder`] processor — the convenience entry point for callers that
/// don't need to stream events into their own application model.
///
/// [`Parser::parse_document`] consumes `self` and returns only the sink's
/// `Output`, which for `GraphBuilder` is a bare [`Document`] with no
/// namespace registry attached; this wrapper drives the same steps directly
/// so it can also recover the registry the header populated and attach it
/// to the returned document (§11 of the expanded spec).
pub fn parse_to_document(input: &str, options: ParserOptions) -> Result<Document, ParseError> {
	let parser = Parser::new(input, GraphBuilder::new(), options);
	let (mut doc, registry) = parse_document_with_registry(parser)?;
	doc.registry = registry;
	Ok(doc)
}

fn parse_document_with_registry(
	mut parser: Parser<'_, GraphBuilder>,
) -> Result<(Document, NamespaceRegistry), ParseError> {
	parser.lx.skip_filler();
	let variant = parser
		.parse_optional_header()
		.map_err(unwrap_infallible_doc_error)?;
	parser.lx.skip_filler();
	parser
		.parse_optional_doc_description()
		.map_err(unwrap_infallible_doc_error)?;
	parser.lx.skip_filler();
	match variant {
		DocumentVariant::General => parser.parse_root_sequence().map_err(unwrap_infallible_doc_error)?,
		DocumentVariant::PropertiesOnly => {
			let root = parser.parse_properties_body().map_err(unwrap_infallible_doc_error)?;
			parser.sink.report_root(root).expect("GraphBuilder is infallible");
		}
	}
	let registry = parser.registry.clone();
	Ok((parser.sink.finish(), registry))
}

fn unwrap_infallible_doc_error(e: DocumentError<Infallible>) -> ParseError {
	match e {
		DocumentError::Parse(e) => e,
		DocumentError::Sink(infallible) => match infallible {},
	}
}
