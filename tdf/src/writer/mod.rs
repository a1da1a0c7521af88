/*!
# Reference discovery (C7, §4.6) and serializer (C8, §4.7)

Turns a [`Document`] back into TDF text. Two passes precede the actual
writing: namespace auto-discovery (any tag/type-tag namespace not already in
the registry gets a generated alias, so the body can use handle shorthand
instead of spelling out full IRIs everywhere) and reference discovery (any
untagged compound resource reached more than once, or reached through a
cycle, needs an alias of its own so later occurrences can refer back to it
instead of re-emitting the whole subtree).
*/
use std::collections::{BTreeSet, HashMap, HashSet};
use std::convert::TryFrom;
use std::fmt;

use crate::error::{SerializeError, SerializeResult};
use crate::namespace::NamespaceRegistry;
use crate::resource::{CollectionKind, CompoundNode, Document, Node, ResourceId};
use crate::strings::NameToken;
use crate::tag::Tag;
use crate::value::{base64_url_no_pad, Number, Temporal, Value};

use crate::parser::DocumentVariant;

use tdf_grammar::{MAP_ENTRY_KEY_PROPERTY, MAP_ENTRY_VALUE_PROPERTY};

/// Output layout: compact (everything on one line, comma-delimited) or
/// formatted (one item per line, indented per nesting level).
///
/// §4.7 "Formatting": "compact (sequence delimiters required; no newlines)
/// and formatted (indent per level; newlines between items; sequence
/// delimiter only when a separator didn't already appear)" — in `Formatted`
/// mode the newline itself is the delimiter the lexer's `skip_sequence_delimiters`
/// already treats as equivalent to a comma, so no comma is written at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
	#[default]
	Compact,
	Formatted,
}

/// Serializer configuration.
#[derive(Debug, Clone)]
pub struct SerializerOptions {
	/// Which body shape to emit.
	pub variant: DocumentVariant,
	/// Whether to emit a `===...;<` header at all when there is nothing to
	/// put in it (no discovered namespace aliases, default variant). When
	/// `false`, no header is ever emitted, even if that drops namespace
	/// declarations the reader would then have to supply itself.
	pub emit_header: bool,
	/// Whether a property whose value is an anonymous, typeless object with
	/// at least one edge and no generated alias is emitted in the short form
	/// `propertyRef:…;` instead of `propertyRef=*:…;` (§4.7 "Description
	/// emission... enabled by a serializer flag"). The parser accepts both
	/// forms unconditionally (§4.5 `propDecl`); this only controls which one
	/// this crate's own serializer chooses to write.
	pub use_short_property_form: bool,
	/// Compact or indented-with-newlines output (§4.7 "Formatting").
	pub format: Format,
}

impl Default for SerializerOptions {
	fn default() -> Self {
		SerializerOptions {
			variant: DocumentVariant::General,
			emit_header: true,
			use_short_property_form: true,
			format: Format::Compact,
		}
	}
}

/// Find every untagged compound resource that needs an alias to be
/// referenced more than once: anything reached via more than one edge (or
/// as both a root and an edge target), plus anything on a reference cycle
/// (which needs a label even with exactly one incoming edge, or the
/// serializer could never terminate).
///
/// Collections never receive aliases — there is no surface syntax for
/// labelling a list/set/map — so a collection reached more than once is
/// simply re-emitted in full at each occurrence; this loses the shared
/// identity on round-trip, which is fine for documents actually produced by
/// this crate's own parser (which never creates such a sharing, since
/// labels are rejected on collection bodies) and is the documented
/// limitation for graphs built by hand through [`crate::sink::GraphBuilder`].
fn discover_references(doc: &Document) -> HashMap<ResourceId, NameToken> {
	let mut incoming: HashMap<ResourceId, usize> = HashMap::new();
	for (_, node) in doc.iter() {
		if let Node::Compound(c) = node {
			for &(_, value) in &c.edges {
				*incoming.entry(value).or_insert(0) += 1;
			}
		}
	}
	for &root in &doc.roots {
		*incoming.entry(root).or_insert(0) += 1;
	}

	let mut state: HashMap<ResourceId, u8> = HashMap::new();
	let mut needs_alias: HashSet<ResourceId> = HashSet::new();
	for &root in &doc.roots {
		visit_for_cycles(doc, root, &mut state, &mut needs_alias);
	}
	for (id, node) in doc.iter() {
		if node.is_compound() && state.get(&id).copied().unwrap_or(0) == 0 {
			visit_for_cycles(doc, id, &mut state, &mut needs_alias);
		}
	}

	for (&id, &count) in incoming.iter() {
		if count > 1 {
			if let Node::Compound(c) = doc.get(id) {
				if c.is_object() && c.tag.is_none() {
					needs_alias.insert(id);
				}
			}
		}
	}
	needs_alias.retain(|id| matches!(doc.get(*id), Node::Compound(c) if c.is_object() && c.tag.is_none()));

	let mut ids: Vec<ResourceId> = needs_alias.into_iter().collect();
	ids.sort_by_key(|id| id.0);
	ids.into_iter()
		.enumerate()
		.map(|(i, id)| {
			let name = NameToken::try_from(format!("r{}", i).as_str()).expect("generated alias is a valid name-token");
			(id, name)
		})
		.collect()
}

fn visit_for_cycles(doc: &Document, id: ResourceId, state: &mut HashMap<ResourceId, u8>, needs_alias: &mut HashSet<ResourceId>) {
	match state.get(&id).copied().unwrap_or(0) {
		1 => {
			needs_alias.insert(id);
			return;
		}
		2 => return,
		_ => {}
	}
	state.insert(id, 1);
	if let Node::Compound(c) = doc.get(id) {
		for &(_, value) in &c.edges {
			if matches!(doc.get(value), Node::Compound(_)) {
				visit_for_cycles(doc, value, state, needs_alias);
			}
		}
	}
	state.insert(id, 2);
}

/// Extend `registry` with a generated alias for every namespace used by a
/// tag or type-tag in `doc` that isn't already registered (§4.7 step 1).
/// The fixed default namespace never gets an alias — it's exactly the
/// namespace bare handles already resolve against.
fn auto_discover_namespaces(doc: &Document, registry: &mut NamespaceRegistry) {
	let mut namespaces: BTreeSet<String> = BTreeSet::new();
	for (_, node) in doc.iter() {
		if let Node::Compound(c) = node {
			if let Some(tag) = &c.tag {
				namespaces.insert(tag.namespace().to_string());
			}
			if let Some(tag) = &c.type_tag {
				namespaces.insert(tag.namespace().to_string());
			}
		}
	}
	let mut next_index = 0usize;
	for ns in namespaces {
		if ns == tdf_grammar::DEFAULT_NAMESPACE {
			continue;
		}
		if registry.alias_for_namespace(&ns).is_some() {
			continue;
		}
		loop {
			let candidate = format!("ns{}", next_index);
			next_index += 1;
			if registry.namespace_for_alias(&candidate).is_none() {
				registry.register(candidate, ns.clone());
				break;
			}
		}
	}
}

/// Writes one [`Document`] to a [`fmt::Write`] sink.
pub struct Serializer<'d, W: fmt::Write> {
	doc: &'d Document,
	out: W,
	aliases: HashMap<ResourceId, NameToken>,
	emitted: HashSet<ResourceId>,
	registry: NamespaceRegistry,
	options: SerializerOptions,
	depth: usize,
}

impl<'d, W: fmt::Write> Serializer<'d, W> {
	pub fn new(doc: &'d Document, out: W, options: SerializerOptions) -> Self {
		let mut registry = doc.registry.clone();
		auto_discover_namespaces(doc, &mut registry);
		let aliases = discover_references(doc);
		Serializer {
			doc,
			out,
			aliases,
			emitted: HashSet::new(),
			registry,
			options,
			depth: 0,
		}
	}

	/// Writes the separator between items of a sequence at the current
	/// nesting depth: nothing before the first item, then either a comma
	/// (`Format::Compact`) or a newline plus one tab per level
	/// (`Format::Formatted`) before every later item.
	fn item_separator(&mut self, first: bool) -> SerializeResult<()> {
		match self.options.format {
			Format::Compact => {
				if !first {
					write!(self.out, ",")?;
				}
			}
			Format::Formatted => self.newline_indent(self.depth)?,
		}
		Ok(())
	}

	fn newline_indent(&mut self, depth: usize) -> SerializeResult<()> {
		write!(self.out, "\n")?;
		for _ in 0..depth {
			write!(self.out, "\t")?;
		}
		Ok(())
	}

	/// Closes a non-empty sequence in formatted mode: a newline back to the
	/// enclosing level before the closing delimiter, so that delimiter lines
	/// up with the opening one instead of trailing the last item.
	fn close_sequence(&mut self, outer_depth: usize) -> SerializeResult<()> {
		if self.options.format == Format::Formatted {
			self.newline_indent(outer_depth)?;
		}
		Ok(())
	}

	/// Serialize the whole document and return the sink.
	pub fn serialize(mut self) -> SerializeResult<W> {
		let header_emitted = self.options.emit_header && !self.registry.is_empty() && self.options.variant == DocumentVariant::General;
		if self.options.emit_header {
			self.emit_header()?;
		}
		if header_emitted && self.options.format == Format::Formatted {
			write!(self.out, "\n")?;
		}
		match self.options.variant {
			DocumentVariant::General => {
				let roots = self.doc.roots.clone();
				for (i, &root) in roots.iter().enumerate() {
					if i > 0 {
						// "separated by blank lines (formatted) or commas
						// (compact)" (§4.7 step 4).
						match self.options.format {
							Format::Compact => write!(self.out, ",")?,
							Format::Formatted => write!(self.out, "\n\n")?,
						}
					}
					self.emit_value(root)?;
				}
			}
			DocumentVariant::PropertiesOnly => {
				if let Some(&root) = self.doc.roots.first() {
					let edges = match self.doc.get(root) {
						Node::Compound(c) => c.edges.clone(),
						Node::Literal(_) => Vec::new(),
					};
					for (i, (prop, value)) in edges.into_iter().enumerate() {
						self.item_separator(i == 0)?;
						self.emit_property_decl(prop, value)?;
					}
				}
			}
		}
		Ok(self.out)
	}

	fn emit_header(&mut self) -> SerializeResult<()> {
		if self.registry.is_empty() && self.options.variant == DocumentVariant::General {
			return Ok(());
		}
		write!(self.out, "===>{}", self.options.variant.abbreviated_media_type())?;
		if !self.registry.is_empty() {
			write!(self.out, ":")?;
			let mut aliases: Vec<(&str, &str)> = self.registry.aliases().collect();
			aliases.sort_unstable();
			for (i, (alias, ns)) in aliases.iter().enumerate() {
				if i > 0 {
					write!(self.out, ",")?;
				}
				write!(self.out, "{}=<{}>", alias, ns)?;
			}
			write!(self.out, ";")?;
		}
		write!(self.out, "<")?;
		Ok(())
	}

	/// The canonical reference text for `tag` in value position: a handle
	/// if one can be formed from the working registry, else a bracketed
	/// IRI literal label.
	fn tag_ref_string(&self, tag: &Tag) -> String {
		match self.handle_for(tag) {
			Some(handle) => handle,
			None => format!("|<{}>|", tag.as_str()),
		}
	}

	/// Attempt to express `tag` as a handle: its namespace must either be
	/// the fixed default namespace (no prefix needed) or have a registered
	/// alias, and its local segment (plus `#fragment`, if any) must satisfy
	/// the handle grammar.
	fn handle_for(&self, tag: &Tag) -> Option<String> {
		let candidate = match tag.fragment() {
			Some(frag) => format!("{}#{}", tag.path_segment(), frag),
			None => tag.path_segment().to_string(),
		};
		if tdf_grammar::validate_handle(&candidate).is_err() {
			return None;
		}
		let namespace = tag.namespace();
		if namespace == tdf_grammar::DEFAULT_NAMESPACE {
			// `true`/`false` bare would be misread as a Boolean literal on
			// re-parse (§4.7 "Handle emission rule") — fall back to a tag
			// label instead. A namespace-qualified handle (`alias/false`)
			// is unambiguous, since the literal tokens are only `true` and
			// `false` with no alias prefix.
			if candidate == "true" || candidate == "false" {
				return None;
			}
			return Some(candidate);
		}
		let alias = self.registry.alias_for_namespace(namespace)?;
		Some(format!("{}/{}", alias, candidate))
	}

	fn emit_value(&mut self, id: ResourceId) -> SerializeResult<()> {
		// `self.doc` is a plain reference (`Copy`), so copying it out of
		// `self` first lets `doc.get(id)` hand back a borrow that outlives
		// `self`'s own borrow — no need to clone the node just to satisfy
		// the borrow checker across the `&mut self` calls below.
		let doc = self.doc;
		match doc.get(id) {
			Node::Literal(v) => self.emit_literal(v),
			Node::Compound(c) => self.emit_compound(id, c),
		}
	}

	fn emit_compound(&mut self, id: ResourceId, c: &CompoundNode) -> SerializeResult<()> {
		if let Some(kind) = c.shape {
			return self.emit_collection(kind, c);
		}
		if let Some(tag) = c.tag.clone() {
			if self.emitted.contains(&id) {
				write!(self.out, "{}", self.tag_ref_string(&tag))?;
				return Ok(());
			}
			self.emitted.insert(id);
			// §4.7 decision table: when the ID's fragment-free prefix equals
			// the declared type tag, a compact `Type#id` handle carries both
			// the id and the type. The `*Type` suffix is still appended on
			// this, the first (declaring) emission, per "the `*Type` suffix
			// is included only when the caller requested a declaration";
			// later references re-emit the bare handle via the
			// `self.emitted.contains(&id)` branch above.
			let compact = match (tag.fragment(), &c.type_tag) {
				(Some(_), Some(type_tag)) if *type_tag == tag.id_type_tag() => {
					self.handle_for(&tag).map(|h| (h, type_tag.clone()))
				}
				_ => None,
			};
			if let Some((handle, type_tag)) = compact {
				write!(self.out, "{}*{}", handle, self.tag_ref_string(&type_tag))?;
				return self.emit_description(c);
			}
			match tag.fragment() {
				Some(frag) => write!(self.out, "|\"{}\"|", escape_quoted(frag))?,
				None => write!(self.out, "|<{}>|", tag.as_str())?,
			}
			write!(self.out, "*")?;
			if let Some(type_tag) = &c.type_tag {
				write!(self.out, "{}", self.tag_ref_string(type_tag))?;
			}
			return self.emit_description(c);
		}
		if let Some(alias) = self.aliases.get(&id).cloned() {
			if self.emitted.contains(&id) {
				write!(self.out, "|{}|", alias)?;
				return Ok(());
			}
			self.emitted.insert(id);
			write!(self.out, "|{}|*", alias)?;
			if let Some(type_tag) = &c.type_tag {
				write!(self.out, "{}", self.tag_ref_string(type_tag))?;
			}
			return self.emit_description(c);
		}
		write!(self.out, "*")?;
		if let Some(type_tag) = &c.type_tag {
			write!(self.out, "{}", self.tag_ref_string(type_tag))?;
		}
		self.emit_description(c)
	}

	fn emit_description(&mut self, c: &CompoundNode) -> SerializeResult<()> {
		// `description?` is genuinely optional in the grammar; skip the
		// `:;` wrapper entirely rather than emit an empty one.
		if c.edges.is_empty() {
			return Ok(());
		}
		write!(self.out, ":")?;
		let outer_depth = self.depth;
		self.depth += 1;
		let edges = c.edges.clone();
		for (i, (prop, value)) in edges.into_iter().enumerate() {
			self.item_separator(i == 0)?;
			self.emit_property_decl(prop, value)?;
		}
		self.depth = outer_depth;
		self.close_sequence(outer_depth)?;
		write!(self.out, ";")?;
		Ok(())
	}

	/// `propDecl ::= tagRef ("=" resource | description)` (§4.5, §4.7).
	///
	/// Chooses the short `propertyRef:…;` form over `propertyRef=*:…;` when
	/// [`SerializerOptions::use_short_property_form`] is set and `value` is
	/// an anonymous, typeless object with at least one edge and no generated
	/// alias — the latter condition guarantees this is the object's only
	/// occurrence, since anything discovered to need a second reference
	/// always gets an alias (§4.6).
	fn emit_property_decl(&mut self, prop: ResourceId, value: ResourceId) -> SerializeResult<()> {
		self.emit_property_ref(prop)?;
		if self.options.use_short_property_form {
			if let Node::Compound(c) = self.doc.get(value) {
				if c.is_object()
					&& c.tag.is_none()
					&& c.type_tag.is_none()
					&& !c.edges.is_empty()
					&& !self.aliases.contains_key(&value)
					&& !self.emitted.contains(&value)
				{
					self.emitted.insert(value);
					let c = c.clone();
					return self.emit_description(&c);
				}
			}
		}
		write!(self.out, "=")?;
		self.emit_value(value)?;
		Ok(())
	}

	fn emit_property_ref(&mut self, prop: ResourceId) -> SerializeResult<()> {
		let tag = match self.doc.get(prop) {
			Node::Compound(c) => c
				.tag
				.clone()
				.ok_or(SerializeError::UnsupportedValue("property resource has no tag"))?,
			Node::Literal(_) => return Err(SerializeError::UnsupportedValue("property must be a resource, not a literal")),
		};
		write!(self.out, "{}", self.tag_ref_string(&tag))?;
		Ok(())
	}

	fn emit_collection(&mut self, kind: CollectionKind, c: &CompoundNode) -> SerializeResult<()> {
		let outer_depth = self.depth;
		match kind {
			CollectionKind::List => {
				write!(self.out, "[")?;
				let mut items: Vec<(u64, ResourceId)> = Vec::with_capacity(c.edges.len());
				for &(prop, value) in &c.edges {
					if let Node::Compound(pc) = self.doc.get(prop) {
						if let Some(frag) = pc.tag.as_ref().and_then(|t| t.fragment()) {
							if let Ok(index) = frag.parse::<u64>() {
								items.push((index, value));
							}
						}
					}
				}
				items.sort_by_key(|(index, _)| *index);
				self.depth += 1;
				for (i, (_, value)) in items.into_iter().enumerate() {
					self.item_separator(i == 0)?;
					self.emit_value(value)?;
				}
				self.depth = outer_depth;
				self.close_sequence(outer_depth)?;
				write!(self.out, "]")?;
			}
			CollectionKind::Set => {
				write!(self.out, "(")?;
				let edges = c.edges.clone();
				self.depth += 1;
				for (i, (_, value)) in edges.into_iter().enumerate() {
					self.item_separator(i == 0)?;
					self.emit_value(value)?;
				}
				self.depth = outer_depth;
				self.close_sequence(outer_depth)?;
				write!(self.out, ")")?;
			}
			CollectionKind::Map => {
				write!(self.out, "{{")?;
				let edges = c.edges.clone();
				self.depth += 1;
				for (i, (_, entry)) in edges.into_iter().enumerate() {
					self.item_separator(i == 0)?;
					let (key, value) = self.map_entry_kv(entry)?;
					let key_is_object = matches!(self.doc.get(key), Node::Compound(kc) if kc.is_object());
					if key_is_object {
						write!(self.out, "\\")?;
						self.emit_value(key)?;
						write!(self.out, "\\")?;
					} else {
						self.emit_value(key)?;
					}
					write!(self.out, ":")?;
					self.emit_value(value)?;
				}
				self.depth = outer_depth;
				self.close_sequence(outer_depth)?;
				write!(self.out, "}}")?;
			}
		}
		Ok(())
	}

	fn map_entry_kv(&self, entry: ResourceId) -> SerializeResult<(ResourceId, ResourceId)> {
		let c = match self.doc.get(entry) {
			Node::Compound(c) => c,
			Node::Literal(_) => return Err(SerializeError::UnsupportedValue("map entry must be a resource")),
		};
		let mut key = None;
		let mut value = None;
		for &(prop, v) in &c.edges {
			if let Node::Compound(pc) = self.doc.get(prop) {
				if let Some(tag) = &pc.tag {
					if tag.as_str() == MAP_ENTRY_KEY_PROPERTY {
						key = Some(v);
					} else if tag.as_str() == MAP_ENTRY_VALUE_PROPERTY {
						value = Some(v);
					}
				}
			}
		}
		Ok((
			key.ok_or(SerializeError::UnsupportedValue("map entry missing key"))?,
			value.ok_or(SerializeError::UnsupportedValue("map entry missing value"))?,
		))
	}

	fn emit_literal(&mut self, value: &Value) -> SerializeResult<()> {
		match value {
			Value::Binary(bytes) => write!(self.out, "%{}", base64_url_no_pad(bytes))?,
			Value::Boolean(b) => write!(self.out, "{}", if *b { "true" } else { "false" })?,
			Value::Character(c) => {
				write!(self.out, "'")?;
				self.write_escaped_char(*c, '\'')?;
				write!(self.out, "'")?;
			}
			Value::Email(e) => write!(self.out, "^{}", e)?,
			Value::Iri(iri) => write!(self.out, "<{}>", iri)?,
			Value::MediaType(m) => write!(self.out, ">{}", m)?,
			Value::Number(n) => self.emit_number(n)?,
			Value::Regex(r) => {
				write!(self.out, "/")?;
				self.write_escaped_text(r.pattern(), '/')?;
				write!(self.out, "/")?;
			}
			Value::String(s) => {
				write!(self.out, "\"")?;
				self.write_escaped_text(s, '"')?;
				write!(self.out, "\"")?;
			}
			Value::Telephone(t) => self.emit_telephone(t)?,
			Value::Temporal(t) => self.emit_temporal(t)?,
			Value::Uuid(u) => write!(self.out, "&{}", u)?,
		}
		Ok(())
	}

	fn emit_number(&mut self, n: &Number) -> SerializeResult<()> {
		match n {
			Number::Long(v) => write!(self.out, "{}", v)?,
			Number::BigInt(v) => write!(self.out, "${}", v)?,
			Number::Double(v) => write!(self.out, "{}", format_double(*v))?,
			Number::BigDecimal(v) => write!(self.out, "${}", v)?,
		}
		Ok(())
	}

	fn emit_telephone(&mut self, t: &phonenumber::PhoneNumber) -> SerializeResult<()> {
		let intl = phonenumber::format(t).mode(phonenumber::Mode::International).to_string();
		let rest = intl
			.strip_prefix('+')
			.ok_or_else(|| SerializeError::IllegalTelephone(intl.clone()))?;
		write!(self.out, "+{}", rest)?;
		Ok(())
	}

	fn emit_temporal(&mut self, t: &Temporal) -> SerializeResult<()> {
		write!(self.out, "@")?;
		match t {
			Temporal::Year(y) => write!(self.out, "{:04}", y)?,
			Temporal::YearMonth(y, m) => write!(self.out, "{:04}-{:02}", y, m)?,
			Temporal::MonthDay(m, d) => write!(self.out, "--{:02}-{:02}", m, d)?,
			Temporal::LocalDate(d) => write!(self.out, "{}", d.format("%Y-%m-%d"))?,
			Temporal::LocalTime(t) => write!(self.out, "{}", format_time_text(*t))?,
			Temporal::OffsetTime(t, off) => {
				write!(self.out, "{}", format_time_text(*t))?;
				self.write_offset(*off)?;
			}
			Temporal::LocalDateTime(dt) => {
				write!(self.out, "{}T{}", dt.date().format("%Y-%m-%d"), format_time_text(dt.time()))?;
			}
			Temporal::Instant(dt) => {
				let naive = dt.naive_utc();
				write!(self.out, "{}T{}Z", naive.date().format("%Y-%m-%d"), format_time_text(naive.time()))?;
			}
			Temporal::OffsetDateTime(dt) => {
				let naive = dt.naive_local();
				write!(self.out, "{}T{}", naive.date().format("%Y-%m-%d"), format_time_text(naive.time()))?;
				self.write_offset(*dt.offset())?;
			}
			Temporal::ZonedDateTime(dt, tz) => {
				let naive = dt.naive_local();
				write!(self.out, "{}T{}", naive.date().format("%Y-%m-%d"), format_time_text(naive.time()))?;
				self.write_offset(*dt.offset())?;
				write!(self.out, "[{}]", tz.name())?;
			}
		}
		Ok(())
	}

	/// Always emits an explicit sign and minutes, even for a zero offset
	/// (`+00:00`), since `Z` is reserved for [`Temporal::Instant`] — an
	/// `OffsetDateTime`/`ZonedDateTime` with a zero offset must stay
	/// distinguishable from an `Instant` on round-trip (§8 "Temporal
	/// subtype fidelity").
	fn write_offset(&mut self, off: chrono::FixedOffset) -> SerializeResult<()> {
		let total = off.local_minus_utc();
		let sign = if total < 0 { '-' } else { '+' };
		let total_abs = total.unsigned_abs();
		write!(self.out, "{}{:02}:{:02}", sign, total_abs / 3600, (total_abs % 3600) / 60)?;
		Ok(())
	}

	fn write_escaped_text(&mut self, s: &str, delimiter: char) -> SerializeResult<()> {
		for c in s.chars() {
			self.write_escaped_char(c, delimiter)?;
		}
		Ok(())
	}

	fn write_escaped_char(&mut self, c: char, delimiter: char) -> SerializeResult<()> {
		if c == delimiter {
			write!(self.out, "\\{}", delimiter)?;
		} else if let Some(esc) = tdf_grammar::escape_for(c) {
			write!(self.out, "\\{}", esc)?;
		} else if tdf_grammar::needs_unicode_escape(c) {
			write!(self.out, "\\u{:04x}", c as u32)?;
		} else {
			write!(self.out, "{}", c)?;
		}
		Ok(())
	}
}

fn escape_quoted(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			_ => out.push(c),
		}
	}
	out
}

fn format_double(v: f64) -> String {
	let s = format!("{}", v);
	if s.contains('.') || s.contains('e') || s.contains('E') || s.contains("inf") || s.contains("NaN") {
		s
	} else {
		format!("{}.0", s)
	}
}

fn format_time_text(t: chrono::NaiveTime) -> String {
	use chrono::Timelike;
	let (h, m, s, nanos) = (t.hour(), t.minute(), t.second(), t.nanosecond());
	if nanos == 0 {
		if s == 0 {
			format!("{:02}:{:02}", h, m)
		} else {
			format!("{:02}:{:02}:{:02}", h, m, s)
		}
	} else {
		let mut frac = format!("{:09}", nanos);
		while frac.ends_with('0') {
			frac.pop();
		}
		format!("{:02}:{:02}:{:02}.{}", h, m, s, frac)
	}
}

/// Serialize `doc` to a freshly allocated `String`.
pub fn to_string(doc: &Document, options: SerializerOptions) -> SerializeResult<String> {
	Serializer::new(doc, String::new(), options).serialize()
}
