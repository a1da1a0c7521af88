/*!
# Textual Description Format

A parser and serializer for the Textual Description Format (TDF): a compact
text notation for a graph of tagged and blank resources, each optionally
carrying a literal value and a set of properties pointing at other
resources.

## Architecture

The crate is layered the way [`rxml`](https://docs.rs/rxml) layers XML
parsing, just synchronous instead of incremental, since a TDF document is
always parsed or written whole:

* [`lexer`] — a code-point reader with one-character lookahead (C1).
* [`tag`], [`strings`] — the identity types: absolute-IRI [`tag::Tag`]s,
  validated [`strings::NameToken`]s and [`strings::Handle`]s.
* [`parser::label`] — label and handle resolution against a
  [`namespace::NamespaceRegistry`] (C3).
* [`parser::values`] — one parser per literal kind (C4).
* [`parser`] — the resource parser: labels, objects, collections,
  descriptions, document framing (C5).
* [`sink`] — the [`sink::Processor`] trait the parser drives, and the
  built-in [`sink::GraphBuilder`] that assembles a [`resource::Document`]
  (C6).
* [`resource`] — the in-memory resource graph (§11).
* [`writer`] — reference discovery and the serializer that turns a
  [`resource::Document`] back into text (C7, C8).

Most callers only need [`parse_str`] and [`to_string`].
*/
pub mod error;
pub mod lexer;
pub mod namespace;
pub mod parser;
pub mod resource;
pub mod sink;
pub mod strings;
pub mod tag;
pub mod value;
pub mod writer;

pub use error::{ParseError, ParseErrorKind, SerializeError};
pub use namespace::NamespaceRegistry;
pub use parser::{DocumentVariant, Parser, ParserOptions};
pub use resource::{CollectionKind, CompoundNode, Document, Node, ResourceId};
pub use sink::{DocumentError, GraphBuilder, Processor, ResourceShape};
pub use strings::{Handle, NameToken};
pub use tag::Tag;
pub use value::{Number, RegexValue, Temporal, Value};
pub use writer::{Format, Serializer, SerializerOptions};

/// Parse `input` into an owned [`Document`] using the default
/// [`GraphBuilder`] sink and default [`ParserOptions`].
pub fn parse_str(input: &str) -> Result<Document, ParseError> {
	parser::parse_to_document(input, ParserOptions::default())
}

/// Serialize `doc` to a freshly allocated `String` using default
/// [`SerializerOptions`].
pub fn to_string(doc: &Document) -> error::SerializeResult<String> {
	writer::to_string(doc, SerializerOptions::default())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_a_bare_string_root() {
		let doc = parse_str("\"hello\"").unwrap();
		assert_eq!(doc.roots.len(), 1);
		assert_eq!(doc.get(doc.roots[0]).as_literal(), Some(&Value::String("hello".to_string())));
	}

	#[test]
	fn parses_a_blank_object_with_a_property() {
		let doc = parse_str("*:dc-creator=\"Jane\";").unwrap();
		assert_eq!(doc.roots.len(), 1);
		let root = doc.get(doc.roots[0]).as_compound().unwrap();
		assert_eq!(root.edges.len(), 1);
	}

	#[test]
	fn round_trips_a_tagged_object() {
		let input = "===>urf:Ex=<https://ex.com/>;<|<https://ex.com/thing>|*:Ex/kind=\"widget\";";
		let doc = parse_str(input).unwrap();
		let text = to_string(&doc).unwrap();
		let doc2 = parse_str(&text).unwrap();
		assert_eq!(doc.roots.len(), doc2.roots.len());
		let a = doc.get(doc.roots[0]).as_compound().unwrap();
		let b = doc2.get(doc2.roots[0]).as_compound().unwrap();
		assert_eq!(a.tag, b.tag);
	}

	#[test]
	fn properties_only_document_has_one_implicit_root() {
		let mut options = ParserOptions::default();
		options.expected_variant = DocumentVariant::PropertiesOnly;
		let parser = Parser::new("dc-creator=\"Jane\"", GraphBuilder::new(), options);
		let doc = parser.parse_document().unwrap();
		assert_eq!(doc.roots.len(), 1);
		let root = doc.get(doc.roots[0]).as_compound().unwrap();
		assert_eq!(root.edges.len(), 1);
	}
}
