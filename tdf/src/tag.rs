/*!
# Tags: absolute-IRI resource identities

See §3 DATA MODEL, "Tag".
*/
use std::fmt;

use iri_string::types::{IriReferenceString, IriString};

use crate::error::{ParseError, ParseErrorKind, Position};

/// An absolute IRI identifying a resource.
///
/// May be decomposed into `namespace` (everything but the last path segment
/// or fragment) and `name` (the final segment or fragment). A tag with a
/// `#fragment` is an *ID tag*; stripping the fragment yields its *ID-type
/// tag*.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(IriString);

impl Tag {
	/// Parse and validate `s` as an absolute IRI tag.
	///
	/// `IriString` (as opposed to `IriReferenceString`) already requires an
	/// RFC 3987 `scheme`, so any string that parses into it is, by
	/// construction, the "absolute IRI" §3 requires for a tag; a relative
	/// reference (no scheme) simply fails to parse as `IriString` in the
	/// first place.
	pub fn parse(s: &str) -> Result<Self, ParseError> {
		let iri: IriString = s.parse().map_err(|e| {
			ParseError::new(
				Position::start(),
				ParseErrorKind::Collaborator("IRI", Box::new(e)),
			)
		})?;
		Ok(Tag(iri))
	}

	/// Parse text from an IRI literal (`<...>`, §4.4) used in label
	/// position where a tag is syntactically required (`\|<...>\|`).
	///
	/// Distinguishes a well-formed-but-relative IRI reference (→
	/// [`ParseErrorKind::TagNotAbsolute`]) from outright malformed IRI text
	/// (→ [`ParseErrorKind::Collaborator`]).
	pub fn from_iri_literal(s: &str) -> Result<Self, ParseError> {
		match Tag::parse(s) {
			Ok(tag) => Ok(tag),
			Err(_) => {
				let _: IriReferenceString = s.parse().map_err(|e| {
					ParseError::new(
						Position::start(),
						ParseErrorKind::Collaborator("IRI", Box::new(e)),
					)
				})?;
				Err(ParseError::new(Position::start(), ParseErrorKind::TagNotAbsolute))
			}
		}
	}

	/// Construct a tag by joining a namespace IRI with a final segment,
	/// used when resolving handles (§4.3) and ID labels (§3 invariant 3).
	pub fn from_namespace_and_name(namespace: &str, name: &str) -> Result<Self, ParseError> {
		let mut joined = String::with_capacity(namespace.len() + name.len());
		joined.push_str(namespace);
		if !namespace.ends_with(['/', '#']) {
			joined.push('/');
		}
		joined.push_str(name);
		Tag::parse(&joined)
	}

	/// Build the `typeTag#id` tag from an ID-type tag and a bare id string
	/// (§3 invariant 3).
	pub fn with_fragment(type_tag: &Tag, id: &str) -> Result<Self, ParseError> {
		let base = type_tag.0.as_str().split('#').next().unwrap_or(type_tag.0.as_str());
		Tag::parse(&format!("{}#{}", base, id))
	}

	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}

	/// `true` if this tag has a `#fragment` (an ID tag).
	pub fn has_fragment(&self) -> bool {
		self.fragment().is_some()
	}

	pub fn fragment(&self) -> Option<&str> {
		self.0.as_str().split_once('#').map(|(_, frag)| frag).filter(|f| !f.is_empty())
	}

	/// The namespace: the IRI minus its last path segment or fragment.
	pub fn namespace(&self) -> &str {
		let s = self.0.as_str();
		let without_fragment = s.split('#').next().unwrap_or(s);
		match without_fragment.rfind('/') {
			Some(idx) => &without_fragment[..=idx],
			None => without_fragment,
		}
	}

	/// The path segment before any fragment — the type/object segment of
	/// an ID tag (`Ex` in `.../Ex#bar`), or the same as [`Tag::name`] for a
	/// fragment-free tag.
	///
	/// Distinct from [`Tag::name`], which returns the fragment itself when
	/// one is present; the serializer's handle reconstruction (§4.7) needs
	/// this segment plus [`Tag::fragment`] separately.
	pub fn path_segment(&self) -> &str {
		let s = self.0.as_str();
		let without_fragment = s.split('#').next().unwrap_or(s);
		match without_fragment.rfind('/') {
			Some(idx) => &without_fragment[idx + 1..],
			None => without_fragment,
		}
	}

	/// The name: the final path segment, or the fragment if this is an ID
	/// tag.
	pub fn name(&self) -> &str {
		let s = self.0.as_str();
		if let Some((_, frag)) = s.split_once('#') {
			if !frag.is_empty() {
				return frag;
			}
		}
		let without_fragment = s.split('#').next().unwrap_or(s);
		match without_fragment.rfind('/') {
			Some(idx) => &without_fragment[idx + 1..],
			None => without_fragment,
		}
	}

	/// This tag with any fragment stripped — the ID-type tag of an ID tag.
	pub fn id_type_tag(&self) -> Tag {
		let s = self.0.as_str();
		let without_fragment = s.split('#').next().unwrap_or(s);
		// `without_fragment` was already validated as part of a larger
		// absolute IRI, so re-parsing cannot fail.
		Tag::parse(without_fragment).expect("fragment-stripped tag is still a valid IRI")
	}
}

impl fmt::Display for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decompose_fragment_tag() {
		let tag = Tag::parse("https://urf.name/Ex#bar").unwrap();
		assert_eq!(tag.namespace(), "https://urf.name/");
		assert_eq!(tag.name(), "bar");
		assert!(tag.has_fragment());
		assert_eq!(tag.id_type_tag().as_str(), "https://urf.name/Ex");
	}

	#[test]
	fn path_segment_vs_name() {
		let tag = Tag::parse("https://urf.name/Ex#bar").unwrap();
		assert_eq!(tag.path_segment(), "Ex");
		assert_eq!(tag.name(), "bar");
	}

	#[test]
	fn decompose_plain_tag() {
		let tag = Tag::parse("https://ex.com/x").unwrap();
		assert_eq!(tag.namespace(), "https://ex.com/");
		assert_eq!(tag.name(), "x");
		assert!(!tag.has_fragment());
	}

	#[test]
	fn rejects_relative() {
		assert!(Tag::parse("not-absolute").is_err());
	}
}
