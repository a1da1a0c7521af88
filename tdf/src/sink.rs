/*!
# Event sink contract (C6, §4.2)

The parser (C5) emits events to a user-supplied [`Processor`]. The ordering
guarantee from §4.2 holds: every subject/property/value reference has been
previously declared (via [`Processor::declare_resource`] or
[`Processor::declare_literal`]) before it appears in a
[`Processor::process_statement`] or [`Processor::report_root`] call, and
statements for a given subject appear in document order.
*/
use std::convert::Infallible;
use std::error;
use std::fmt;

use crate::resource::{CollectionKind, CompoundNode, Document, Node, ResourceId};
use crate::tag::Tag;
use crate::value::Value;

/// The shape a newly declared compound resource takes (§4.5 "Collection
/// parsing" vs. plain object parsing).
///
/// This refines §4.2's `declare_resource(tag, optional type_tag)` with the
/// one extra bit of information C5 always has statically (it knows from
/// the begin-character alone whether it is building `[...]`, `(...)`,
/// `{...}` or `*...`) and which C7/C8 need to tell a list from a set from a
/// map without sniffing synthetic property tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceShape {
	Object,
	Collection(CollectionKind),
}

/// A pluggable sink for parse events.
///
/// `Resource` is the opaque per-resource handle this sink hands back from
/// `declare_*` and expects again in `process_statement`/`report_root`; it
/// need not be [`ResourceId`] — a sink that streams events straight into an
/// application's own object model can use its own node type here.
pub trait Processor: Sized {
	/// Opaque per-resource handle.
	type Resource: Copy;
	/// Error this sink can raise; aborts the parse immediately.
	type Error: error::Error + 'static;
	/// What [`finish`](Processor::finish) hands back to the parser's
	/// caller.
	type Output;

	/// A resource of this identity is known to exist. `type_tag` is
	/// present only for object resources created with an explicit type
	/// (§3 invariant 3, or a bare `*Type` object). Collections are always
	/// declared with `tag: None, type_tag: None` (§4.5: "Collections
	/// receive a blank tag so they have identity in the event stream").
	fn declare_resource(
		&mut self,
		tag: Option<&Tag>,
		type_tag: Option<&Tag>,
		shape: ResourceShape,
	) -> Result<Self::Resource, Self::Error>;

	/// A literal resource (§3: "a resource may additionally hold a literal
	/// value"). Literal resources are value-equality-substitutable (§4.6),
	/// not identity-substitutable, so unlike `declare_resource` this never
	/// needs to be looked up again by the parser — each literal occurrence
	/// gets its own call.
	fn declare_literal(&mut self, value: Value) -> Result<Self::Resource, Self::Error>;

	/// `subject` and `property` are resource references; `value` is a
	/// reference to any resource, including one created via
	/// `declare_literal`.
	fn process_statement(
		&mut self,
		subject: Self::Resource,
		property: Self::Resource,
		value: Self::Resource,
	) -> Result<(), Self::Error>;

	/// A document-root resource. Called exactly once per root found (§9
	/// open question, resolved: no synthetic root beyond what the body
	/// variant requires).
	fn report_root(&mut self, resource: Self::Resource) -> Result<(), Self::Error>;

	/// Consume the sink and produce its final result, once parsing has
	/// completed successfully.
	fn finish(self) -> Self::Output;
}

/// Either a parse failure or an error raised by the [`Processor`] the
/// parser was driving.
#[derive(Debug)]
pub enum DocumentError<E> {
	Parse(crate::error::ParseError),
	Sink(E),
}

impl<E: fmt::Display> fmt::Display for DocumentError<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DocumentError::Parse(e) => fmt::Display::fmt(e, f),
			DocumentError::Sink(e) => fmt::Display::fmt(e, f),
		}
	}
}

impl<E: error::Error + 'static> error::Error for DocumentError<E> {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			DocumentError::Parse(e) => Some(e),
			DocumentError::Sink(e) => Some(e),
		}
	}
}

impl<E> From<crate::error::ParseError> for DocumentError<E> {
	fn from(e: crate::error::ParseError) -> Self {
		DocumentError::Parse(e)
	}
}

/// The default [`Processor`]: builds a [`Document`] — the concrete
/// in-memory resource graph described in §11 of the expanded spec.
///
/// Most callers that don't need to stream events straight into their own
/// application model should use this.
#[derive(Debug, Default)]
pub struct GraphBuilder {
	document: Document,
}

impl GraphBuilder {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Processor for GraphBuilder {
	type Resource = ResourceId;
	type Error = Infallible;
	type Output = Document;

	fn declare_resource(
		&mut self,
		tag: Option<&Tag>,
		type_tag: Option<&Tag>,
		shape: ResourceShape,
	) -> Result<ResourceId, Infallible> {
		let shape = match shape {
			ResourceShape::Object => None,
			ResourceShape::Collection(kind) => Some(kind),
		};
		Ok(self.document.insert(Node::Compound(CompoundNode {
			shape,
			tag: tag.cloned(),
			type_tag: type_tag.cloned(),
			alias: None,
			edges: Vec::new(),
		})))
	}

	fn declare_literal(&mut self, value: Value) -> Result<ResourceId, Infallible> {
		Ok(self.document.insert(Node::Literal(value)))
	}

	fn process_statement(
		&mut self,
		subject: ResourceId,
		property: ResourceId,
		value: ResourceId,
	) -> Result<(), Infallible> {
		if let Node::Compound(obj) = self.document.get_mut(subject) {
			obj.edges.push((property, value));
		}
		Ok(())
	}

	fn report_root(&mut self, resource: ResourceId) -> Result<(), Infallible> {
		self.document.roots.push(resource);
		Ok(())
	}

	fn finish(self) -> Document {
		self.document
	}
}
