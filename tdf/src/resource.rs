/*!
# In-memory resource graph

Concrete arena-based graph backing both the default [`crate::sink::GraphBuilder`]
processor and the serializer (§11 of the expanded spec: §1 scopes the
general "processor that builds an application model" out, but §3's data
model and §4.6/§4.7's "in-memory resources" have to live somewhere).
*/
use crate::namespace::NamespaceRegistry;
use crate::strings::NameToken;
use crate::tag::Tag;
use crate::value::Value;

/// Arena index identifying a resource within one [`Document`].
///
/// `Copy + Eq + Hash`, satisfying §3 invariant 2 (tag equality implies
/// identity) and the "blank resource identity is by object identity"
/// clause, since two `ResourceId`s compare equal only if they index the
/// same arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(pub(crate) u32);

/// The kind of compound resource, used by the serializer's dispatch (§4.7
/// "use a jump table on class identifier").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
	List,
	Set,
	Map,
}

/// An object or collection resource: a tag/type-tag/alias plus
/// property/value edges.
///
/// Lists, sets and maps are represented the same way objects are — as
/// edges using synthetic property tags (§4.5) — because that is exactly
/// how the parser emits them to the event sink; `shape` is the one extra
/// bit a [`crate::sink::Processor`] needs (and that C5 always has
/// statically) to tell a list from a set from a map without sniffing those
/// synthetic tags back out.
#[derive(Debug, Clone, Default)]
pub struct CompoundNode {
	pub shape: Option<CollectionKind>,
	pub tag: Option<Tag>,
	pub type_tag: Option<Tag>,
	pub alias: Option<NameToken>,
	/// `(property, value)` edges, in document order. `property` indexes a
	/// resource which itself must carry a `tag` to be useful downstream,
	/// but is stored as a `ResourceId` to stay faithful to §4.2 ("property
	/// is a resource reference").
	pub edges: Vec<(ResourceId, ResourceId)>,
}

impl CompoundNode {
	pub fn is_object(&self) -> bool {
		self.shape.is_none()
	}
}

/// A node in the resource arena.
#[derive(Debug, Clone)]
pub enum Node {
	Compound(CompoundNode),
	Literal(Value),
}

impl Node {
	pub fn as_compound(&self) -> Option<&CompoundNode> {
		match self {
			Node::Compound(c) => Some(c),
			_ => None,
		}
	}

	pub fn as_compound_mut(&mut self) -> Option<&mut CompoundNode> {
		match self {
			Node::Compound(c) => Some(c),
			_ => None,
		}
	}

	pub fn as_literal(&self) -> Option<&Value> {
		match self {
			Node::Literal(v) => Some(v),
			_ => None,
		}
	}

	/// Whether this node is "compound" — can be referenced by identity and
	/// therefore participates in reference discovery (§4.6). Literals are
	/// excluded: they are value-equality-substitutable, not
	/// identity-substitutable.
	pub fn is_compound(&self) -> bool {
		matches!(self, Node::Compound(_))
	}
}

/// An owned resource graph: an arena of [`Node`]s, the roots reported by
/// the parser, and the namespace registry (§4.8) that was in effect while
/// parsing it (populated from the document header, if any, plus whatever
/// the caller pre-seeded it with) — the obvious default for re-serializing
/// the same document with the same aliases (§11 of the expanded spec).
#[derive(Debug, Clone, Default)]
pub struct Document {
	nodes: Vec<Node>,
	pub roots: Vec<ResourceId>,
	pub registry: NamespaceRegistry,
}

impl Document {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, node: Node) -> ResourceId {
		let id = ResourceId(self.nodes.len() as u32);
		self.nodes.push(node);
		id
	}

	pub fn get(&self, id: ResourceId) -> &Node {
		&self.nodes[id.0 as usize]
	}

	pub fn get_mut(&mut self, id: ResourceId) -> &mut Node {
		&mut self.nodes[id.0 as usize]
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &Node)> {
		self.nodes.iter().enumerate().map(|(i, n)| (ResourceId(i as u32), n))
	}
}
