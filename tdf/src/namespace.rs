/*!
# Namespace registry (C9)

A bidirectional `alias <-> namespace IRI` map, populated by the parser from
the document header and usable by the serializer both pre-seeded and via
auto-discovery (§4.7 step 1, §4.8).
*/
use std::collections::HashMap;

use tdf_grammar::DEFAULT_NAMESPACE;

/// Bidirectional alias/namespace map.
///
/// Read-only once parsing or serialization of a single document is
/// underway; per §5, callers sharing a registry across threads must treat
/// it as immutable after initial population.
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
	alias_to_namespace: HashMap<String, String>,
	namespace_to_alias: HashMap<String, String>,
}

impl NamespaceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `alias` for `namespace`. A later call with the same alias
	/// overwrites the mapping; this is used both for explicit header
	/// declarations and generated-prefix auto-discovery (§4.7).
	pub fn register(&mut self, alias: impl Into<String>, namespace: impl Into<String>) {
		let alias = alias.into();
		let namespace = namespace.into();
		if let Some(old_namespace) = self.alias_to_namespace.insert(alias.clone(), namespace.clone()) {
			self.namespace_to_alias.remove(&old_namespace);
		}
		self.namespace_to_alias.insert(namespace, alias);
	}

	/// Resolve an alias to its namespace IRI, for `alias/segment-...`
	/// handles (§4.8).
	pub fn namespace_for_alias(&self, alias: &str) -> Option<&str> {
		self.alias_to_namespace.get(alias).map(String::as_str)
	}

	/// Resolve a namespace IRI to an already-registered alias, used by the
	/// serializer when choosing how to emit a tag's namespace as a handle.
	pub fn alias_for_namespace(&self, namespace: &str) -> Option<&str> {
		self.namespace_to_alias.get(namespace).map(String::as_str)
	}

	/// All registered aliases in insertion-independent (hash) order, for
	/// header emission; the serializer sorts these for deterministic
	/// output.
	pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
		self.alias_to_namespace.iter().map(|(a, n)| (a.as_str(), n.as_str()))
	}

	pub fn is_empty(&self) -> bool {
		self.alias_to_namespace.is_empty()
	}

	/// Resolve `alias/segment-...` or bare `segment-...` against this
	/// registry and the fixed default namespace (§3 "Handle").
	pub fn resolve(&self, alias: Option<&str>, local: &str) -> Option<String> {
		let namespace = match alias {
			Some(alias) => self.namespace_for_alias(alias)?,
			None => DEFAULT_NAMESPACE,
		};
		let mut joined = String::with_capacity(namespace.len() + local.len());
		joined.push_str(namespace);
		if !namespace.ends_with(['/', '#']) {
			joined.push('/');
		}
		joined.push_str(local);
		Some(joined)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn register_and_resolve() {
		let mut reg = NamespaceRegistry::new();
		reg.register("dc", "http://purl.org/dc/terms/");
		assert_eq!(
			reg.resolve(Some("dc"), "creator"),
			Some("http://purl.org/dc/terms/creator".to_string())
		);
		assert_eq!(reg.alias_for_namespace("http://purl.org/dc/terms/"), Some("dc"));
		assert_eq!(reg.resolve(Some("missing"), "x"), None);
	}

	#[test]
	fn default_namespace_resolution() {
		let reg = NamespaceRegistry::new();
		assert_eq!(
			reg.resolve(None, "Ex"),
			Some(format!("{}Ex", DEFAULT_NAMESPACE))
		);
	}
}
