/*!
# Strongly-typed strings for TDF documents

Small wrapper types around [`smartstring`], mirroring the teacher's
`Name`/`NCName`/`CData` split: these types carry the fact that their
contents were already checked against a grammar production, so downstream
code never has to re-validate them.
*/
use std::borrow::Borrow;
use std::convert::TryFrom;
use std::fmt;
use std::ops::Deref;

use smartstring::alias::String as SmartString;

use tdf_grammar::{validate_handle, validate_name_token, Error as GrammarError};

/// A bare name-token: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Used for aliases (`|foo|`), ID strings' type context, and the segments a
/// [`Handle`] is built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NameToken(SmartString);

impl NameToken {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl TryFrom<&str> for NameToken {
	type Error = GrammarError;

	fn try_from(s: &str) -> Result<Self, Self::Error> {
		validate_name_token(s)?;
		Ok(NameToken(SmartString::from(s)))
	}
}

impl TryFrom<String> for NameToken {
	type Error = GrammarError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		validate_name_token(&s)?;
		Ok(NameToken(SmartString::from(s)))
	}
}

impl Deref for NameToken {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for NameToken {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NameToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A compact handle reference, already validated against the handle
/// grammar (§4.3), in its original textual form.
///
/// Stores the raw handle text (e.g. `"urf/dc-creator"`, `"many+"`,
/// `"Ex#bar"`) rather than pre-split segments: the label resolver splits it
/// again on demand, since handles are short and split once per occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle(SmartString);

impl Handle {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The namespace alias prefix, if this handle is of the
	/// `alias/segments` form.
	pub fn namespace_alias(&self) -> Option<&str> {
		self.0.split_once('/').map(|(alias, _)| alias)
	}

	/// The `#idToken` suffix, if present.
	pub fn id_token(&self) -> Option<&str> {
		self.0.split_once('#').map(|(_, id)| id)
	}

	/// Whether this handle carries the n-ary `+` marker.
	pub fn is_n_ary(&self) -> bool {
		let without_id = self.0.split('#').next().unwrap_or(&self.0);
		without_id.ends_with('+')
	}

	/// The dash-joined segment text, with the `alias/` prefix, `+` marker
	/// and `#idToken` suffix stripped.
	pub fn segments(&self) -> &str {
		let without_id = self.0.split('#').next().unwrap_or(&self.0);
		let without_plus = without_id.strip_suffix('+').unwrap_or(without_id);
		match without_plus.split_once('/') {
			Some((_, rest)) => rest,
			None => without_plus,
		}
	}
}

impl TryFrom<&str> for Handle {
	type Error = GrammarError;

	fn try_from(s: &str) -> Result<Self, Self::Error> {
		validate_handle(s)?;
		Ok(Handle(SmartString::from(s)))
	}
}

impl fmt::Display for Handle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn handle_accessors() {
		let h = Handle::try_from("urf/dc-creator").unwrap();
		assert_eq!(h.namespace_alias(), Some("urf"));
		assert_eq!(h.segments(), "dc-creator");
		assert!(!h.is_n_ary());

		let h = Handle::try_from("many+").unwrap();
		assert!(h.is_n_ary());
		assert_eq!(h.segments(), "many");

		let h = Handle::try_from("Ex#bar").unwrap();
		assert_eq!(h.id_token(), Some("bar"));
		assert_eq!(h.segments(), "Ex");
	}
}
