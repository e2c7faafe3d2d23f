//! Scope names and scope stacks.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// A dot-separated scope name such as `source.rust` or `comment.line.double-slash`.
///
/// Cheap to clone; the same names repeat across every token of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeName(Arc<str>);

impl ScopeName {
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true if `self` equals `prefix` or extends it by further
	/// dot-separated segments (`meta.embedded.block` covers `meta.embedded.block.sql`).
	pub fn has_segment_prefix(&self, prefix: &str) -> bool {
		match self.0.strip_prefix(prefix) {
			Some(rest) => rest.is_empty() || rest.starts_with('.'),
			None => false,
		}
	}
}

impl fmt::Display for ScopeName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ScopeName {
	fn from(s: &str) -> Self {
		Self::new(s)
	}
}

impl From<String> for ScopeName {
	fn from(s: String) -> Self {
		Self(Arc::from(s))
	}
}

impl AsRef<str> for ScopeName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for ScopeName {
	fn borrow(&self) -> &str {
		&self.0
	}
}

/// Ordered scope names attached to one token, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeStack(Arc<[ScopeName]>);

impl ScopeStack {
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<ScopeName>,
	{
		Self(scopes.into_iter().map(Into::into).collect())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn as_slice(&self) -> &[ScopeName] {
		&self.0
	}

	/// Iterates the scope names as string slices, outermost first.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
		self.0.iter().map(ScopeName::as_str)
	}

	/// The innermost (most specific) scope.
	pub fn innermost(&self) -> Option<&ScopeName> {
		self.0.last()
	}
}

impl<S: Into<ScopeName>> FromIterator<S> for ScopeStack {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self::new(iter)
	}
}

impl fmt::Display for ScopeStack {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, scope) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			f.write_str(scope.as_str())?;
		}
		Ok(())
	}
}
