use crate::marker::MarkerId;

/// An attribute held a value of the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attribute `{attribute}` is a {got}, expected a {expected}")]
pub struct AttrTypeError {
	pub attribute: String,
	pub expected: &'static str,
	pub got: &'static str,
}

impl AttrTypeError {
	pub(crate) fn new(attribute: &str, expected: &'static str, got: &'static str) -> Self {
		Self {
			attribute: attribute.to_string(),
			expected,
			got,
		}
	}

	/// Attaches the marker the attribute was read from.
	pub fn on_marker(self, marker: &MarkerId) -> ResolveError {
		ResolveError::AttributeType {
			marker: marker.clone(),
			source: self,
		}
	}
}

/// A declared reference could not be resolved during metadata extraction.
///
/// Fatal for the one declaration being processed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// A marker id is not present in the catalog.
	#[error("unresolvable marker `{marker}` referenced by {referenced_by}")]
	UnknownMarker { marker: MarkerId, referenced_by: String },
	/// A declaration extends a parent that does not exist.
	#[error("unresolvable declaration `{name}` extended by {extended_by}")]
	UnknownDeclaration { name: String, extended_by: String },
	/// An attribute could not be read as the expected kind.
	#[error("marker `{marker}`: {source}")]
	AttributeType {
		marker: MarkerId,
		#[source]
		source: AttrTypeError,
	},
	/// A marker is composed with itself, directly or transitively.
	#[error("marker `{marker}` is composed with itself")]
	CyclicComposition { marker: MarkerId },
	/// A declaration extends itself, directly or transitively.
	#[error("declaration `{name}` extends itself")]
	CyclicInheritance { name: String },
}

/// Catalog insertion failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
	#[error("duplicate marker id `{marker}`")]
	DuplicateMarker { marker: MarkerId },
	#[error("duplicate declaration `{name}`")]
	DuplicateDeclaration { name: String },
}
