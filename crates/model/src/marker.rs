//! Marker definitions, marker uses, and the marker catalog.
//!
//! A [`MarkerDef`] is the declarative equivalent of an annotation type: it
//! declares attributes with default values and may itself carry other markers
//! (meta-declarations). A [`MarkerUse`] is one application of a marker to a
//! declaration, a method, or another marker, holding only the attributes the
//! user specified explicitly.

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;

use crate::attr::{AttrValue, AttributeSet};
use crate::error::{CatalogError, ResolveError};

/// Identifier of a marker type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(String);

impl MarkerId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for MarkerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for MarkerId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for MarkerId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for MarkerId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// One application of a marker, with the explicitly specified attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerUse {
	pub marker: MarkerId,
	pub attrs: AttributeSet,
}

impl MarkerUse {
	pub fn new(marker: impl Into<MarkerId>) -> Self {
		Self {
			marker: marker.into(),
			attrs: AttributeSet::new(),
		}
	}

	/// Sets an explicit attribute on this use.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		self.attrs.insert(name, value);
		self
	}
}

/// Definition of a marker type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDef {
	pub id: MarkerId,
	/// Declared attributes and their defaults.
	pub attributes: AttributeSet,
	/// Markers this marker is composed with.
	pub meta: Vec<MarkerUse>,
}

impl MarkerDef {
	pub fn new(id: impl Into<MarkerId>) -> Self {
		Self {
			id: id.into(),
			attributes: AttributeSet::new(),
			meta: Vec::new(),
		}
	}

	/// Declares an attribute with its default value.
	pub fn attribute(mut self, name: impl Into<String>, default: impl Into<AttrValue>) -> Self {
		self.attributes.insert(name, default);
		self
	}

	/// Composes this marker with another marker use.
	pub fn composed_with(mut self, meta: MarkerUse) -> Self {
		self.meta.push(meta);
		self
	}
}

/// All marker types known to one configuration environment.
#[derive(Debug, Clone, Default)]
pub struct MarkerCatalog {
	defs: IndexMap<MarkerId, MarkerDef>,
}

impl MarkerCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a marker definition. Marker ids are unique.
	pub fn register(&mut self, def: MarkerDef) -> Result<(), CatalogError> {
		if self.defs.contains_key(&def.id) {
			return Err(CatalogError::DuplicateMarker { marker: def.id });
		}
		self.defs.insert(def.id.clone(), def);
		Ok(())
	}

	pub fn get(&self, id: &str) -> Option<&MarkerDef> {
		self.defs.get(id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.defs.contains_key(id)
	}

	/// Looks up a marker, failing with an unresolvable-reference error.
	pub fn require(&self, id: &MarkerId, referenced_by: &str) -> Result<&MarkerDef, ResolveError> {
		self.defs.get(id).ok_or_else(|| ResolveError::UnknownMarker {
			marker: id.clone(),
			referenced_by: referenced_by.to_string(),
		})
	}

	pub fn len(&self) -> usize {
		self.defs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.defs.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &MarkerDef> {
		self.defs.values()
	}
}
