//! Attribute values and attribute sets carried by marker uses.

use std::fmt;

use indexmap::IndexMap;

use crate::error::AttrTypeError;


/// Reference to a named type, such as a stereotype marker or a client service type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(String);

impl TypeRef {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TypeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TypeRef {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
	Str(String),
	StrArray(Vec<String>),
	Type(TypeRef),
	TypeArray(Vec<TypeRef>),
}

impl AttrValue {
	/// Builds a string-array value.
	pub fn strings<I, S>(items: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::StrArray(items.into_iter().map(Into::into).collect())
	}

	/// Builds a type-array value.
	pub fn types<I, S>(items: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::TypeArray(items.into_iter().map(TypeRef::new).collect())
	}

	/// Returns the kind name used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Str(_) => "string",
			Self::StrArray(_) => "string array",
			Self::Type(_) => "type",
			Self::TypeArray(_) => "type array",
		}
	}

	/// Returns true for the empty string and empty arrays.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Str(s) => s.is_empty(),
			Self::StrArray(items) => items.is_empty(),
			Self::Type(_) => false,
			Self::TypeArray(items) => items.is_empty(),
		}
	}
}

impl fmt::Display for AttrValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fn list<T>(f: &mut fmt::Formatter<'_>, items: &[T], item: impl Fn(&mut fmt::Formatter<'_>, &T) -> fmt::Result) -> fmt::Result {
			f.write_str("[")?;
			for (i, value) in items.iter().enumerate() {
				if i > 0 {
					f.write_str(", ")?;
				}
				item(f, value)?;
			}
			f.write_str("]")
		}

		match self {
			Self::Str(s) => write!(f, "{s:?}"),
			Self::StrArray(items) => list(f, items, |f, s| write!(f, "{s:?}")),
			Self::Type(t) => write!(f, "{{ type = {:?} }}", t.as_str()),
			Self::TypeArray(items) => list(f, items, |f, t| write!(f, "{{ type = {:?} }}", t.as_str())),
		}
	}
}

impl From<&str> for AttrValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<TypeRef> for AttrValue {
	fn from(value: TypeRef) -> Self {
		Self::Type(value)
	}
}

/// Mapping from attribute name to value, in declaration order.
///
/// Layering uses [`AttributeSet::overlay`]: values from the upper layer
/// replace lower ones by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
	entries: IndexMap<String, AttrValue>,
}

impl AttributeSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		self.insert(name, value);
		self
	}

	/// Inserts or replaces an attribute.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
		self.entries.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&AttrValue> {
		self.entries.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Copies every attribute of `upper` over this set.
	pub fn overlay(&mut self, upper: &AttributeSet) {
		for (name, value) in &upper.entries {
			self.entries.insert(name.clone(), value.clone());
		}
	}

	/// Copies attributes of `upper` over this set, restricted to names this set already declares.
	pub fn overlay_declared(&mut self, upper: &AttributeSet) {
		for (name, value) in &upper.entries {
			if let Some(slot) = self.entries.get_mut(name) {
				*slot = value.clone();
			}
		}
	}

	/// Returns a string attribute. Empty strings read as absent.
	pub fn string(&self, name: &str) -> Result<Option<&str>, AttrTypeError> {
		match self.entries.get(name) {
			None => Ok(None),
			Some(AttrValue::Str(s)) if s.is_empty() => Ok(None),
			Some(AttrValue::Str(s)) => Ok(Some(s.as_str())),
			// a single-element array stands in for a scalar, as with names
			Some(AttrValue::StrArray(items)) => Ok(items.first().map(String::as_str).filter(|s| !s.is_empty())),
			Some(other) => Err(AttrTypeError::new(name, "string", other.kind())),
		}
	}

	/// Returns a string-array attribute. A scalar string reads as a one-element array.
	pub fn strings(&self, name: &str) -> Result<Vec<&str>, AttrTypeError> {
		match self.entries.get(name) {
			None => Ok(Vec::new()),
			Some(AttrValue::Str(s)) if s.is_empty() => Ok(Vec::new()),
			Some(AttrValue::Str(s)) => Ok(vec![s.as_str()]),
			Some(AttrValue::StrArray(items)) => Ok(items.iter().map(String::as_str).collect()),
			Some(other) => Err(AttrTypeError::new(name, "string array", other.kind())),
		}
	}

	/// Returns a type-reference attribute.
	pub fn type_ref(&self, name: &str) -> Result<Option<&TypeRef>, AttrTypeError> {
		match self.entries.get(name) {
			None => Ok(None),
			Some(AttrValue::Type(t)) => Ok(Some(t)),
			Some(AttrValue::TypeArray(items)) => Ok(items.first()),
			Some(other) if other.is_empty() => Ok(None),
			Some(other) => Err(AttrTypeError::new(name, "type", other.kind())),
		}
	}

	/// Returns a type-array attribute. A single type reads as a one-element array.
	pub fn type_refs(&self, name: &str) -> Result<Vec<&TypeRef>, AttrTypeError> {
		match self.entries.get(name) {
			None => Ok(Vec::new()),
			Some(AttrValue::Type(t)) => Ok(vec![t]),
			Some(AttrValue::TypeArray(items)) => Ok(items.iter().collect()),
			Some(other) if other.is_empty() => Ok(Vec::new()),
			Some(other) => Err(AttrTypeError::new(name, "type array", other.kind())),
		}
	}
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for AttributeSet {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut set = Self::new();
		for (name, value) in iter {
			set.insert(name, value);
		}
		set
	}
}
