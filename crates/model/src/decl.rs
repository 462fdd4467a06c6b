//! Declarations: the explicit descriptors that markers are attached to.

use indexmap::IndexMap;

use crate::error::CatalogError;
use crate::marker::MarkerUse;

/// A factory method on a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
	/// The method's own identifier, used as the fallback registration name.
	pub name: String,
	pub markers: Vec<MarkerUse>,
}

impl MethodDescriptor {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			markers: Vec::new(),
		}
	}

	pub fn marked(mut self, marker: MarkerUse) -> Self {
		self.markers.push(marker);
		self
	}
}

/// A class-like declaration carrying markers and factory methods.
///
/// `extends` names a parent declaration whose methods are inherited. Markers
/// are not inherited from the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
	pub name: String,
	pub extends: Option<String>,
	pub markers: Vec<MarkerUse>,
	pub methods: Vec<MethodDescriptor>,
}

impl Declaration {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			extends: None,
			markers: Vec::new(),
			methods: Vec::new(),
		}
	}

	pub fn extends(mut self, parent: impl Into<String>) -> Self {
		self.extends = Some(parent.into());
		self
	}

	pub fn marked(mut self, marker: MarkerUse) -> Self {
		self.markers.push(marker);
		self
	}

	pub fn method(mut self, method: MethodDescriptor) -> Self {
		self.methods.push(method);
		self
	}
}

/// The immutable set of declarations visible during startup, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DeclarationSet {
	decls: IndexMap<String, Declaration>,
}

impl DeclarationSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, decl: Declaration) -> Result<(), CatalogError> {
		if self.decls.contains_key(&decl.name) {
			return Err(CatalogError::DuplicateDeclaration { name: decl.name });
		}
		self.decls.insert(decl.name.clone(), decl);
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<&Declaration> {
		self.decls.get(name)
	}

	pub fn len(&self) -> usize {
		self.decls.len()
	}

	pub fn is_empty(&self) -> bool {
		self.decls.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
		self.decls.values()
	}
}
