//! Metadata resolution with meta-marker inheritance.
//!
//! Resolving marker `T` on a list of marker uses produces the attribute set a
//! reader of `T` observes. Layers, lowest precedence first:
//!
//! 1. `T`'s declared defaults
//! 2. attributes inherited through a composed marker `M` that carries `T`
//!    (recursively), overlaid by `M`'s own declared defaults and then by the
//!    attributes specified on the use of `M` that `M` declares; only names `T`
//!    declares are taken
//! 3. attributes specified on a direct use of `T`
//!
//! When several composed markers lead to `T`, the first in declaration order
//! supplies the inherited layer.

use rustc_hash::FxHashSet;

use crate::attr::AttributeSet;
use crate::decl::{Declaration, DeclarationSet, MethodDescriptor};
use crate::error::ResolveError;
use crate::marker::{MarkerCatalog, MarkerDef, MarkerId, MarkerUse};

#[cfg(test)]
mod tests;

/// Attribute name read from factory-method markers.
pub const NAME_ATTRIBUTE: &str = "name";

/// Reads marker metadata off declarations, methods, and marker uses.
#[derive(Clone, Copy)]
pub struct MetadataResolver<'a> {
	markers: &'a MarkerCatalog,
	declarations: &'a DeclarationSet,
}

impl<'a> MetadataResolver<'a> {
	pub fn new(markers: &'a MarkerCatalog, declarations: &'a DeclarationSet) -> Self {
		Self { markers, declarations }
	}

	pub fn markers(&self) -> &'a MarkerCatalog {
		self.markers
	}

	pub fn declarations(&self) -> &'a DeclarationSet {
		self.declarations
	}

	/// Resolves `marker` on a declaration.
	///
	/// Returns `None` if the declaration carries neither the marker nor a
	/// marker composed with it.
	pub fn resolve_attributes(&self, decl: &Declaration, marker: &MarkerId) -> Result<Option<AttributeSet>, ResolveError> {
		self.resolve_on(&decl.markers, marker, &decl.name)
	}

	/// Resolves `marker` on an arbitrary list of marker uses.
	///
	/// `owner` names the carrier in unresolvable-reference errors.
	pub fn resolve_on(&self, uses: &[MarkerUse], marker: &MarkerId, owner: &str) -> Result<Option<AttributeSet>, ResolveError> {
		let target = self.markers.require(marker, owner)?;
		let mut path = Vec::new();
		self.resolve_in(uses, target, owner, &mut path)
	}

	/// Returns true if the uses carry `marker` directly or through composition.
	pub fn carries(&self, uses: &[MarkerUse], marker: &MarkerId, owner: &str) -> Result<bool, ResolveError> {
		Ok(self.resolve_on(uses, marker, owner)?.is_some())
	}

	fn resolve_in(&self, uses: &[MarkerUse], target: &MarkerDef, owner: &str, path: &mut Vec<MarkerId>) -> Result<Option<AttributeSet>, ResolveError> {
		let mut direct: Option<&MarkerUse> = None;
		let mut inherited: Option<AttributeSet> = None;

		for marker_use in uses {
			if marker_use.marker == target.id {
				direct.get_or_insert(marker_use);
				continue;
			}

			let composed = self.markers.require(&marker_use.marker, owner)?;
			if path.contains(&composed.id) {
				return Err(ResolveError::CyclicComposition { marker: composed.id.clone() });
			}

			path.push(composed.id.clone());
			let via = self.resolve_in(&composed.meta, target, composed.id.as_str(), path)?;
			path.pop();

			if let Some(mut via) = via
				&& inherited.is_none()
			{
				let forwarded: AttributeSet = marker_use
					.attrs
					.iter()
					.filter(|(name, _)| composed.attributes.contains(name))
					.map(|(name, value)| (name, value.clone()))
					.collect();
				via.overlay_declared(&composed.attributes);
				via.overlay_declared(&forwarded);
				inherited = Some(via);
			}
		}

		if direct.is_none() && inherited.is_none() {
			return Ok(None);
		}

		let mut resolved = inherited.unwrap_or_else(|| target.attributes.clone());
		if let Some(direct) = direct {
			resolved.overlay(&direct.attrs);
		}
		Ok(Some(resolved))
	}

	/// Returns the declaration followed by its ancestors, nearest first.
	pub fn hierarchy<'d>(&self, decl: &'d Declaration) -> Result<Vec<&'d Declaration>, ResolveError>
	where
		'a: 'd,
	{
		let mut chain = vec![decl];
		let mut seen: FxHashSet<&str> = FxHashSet::default();
		seen.insert(&decl.name);

		let mut current = decl;
		while let Some(parent_name) = &current.extends {
			let parent = self.declarations.get(parent_name).ok_or_else(|| ResolveError::UnknownDeclaration {
				name: parent_name.clone(),
				extended_by: current.name.clone(),
			})?;
			if !seen.insert(&parent.name) {
				return Err(ResolveError::CyclicInheritance { name: parent.name.clone() });
			}
			chain.push(parent);
			current = parent;
		}
		Ok(chain)
	}

	/// Finds every factory method reachable from the declaration that carries
	/// `marker`, directly or through composition.
	///
	/// Own methods come first, then inherited ones; a method redeclared by name
	/// hides the inherited one. Callers must only rely on the order for
	/// stability, not for semantics.
	pub fn find_marked_factory_methods<'d>(&self, decl: &'d Declaration, marker: &MarkerId) -> Result<Vec<&'d MethodDescriptor>, ResolveError>
	where
		'a: 'd,
	{
		let mut seen: FxHashSet<&str> = FxHashSet::default();
		let mut marked = Vec::new();

		for owner in self.hierarchy(decl)? {
			for method in &owner.methods {
				if !seen.insert(&method.name) {
					continue;
				}
				let qualified = format!("{}::{}", owner.name, method.name);
				if self.carries(&method.markers, marker, &qualified)? {
					marked.push(method);
				}
			}
		}
		Ok(marked)
	}

	/// Resolves the registration name of a factory method marked with `marker`.
	///
	/// Uses the first non-empty entry of the `name` attribute, falling back to
	/// the method identifier. Additional names are ignored. Returns `None` if the
	/// method does not carry the marker.
	pub fn factory_name(&self, method: &MethodDescriptor, marker: &MarkerId) -> Result<Option<String>, ResolveError> {
		let Some(attrs) = self.resolve_on(&method.markers, marker, &method.name)? else {
			return Ok(None);
		};

		let names: Vec<&str> = attrs
			.strings(NAME_ATTRIBUTE)
			.map_err(|e| e.on_marker(marker))?
			.into_iter()
			.filter(|name| !name.is_empty())
			.collect();

		match names.as_slice() {
			[] => Ok(Some(method.name.clone())),
			[first] => Ok(Some((*first).to_string())),
			[first, ignored @ ..] => {
				tracing::warn!(
					method = %method.name,
					marker = %marker,
					used = *first,
					?ignored,
					"factory method declares several names; only the first is registered",
				);
				Ok(Some((*first).to_string()))
			}
		}
	}
}
