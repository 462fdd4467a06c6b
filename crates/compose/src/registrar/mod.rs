//! Turns marked declarations into build recipes.

use plait_model::{AttributeSet, Declaration, MarkerId, MetadataResolver, NAME_ATTRIBUTE, ResolveError};
use rustc_hash::FxHashSet;

use crate::error::RegistrarError;
use crate::markers::{ADDRESS_ATTRIBUTE, ANNOTATED_WITH_ATTRIBUTE, Collection, EndpointKind, NAMES_ATTRIBUTE, SERVICE_TYPE_ATTRIBUTE, TRANSPORT_ATTRIBUTE};
use crate::recipe::BuildRecipe;


/// Registers declarations carrying one endpoint kind's primary marker.
///
/// Each declaration yields at most one recipe. Registering the same
/// declaration twice, or two declarations with the same endpoint name, is an
/// error.
pub struct Registrar<'a> {
	kind: EndpointKind,
	resolver: MetadataResolver<'a>,
	declarations: FxHashSet<String>,
	endpoints: FxHashSet<String>,
}

impl<'a> Registrar<'a> {
	pub fn new(kind: EndpointKind, resolver: MetadataResolver<'a>) -> Self {
		Self {
			kind,
			resolver,
			declarations: FxHashSet::default(),
			endpoints: FxHashSet::default(),
		}
	}

	pub fn kind(&self) -> EndpointKind {
		self.kind
	}

	/// Builds the recipe for `decl`, or returns `None` if it does not carry the
	/// primary marker.
	pub fn register(&mut self, decl: &Declaration) -> Result<Option<BuildRecipe>, RegistrarError> {
		let primary = self.kind.primary_marker();
		let Some(attrs) = self.resolver.resolve_attributes(decl, &primary)? else {
			return Ok(None);
		};

		if self.declarations.contains(&decl.name) {
			return Err(RegistrarError::AlreadyRegistered {
				declaration: decl.name.clone(),
			});
		}

		let mut recipe = self.seed(decl, &attrs, &primary)?;
		if self.endpoints.contains(&recipe.name) {
			return Err(RegistrarError::DuplicateEndpoint { name: recipe.name });
		}

		for &collection in self.kind.collections() {
			self.add_factory_methods(decl, collection, &mut recipe)?;
			self.add_bulk(decl, collection, &mut recipe)?;
		}

		self.declarations.insert(decl.name.clone());
		self.endpoints.insert(recipe.name.clone());
		tracing::debug!(
			kind = %self.kind,
			endpoint = %recipe.name,
			declaration = %decl.name,
			services = recipe.services.len(),
			providers = recipe.providers.len(),
			features = recipe.features.len(),
			stereotypes = recipe.stereotypes.len(),
			"registered endpoint recipe",
		);
		Ok(Some(recipe))
	}

	fn seed(&self, decl: &Declaration, attrs: &AttributeSet, primary: &MarkerId) -> Result<BuildRecipe, ResolveError> {
		let read = |name: &str| -> Result<Option<String>, ResolveError> { Ok(attrs.string(name).map_err(|e| e.on_marker(primary))?.map(str::to_string)) };

		let name = read(NAME_ATTRIBUTE)?.unwrap_or_else(|| self.kind.default_name().to_string());
		let mut recipe = BuildRecipe::new(self.kind, name, &decl.name);
		recipe.address = read(ADDRESS_ATTRIBUTE)?;
		recipe.transport = read(TRANSPORT_ATTRIBUTE)?;
		if self.kind == EndpointKind::Client {
			recipe.service_type = attrs.type_ref(SERVICE_TYPE_ATTRIBUTE).map_err(|e| e.on_marker(primary))?.cloned();
		}
		Ok(recipe)
	}

	fn add_factory_methods(&self, decl: &Declaration, collection: Collection, recipe: &mut BuildRecipe) -> Result<(), ResolveError> {
		let marker = collection.method_marker();
		for method in self.resolver.find_marked_factory_methods(decl, &marker)? {
			if let Some(name) = self.resolver.factory_name(method, &marker)? {
				recipe.collection_mut(collection).push(name);
			}
		}
		Ok(())
	}

	fn add_bulk(&self, decl: &Declaration, collection: Collection, recipe: &mut BuildRecipe) -> Result<(), ResolveError> {
		let marker = collection.bulk_marker();
		let Some(attrs) = self.resolver.resolve_attributes(decl, &marker)? else {
			return Ok(());
		};

		let names = attrs.strings(NAMES_ATTRIBUTE).map_err(|e| e.on_marker(&marker))?;
		recipe
			.collection_mut(collection)
			.extend(names.into_iter().filter(|n| !n.is_empty()).map(str::to_string));

		if collection.expands_stereotypes() {
			for stereotype in attrs.type_refs(ANNOTATED_WITH_ATTRIBUTE).map_err(|e| e.on_marker(&marker))? {
				let id = MarkerId::new(stereotype.as_str());
				self.resolver.markers().require(&id, &decl.name)?;
				recipe.stereotypes.push(id);
			}
		}
		Ok(())
	}
}
