//! Startup orchestration over every declared endpoint.

use std::sync::Arc;

use indexmap::IndexMap;
use plait_model::MetadataResolver;
use rustc_hash::FxHashSet;

use crate::environment::Environment;
use crate::error::{BuildError, RegistrarError};
use crate::factory::EndpointFactory;
use crate::markers::EndpointKind;
use crate::recipe::BuildRecipe;
use crate::registrar::Registrar;
use crate::settings::EndpointRuntime;

/// Every endpoint recipe registered from one declaration set, with one lazy
/// factory per endpoint name.
///
/// Declarations that failed to register are kept with their error and never
/// block the endpoints of other declarations.
pub struct Assembly<'a, R: EndpointRuntime> {
	resolver: MetadataResolver<'a>,
	env: &'a Environment,
	runtime: R,
	factories: IndexMap<String, EndpointFactory<R::Endpoint>>,
	failures: IndexMap<String, RegistrarError>,
}

/// Outcome of registering a whole declaration set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registrations {
	/// Recipes in registration order, servers first.
	pub recipes: Vec<BuildRecipe>,
	/// Failed declarations with the first error each one hit.
	pub failures: Vec<(String, RegistrarError)>,
}

impl Registrations {
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn failure(&self, declaration: &str) -> Option<&RegistrarError> {
		self.failures.iter().find(|(name, _)| name == declaration).map(|(_, err)| err)
	}
}

/// Registers every declaration with both endpoint registrars, in declaration order.
///
/// A declaration that fails is recorded once and skipped by later registrars.
/// Endpoint names are unique across kinds; a later recipe reusing a name fails
/// its own declaration.
pub fn register_all(resolver: MetadataResolver<'_>) -> Registrations {
	let mut registrations = Registrations::default();
	let mut failed: FxHashSet<&str> = FxHashSet::default();
	let mut endpoints: FxHashSet<String> = FxHashSet::default();

	for kind in EndpointKind::ALL {
		let mut registrar = Registrar::new(kind, resolver);
		for decl in resolver.declarations().iter() {
			if failed.contains(decl.name.as_str()) {
				continue;
			}
			let outcome = registrar.register(decl).and_then(|recipe| match recipe {
				Some(recipe) if !endpoints.insert(recipe.name.clone()) => Err(RegistrarError::DuplicateEndpoint { name: recipe.name }),
				other => Ok(other),
			});
			match outcome {
				Ok(Some(recipe)) => registrations.recipes.push(recipe),
				Ok(None) => {}
				Err(error) => {
					tracing::warn!(kind = %kind, declaration = %decl.name, %error, "declaration registration failed");
					failed.insert(decl.name.as_str());
					registrations.failures.push((decl.name.clone(), error));
				}
			}
		}
	}
	registrations
}

impl<'a, R: EndpointRuntime> Assembly<'a, R> {
	/// Registers all declarations, keeping failures per declaration.
	pub fn new(resolver: MetadataResolver<'a>, env: &'a Environment, runtime: R) -> Self {
		let Registrations { recipes, failures } = register_all(resolver);
		let factories: IndexMap<_, _> = recipes
			.into_iter()
			.map(|recipe| (recipe.name.clone(), EndpointFactory::new(recipe)))
			.collect();
		tracing::debug!(endpoints = factories.len(), failed = failures.len(), "assembly registered");
		Self {
			resolver,
			env,
			runtime,
			factories,
			failures: failures.into_iter().collect(),
		}
	}

	pub fn runtime(&self) -> &R {
		&self.runtime
	}

	pub fn endpoint_names(&self) -> impl Iterator<Item = &str> {
		self.factories.keys().map(String::as_str)
	}

	pub fn factory(&self, name: &str) -> Option<&EndpointFactory<R::Endpoint>> {
		self.factories.get(name)
	}

	/// Declarations that failed to register, in declaration order.
	pub fn failures(&self) -> impl Iterator<Item = (&str, &RegistrarError)> {
		self.failures.iter().map(|(name, err)| (name.as_str(), err))
	}

	/// Returns the named endpoint, building it on first access.
	///
	/// A name matching a declaration that failed to register reports that
	/// registration error.
	pub fn endpoint(&self, name: &str) -> Result<Arc<R::Endpoint>, BuildError> {
		match self.factories.get(name) {
			Some(factory) => factory.ensure_built(self.env, &self.resolver, &self.runtime),
			None => Err(self.missing(name)),
		}
	}

	fn missing(&self, name: &str) -> BuildError {
		match self.failures.get(name) {
			Some(source) => BuildError::Registration {
				declaration: name.to_string(),
				source: source.clone(),
			},
			None => BuildError::UnknownEndpoint { name: name.to_string() },
		}
	}

	/// Builds every endpoint in registration order, then reports each failed
	/// declaration under its declaration name.
	///
	/// Failures are reported per entry and do not stop the remaining builds.
	pub fn build_all(&self) -> Vec<(String, Result<Arc<R::Endpoint>, BuildError>)> {
		let built = self.factories.iter().map(|(name, factory)| {
			let result = factory.ensure_built(self.env, &self.resolver, &self.runtime);
			if let Err(err) = &result {
				tracing::warn!(endpoint = %name, error = %err, "endpoint build failed");
			}
			(name.clone(), result)
		});
		let unregistered = self.failures.keys().map(|declaration| (declaration.clone(), Err(self.missing(declaration))));
		built.chain(unregistered).collect()
	}
}
