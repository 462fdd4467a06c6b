//! Lazy, memoized endpoint construction.
//!
//! An [`EndpointFactory`] moves through `Unbuilt -> Building -> Built` on the
//! first [`EndpointFactory::ensure_built`] call. A failed build returns to
//! `Unbuilt` with the original recipe; partially merged registries are
//! dropped with the failed attempt.

use std::cell::RefCell;
use std::mem;
use std::sync::Arc;

use plait_model::{MetadataResolver, Registry};

use crate::component::Component;
use crate::environment::Environment;
use crate::error::BuildError;
use crate::markers::EndpointKind;
use crate::recipe::BuildRecipe;
use crate::settings::{EndpointRuntime, EndpointSettings};

#[cfg(test)]
mod tests;

enum State<E> {
	Unbuilt(BuildRecipe),
	Building,
	Built(Arc<E>),
}

/// Lifecycle phase of an [`EndpointFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Unbuilt,
	Building,
	Built,
}

/// Owns one endpoint's recipe until the endpoint is built, then the endpoint.
///
/// Not thread-safe; construction is expected to run during single-threaded
/// startup.
pub struct EndpointFactory<E> {
	kind: EndpointKind,
	name: String,
	state: RefCell<State<E>>,
}

impl<E> EndpointFactory<E> {
	pub fn new(recipe: BuildRecipe) -> Self {
		Self {
			kind: recipe.kind,
			name: recipe.name.clone(),
			state: RefCell::new(State::Unbuilt(recipe)),
		}
	}

	pub fn kind(&self) -> EndpointKind {
		self.kind
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn phase(&self) -> Phase {
		match &*self.state.borrow() {
			State::Unbuilt(_) => Phase::Unbuilt,
			State::Building => Phase::Building,
			State::Built(_) => Phase::Built,
		}
	}

	/// Returns a copy of the recipe while the endpoint is still unbuilt.
	pub fn recipe(&self) -> Option<BuildRecipe> {
		match &*self.state.borrow() {
			State::Unbuilt(recipe) => Some(recipe.clone()),
			_ => None,
		}
	}

	/// Returns the endpoint, building it on first access.
	///
	/// A request arriving while the endpoint is being built fails with
	/// [`BuildError::Reentrant`].
	pub fn ensure_built<R>(&self, env: &Environment, resolver: &MetadataResolver<'_>, runtime: &R) -> Result<Arc<E>, BuildError>
	where
		R: EndpointRuntime<Endpoint = E> + ?Sized,
	{
		let recipe = {
			let mut state = self.state.borrow_mut();
			match mem::replace(&mut *state, State::Building) {
				State::Built(endpoint) => {
					*state = State::Built(Arc::clone(&endpoint));
					return Ok(endpoint);
				}
				State::Building => {
					tracing::warn!(endpoint = %self.name, "endpoint requested during its own build");
					return Err(BuildError::Reentrant { endpoint: self.name.clone() });
				}
				State::Unbuilt(recipe) => recipe,
			}
		};

		tracing::debug!(kind = %self.kind, endpoint = %self.name, "building endpoint");
		match build(&recipe, env, resolver, runtime) {
			Ok(endpoint) => {
				let endpoint = Arc::new(endpoint);
				*self.state.borrow_mut() = State::Built(Arc::clone(&endpoint));
				tracing::debug!(kind = %self.kind, endpoint = %self.name, "endpoint built");
				Ok(endpoint)
			}
			Err(err) => {
				*self.state.borrow_mut() = State::Unbuilt(recipe);
				tracing::debug!(kind = %self.kind, endpoint = %self.name, error = %err, "endpoint build failed");
				Err(err)
			}
		}
	}
}

fn build<R>(recipe: &BuildRecipe, env: &Environment, resolver: &MetadataResolver<'_>, runtime: &R) -> Result<R::Endpoint, BuildError>
where
	R: EndpointRuntime + ?Sized,
{
	let settings = compose_settings(recipe, env, resolver)?;
	runtime.construct(settings).map_err(|source| BuildError::Runtime {
		kind: recipe.kind,
		endpoint: recipe.name.clone(),
		source,
	})
}

/// Merges container-wide configurers with the local recipe.
///
/// Configure hooks run first. Local single values win over configurer values;
/// configurer values are only consulted when the recipe leaves a property
/// unspecified. Collections are appended in the order: configurer
/// contributions, local named references, stereotype carriers.
pub fn compose_settings(recipe: &BuildRecipe, env: &Environment, resolver: &MetadataResolver<'_>) -> Result<EndpointSettings, BuildError> {
	let endpoint = recipe.name.as_str();
	let configurers = env.configurers(recipe.kind);
	let mut settings = EndpointSettings::new(recipe.kind, endpoint);

	configurers.configure_all(&mut settings);

	let address = match &recipe.address {
		Some(address) => address.clone(),
		None => configurers.resolve_address().map_err(BuildError::conflict(endpoint))?,
	};
	settings.address = Some(address);

	let transport = match &recipe.transport {
		Some(transport) => Some(transport.clone()),
		None => configurers.resolve_transport().map_err(BuildError::conflict(endpoint))?,
	};
	if transport.is_some() {
		settings.transport = transport;
	}

	if let Some(bus) = configurers.resolve_bus().map_err(BuildError::conflict(endpoint))? {
		settings.bus = Some(bus);
	}

	if recipe.kind == EndpointKind::Client {
		let service_type = match &recipe.service_type {
			Some(service_type) => service_type.clone(),
			None => configurers.resolve_service_type().map_err(BuildError::conflict(endpoint))?,
		};
		settings.service_type = Some(service_type);
	}

	configurers.aggregate_out_interceptors(&mut settings.out_interceptors);
	configurers.aggregate_in_interceptors(&mut settings.in_interceptors);

	configurers.aggregate_providers(&mut settings.providers);
	add_named(&mut settings.providers, &recipe.providers, env, endpoint)?;

	configurers.aggregate_features(&mut settings.features);
	add_named(&mut settings.features, &recipe.features, env, endpoint)?;

	if recipe.kind == EndpointKind::Server {
		configurers.aggregate_services(&mut settings.services);
		add_named(&mut settings.services, &recipe.services, env, endpoint)?;
		for stereotype in &recipe.stereotypes {
			let carriers = env.beans_carrying(resolver, stereotype).map_err(BuildError::unresolvable(endpoint))?;
			tracing::trace!(endpoint, stereotype = %stereotype, found = carriers.len(), "expanded stereotype");
			settings.services.extend(carriers.into_iter().cloned());
		}
	}

	Ok(settings)
}

fn add_named(registry: &mut Registry<Component>, names: &Registry<String>, env: &Environment, endpoint: &str) -> Result<(), BuildError> {
	for name in names {
		let component = env.bean(name).ok_or_else(|| BuildError::UnknownBean {
			endpoint: endpoint.to_string(),
			name: name.clone(),
		})?;
		registry.push(component.clone());
	}
	Ok(())
}
