//! Configurers and the composite that merges their contributions.
//!
//! Multi-valued properties are aggregated from every configurer in
//! registration order. Single-valued properties are collapsed to their
//! distinct values and checked against a cardinality policy:
//!
//! | property     | policy        |
//! |--------------|---------------|
//! | address      | exactly one   |
//! | service type | exactly one   |
//! | transport    | at most one   |
//! | bus          | at most one   |

use std::sync::Arc;

use plait_model::{Contributions, Registry, TypeRef};

use crate::component::{Bus, Component};
use crate::error::ConflictError;
use crate::settings::EndpointSettings;


/// A pluggable source of endpoint configuration.
///
/// Every method defaults to a no-op, so implementors override only what they
/// contribute.
pub trait Configurer: Send + Sync {
	/// Name used in diagnostics.
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	fn address(&self) -> Option<String> {
		None
	}

	fn transport(&self) -> Option<String> {
		None
	}

	fn bus(&self) -> Option<Bus> {
		None
	}

	/// Interface type for client endpoints.
	fn service_type(&self) -> Option<TypeRef> {
		None
	}

	fn add_out_interceptors(&self, _interceptors: &mut Contributions<'_, Component>) {}

	fn add_in_interceptors(&self, _interceptors: &mut Contributions<'_, Component>) {}

	fn add_providers(&self, _providers: &mut Contributions<'_, Component>) {}

	fn add_features(&self, _features: &mut Contributions<'_, Component>) {}

	/// Only called for server endpoints.
	fn add_services(&self, _services: &mut Contributions<'_, Component>) {}

	/// Mutates the raw settings before any resolved value is applied.
	fn configure(&self, _settings: &mut EndpointSettings) {}
}

/// Collapses candidates to their distinct values, preserving first-seen order.
///
/// Distinctness is value equality; absent candidates are dropped.
pub fn distinct<T: PartialEq>(candidates: impl IntoIterator<Item = Option<T>>) -> Vec<T> {
	let mut values: Vec<T> = Vec::new();
	for candidate in candidates.into_iter().flatten() {
		if !values.contains(&candidate) {
			values.push(candidate);
		}
	}
	values
}

/// Selects the only distinct value, or `None` when nothing was supplied.
pub fn at_most_one<T: PartialEq>(field: &'static str, candidates: impl IntoIterator<Item = Option<T>>) -> Result<Option<T>, ConflictError> {
	let mut values = distinct(candidates);
	match values.len() {
		0 => Ok(None),
		1 => Ok(values.pop()),
		found => {
			tracing::warn!(field, found, "conflicting values configured");
			Err(ConflictError::TooMany { field, found })
		}
	}
}

/// Selects the only distinct value, failing when nothing was supplied.
pub fn exactly_one<T: PartialEq>(field: &'static str, candidates: impl IntoIterator<Item = Option<T>>) -> Result<T, ConflictError> {
	at_most_one(field, candidates)?.ok_or_else(|| {
		tracing::warn!(field, "required value not configured");
		ConflictError::Missing { field }
	})
}

/// The ordered set of configurers contributing to one endpoint kind.
#[derive(Clone, Default)]
pub struct ConfigurerComposite {
	configurers: Vec<Arc<dyn Configurer>>,
}

impl ConfigurerComposite {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a configurer. Registration order is application order.
	pub fn push(&mut self, configurer: Arc<dyn Configurer>) {
		self.configurers.push(configurer);
	}

	pub fn len(&self) -> usize {
		self.configurers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.configurers.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &dyn Configurer> {
		self.configurers.iter().map(|c| c.as_ref())
	}

	fn aggregate(&self, registry: &mut Registry<Component>, hook: impl Fn(&dyn Configurer, &mut Contributions<'_, Component>)) {
		let mut added = 0;
		for configurer in self.iter() {
			let mut contributions = registry.contributions();
			hook(configurer, &mut contributions);
			added += contributions.added();
		}
		tracing::trace!(
			registry = registry.label(),
			configurers = self.len(),
			added,
			"aggregated contributions",
		);
	}

	pub fn aggregate_out_interceptors(&self, registry: &mut Registry<Component>) {
		self.aggregate(registry, |c, r| c.add_out_interceptors(r));
	}

	pub fn aggregate_in_interceptors(&self, registry: &mut Registry<Component>) {
		self.aggregate(registry, |c, r| c.add_in_interceptors(r));
	}

	pub fn aggregate_providers(&self, registry: &mut Registry<Component>) {
		self.aggregate(registry, |c, r| c.add_providers(r));
	}

	pub fn aggregate_features(&self, registry: &mut Registry<Component>) {
		self.aggregate(registry, |c, r| c.add_features(r));
	}

	pub fn aggregate_services(&self, registry: &mut Registry<Component>) {
		self.aggregate(registry, |c, r| c.add_services(r));
	}

	pub fn resolve_address(&self) -> Result<String, ConflictError> {
		exactly_one("address", self.iter().map(|c| c.address()))
	}

	pub fn resolve_service_type(&self) -> Result<TypeRef, ConflictError> {
		exactly_one("serviceType", self.iter().map(|c| c.service_type()))
	}

	pub fn resolve_transport(&self) -> Result<Option<String>, ConflictError> {
		at_most_one("transport", self.iter().map(|c| c.transport()))
	}

	pub fn resolve_bus(&self) -> Result<Option<Bus>, ConflictError> {
		at_most_one("bus", self.iter().map(|c| c.bus()))
	}

	/// Runs every configure hook in registration order, without conflict detection.
	pub fn configure_all(&self, settings: &mut EndpointSettings) {
		for configurer in self.iter() {
			tracing::trace!(configurer = configurer.name(), endpoint = %settings.name, "configure hook");
			configurer.configure(settings);
		}
	}
}

impl FromIterator<Arc<dyn Configurer>> for ConfigurerComposite {
	fn from_iter<I: IntoIterator<Item = Arc<dyn Configurer>>>(iter: I) -> Self {
		Self {
			configurers: iter.into_iter().collect(),
		}
	}
}
