//! The raw factory handle and the endpoint-construction seam.

use indexmap::IndexMap;
use plait_model::{Registry, TypeRef};

use crate::component::{Bus, Component};
use crate::error::RuntimeError;
use crate::markers::EndpointKind;

/// Mutable endpoint settings handed to configure hooks, then filled with the
/// resolved values and merged registries before construction.
///
/// Unset single values are passed to the runtime as `None`; the runtime may
/// apply its own defaults (a default bus, for instance).
#[derive(Debug, Clone)]
pub struct EndpointSettings {
	pub kind: EndpointKind,
	pub name: String,
	pub address: Option<String>,
	pub transport: Option<String>,
	pub bus: Option<Bus>,
	/// Only meaningful for clients.
	pub service_type: Option<TypeRef>,
	pub services: Registry<Component>,
	pub providers: Registry<Component>,
	pub features: Registry<Component>,
	pub in_interceptors: Registry<Component>,
	pub out_interceptors: Registry<Component>,
	/// Free-form properties passed through to the runtime untouched.
	pub properties: IndexMap<String, String>,
}

impl EndpointSettings {
	pub fn new(kind: EndpointKind, name: impl Into<String>) -> Self {
		Self {
			kind,
			name: name.into(),
			address: None,
			transport: None,
			bus: None,
			service_type: None,
			services: Registry::new("services"),
			providers: Registry::new("providers"),
			features: Registry::new("features"),
			in_interceptors: Registry::new("in_interceptors"),
			out_interceptors: Registry::new("out_interceptors"),
			properties: IndexMap::new(),
		}
	}

	/// Sets a raw property, returning the previous value.
	pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.properties.insert(key.into(), value.into())
	}

	pub fn property(&self, key: &str) -> Option<&str> {
		self.properties.get(key).map(String::as_str)
	}
}

/// The external collaborator that turns merged settings into a runtime endpoint.
///
/// Called at most once per endpoint.
pub trait EndpointRuntime {
	type Endpoint;

	fn construct(&self, settings: EndpointSettings) -> Result<Self::Endpoint, RuntimeError>;
}
