//! The hosting environment: named beans and container-wide configurers.

use std::sync::Arc;

use indexmap::IndexMap;
use plait_model::{MarkerId, MarkerUse, MetadataResolver, ResolveError};

use crate::component::Component;
use crate::configurer::{Configurer, ConfigurerComposite};
use crate::markers::EndpointKind;

/// A named component together with the stereotype markers it carries.
#[derive(Debug, Clone)]
pub struct Bean {
	pub component: Component,
	pub markers: Vec<MarkerUse>,
}

/// Beans and configurers visible to every endpoint build.
///
/// Beans keep insertion order, which makes stereotype scans stable. The
/// environment is read-only while endpoints are being built.
#[derive(Default)]
pub struct Environment {
	beans: IndexMap<String, Bean>,
	server_configurers: ConfigurerComposite,
	client_configurers: ConfigurerComposite,
}

impl Environment {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a bean under the component's name.
	///
	/// Re-registering a name replaces the bean but keeps its original position.
	pub fn register_bean(&mut self, component: Component, markers: impl IntoIterator<Item = MarkerUse>) -> Option<Bean> {
		let name = component.name().to_string();
		let bean = Bean {
			component,
			markers: markers.into_iter().collect(),
		};
		let previous = self.beans.insert(name, bean);
		if let Some(previous) = &previous {
			tracing::debug!(bean = previous.component.name(), "replaced bean");
		}
		previous
	}

	/// Registers a container-wide configurer for one endpoint kind.
	pub fn add_configurer(&mut self, kind: EndpointKind, configurer: Arc<dyn Configurer>) {
		match kind {
			EndpointKind::Server => self.server_configurers.push(configurer),
			EndpointKind::Client => self.client_configurers.push(configurer),
		}
	}

	pub fn configurers(&self, kind: EndpointKind) -> &ConfigurerComposite {
		match kind {
			EndpointKind::Server => &self.server_configurers,
			EndpointKind::Client => &self.client_configurers,
		}
	}

	pub fn bean(&self, name: &str) -> Option<&Component> {
		self.beans.get(name).map(|bean| &bean.component)
	}

	pub fn beans(&self) -> impl Iterator<Item = &Bean> {
		self.beans.values()
	}

	pub fn len(&self) -> usize {
		self.beans.len()
	}

	pub fn is_empty(&self) -> bool {
		self.beans.is_empty()
	}

	/// Returns every bean carrying `marker`, directly or through composition,
	/// in registration order.
	pub fn beans_carrying(&self, resolver: &MetadataResolver<'_>, marker: &MarkerId) -> Result<Vec<&Component>, ResolveError> {
		let mut found = Vec::new();
		for (name, bean) in &self.beans {
			if resolver.carries(&bean.markers, marker, name)? {
				found.push(&bean.component);
			}
		}
		Ok(found)
	}
}
