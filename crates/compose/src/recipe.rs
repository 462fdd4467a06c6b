use std::fmt;

use plait_model::{MarkerId, Registry, TypeRef};

use crate::markers::{Collection, EndpointKind};

/// Locally declared build description for one endpoint.
///
/// Single values are `None` when the declaration leaves them unspecified.
/// Collections hold bean names resolved against the environment at build
/// time; `stereotypes` lists marker types whose carriers are added to the
/// services at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecipe {
	pub kind: EndpointKind,
	pub name: String,
	/// Name of the declaration the recipe was registered from.
	pub declaration: String,
	pub address: Option<String>,
	pub transport: Option<String>,
	pub service_type: Option<TypeRef>,
	pub services: Registry<String>,
	pub providers: Registry<String>,
	pub features: Registry<String>,
	pub stereotypes: Vec<MarkerId>,
}

impl BuildRecipe {
	pub fn new(kind: EndpointKind, name: impl Into<String>, declaration: impl Into<String>) -> Self {
		Self {
			kind,
			name: name.into(),
			declaration: declaration.into(),
			address: None,
			transport: None,
			service_type: None,
			services: Registry::new("services"),
			providers: Registry::new("providers"),
			features: Registry::new("features"),
			stereotypes: Vec::new(),
		}
	}

	pub fn collection(&self, collection: Collection) -> &Registry<String> {
		match collection {
			Collection::Services => &self.services,
			Collection::Providers => &self.providers,
			Collection::Features => &self.features,
		}
	}

	pub fn collection_mut(&mut self, collection: Collection) -> &mut Registry<String> {
		match collection {
			Collection::Services => &mut self.services,
			Collection::Providers => &mut self.providers,
			Collection::Features => &mut self.features,
		}
	}
}

impl fmt::Display for BuildRecipe {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fn opt(value: Option<&str>) -> &str {
			value.unwrap_or("-")
		}

		writeln!(f, "{} `{}` (from {})", self.kind, self.name, self.declaration)?;
		writeln!(f, "  address:   {}", opt(self.address.as_deref()))?;
		writeln!(f, "  transport: {}", opt(self.transport.as_deref()))?;
		if self.kind == EndpointKind::Client {
			writeln!(f, "  service:   {}", opt(self.service_type.as_ref().map(TypeRef::as_str)))?;
		}
		for collection in self.kind.collections() {
			let names: Vec<&str> = self.collection(*collection).iter().map(String::as_str).collect();
			writeln!(f, "  {:<10} [{}]", format!("{}:", collection.label()), names.join(", "))?;
		}
		if !self.stereotypes.is_empty() {
			let ids: Vec<&str> = self.stereotypes.iter().map(MarkerId::as_str).collect();
			writeln!(f, "  stereotypes: [{}]", ids.join(", "))?;
		}
		Ok(())
	}
}
