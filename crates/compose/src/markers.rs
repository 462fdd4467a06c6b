//! Built-in marker definitions and endpoint kinds.
//!
//! Server and client declarations are recognised by their primary marker.
//! Collection contributions come from factory-method markers (`service`,
//! `provider`, `feature`) and class-level bulk markers (`services`,
//! `providers`, `features`).

use std::fmt;

use plait_model::{AttrValue, CatalogError, MarkerCatalog, MarkerDef, MarkerId, NAME_ATTRIBUTE};

pub const SERVER: &str = "server";
pub const CLIENT: &str = "client";
pub const SERVICES: &str = "services";
pub const PROVIDERS: &str = "providers";
pub const FEATURES: &str = "features";
pub const SERVICE: &str = "service";
pub const PROVIDER: &str = "provider";
pub const FEATURE: &str = "feature";

pub const ADDRESS_ATTRIBUTE: &str = "address";
pub const TRANSPORT_ATTRIBUTE: &str = "transport";
pub const SERVICE_TYPE_ATTRIBUTE: &str = "serviceType";
pub const NAMES_ATTRIBUTE: &str = "names";
pub const ANNOTATED_WITH_ATTRIBUTE: &str = "annotatedWith";

pub const DEFAULT_SERVER_NAME: &str = "server";
pub const DEFAULT_CLIENT_NAME: &str = "client";
pub const DEFAULT_ADDRESS: &str = "/";
/// Identifier of the default HTTP transport.
pub const HTTP_TRANSPORT: &str = "http";

/// The flavour of endpoint a declaration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
	Server,
	Client,
}

impl EndpointKind {
	pub const ALL: [EndpointKind; 2] = [EndpointKind::Server, EndpointKind::Client];

	/// The marker that makes a declaration an endpoint of this kind.
	pub fn primary_marker(self) -> MarkerId {
		match self {
			Self::Server => MarkerId::new(SERVER),
			Self::Client => MarkerId::new(CLIENT),
		}
	}

	pub fn default_name(self) -> &'static str {
		match self {
			Self::Server => DEFAULT_SERVER_NAME,
			Self::Client => DEFAULT_CLIENT_NAME,
		}
	}

	/// Collections a declaration of this kind may contribute to.
	pub fn collections(self) -> &'static [Collection] {
		match self {
			Self::Server => &[Collection::Services, Collection::Providers, Collection::Features],
			Self::Client => &[Collection::Providers, Collection::Features],
		}
	}
}

impl fmt::Display for EndpointKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Server => "server",
			Self::Client => "client",
		})
	}
}

/// A named-reference collection filled from declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
	Services,
	Providers,
	Features,
}

impl Collection {
	/// Marker placed on factory methods producing members of this collection.
	pub fn method_marker(self) -> MarkerId {
		MarkerId::new(match self {
			Self::Services => SERVICE,
			Self::Providers => PROVIDER,
			Self::Features => FEATURE,
		})
	}

	/// Class-level marker listing members of this collection.
	pub fn bulk_marker(self) -> MarkerId {
		MarkerId::new(match self {
			Self::Services => SERVICES,
			Self::Providers => PROVIDERS,
			Self::Features => FEATURES,
		})
	}

	/// Whether the bulk marker accepts stereotype references.
	pub fn expands_stereotypes(self) -> bool {
		matches!(self, Self::Services)
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Services => "services",
			Self::Providers => "providers",
			Self::Features => "features",
		}
	}
}

fn no_strings() -> AttrValue {
	AttrValue::strings(Vec::<String>::new())
}

fn no_types() -> AttrValue {
	AttrValue::types(Vec::<String>::new())
}

/// Definitions of every built-in marker.
pub fn builtin_markers() -> Vec<MarkerDef> {
	vec![
		MarkerDef::new(SERVER)
			.attribute(NAME_ATTRIBUTE, DEFAULT_SERVER_NAME)
			.attribute(ADDRESS_ATTRIBUTE, DEFAULT_ADDRESS)
			.attribute(TRANSPORT_ATTRIBUTE, HTTP_TRANSPORT),
		MarkerDef::new(CLIENT)
			.attribute(NAME_ATTRIBUTE, DEFAULT_CLIENT_NAME)
			.attribute(ADDRESS_ATTRIBUTE, "")
			.attribute(TRANSPORT_ATTRIBUTE, "")
			.attribute(SERVICE_TYPE_ATTRIBUTE, no_types()),
		MarkerDef::new(SERVICES)
			.attribute(NAMES_ATTRIBUTE, no_strings())
			.attribute(ANNOTATED_WITH_ATTRIBUTE, no_types()),
		MarkerDef::new(PROVIDERS).attribute(NAMES_ATTRIBUTE, no_strings()),
		MarkerDef::new(FEATURES).attribute(NAMES_ATTRIBUTE, no_strings()),
		MarkerDef::new(SERVICE).attribute(NAME_ATTRIBUTE, no_strings()),
		MarkerDef::new(PROVIDER).attribute(NAME_ATTRIBUTE, no_strings()),
		MarkerDef::new(FEATURE).attribute(NAME_ATTRIBUTE, no_strings()),
	]
}

/// Returns true if `id` names a built-in marker.
pub fn is_builtin(id: &str) -> bool {
	matches!(id, SERVER | CLIENT | SERVICES | PROVIDERS | FEATURES | SERVICE | PROVIDER | FEATURE)
}

/// Registers the built-in markers into `catalog`.
pub fn install(catalog: &mut MarkerCatalog) -> Result<(), CatalogError> {
	for def in builtin_markers() {
		catalog.register(def)?;
	}
	Ok(())
}

/// Creates a catalog holding only the built-in markers.
pub fn builtin_catalog() -> Result<MarkerCatalog, CatalogError> {
	let mut catalog = MarkerCatalog::new();
	install(&mut catalog)?;
	Ok(catalog)
}
