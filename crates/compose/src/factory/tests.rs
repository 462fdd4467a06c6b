use std::cell::{Cell, OnceCell};

use plait_model::{Contributions, DeclarationSet, MarkerCatalog, MarkerDef, MarkerId, MarkerUse, TypeRef};

use super::*;
use crate::component::{Bus, Component};
use crate::configurer::Configurer;
use crate::error::{ConflictError, RuntimeError};
use crate::markers;

/// Returns the merged settings as the endpoint, counting constructions.
#[derive(Default)]
struct Echo {
	calls: Cell<usize>,
	failures_left: Cell<usize>,
}

impl EndpointRuntime for Echo {
	type Endpoint = EndpointSettings;

	fn construct(&self, settings: EndpointSettings) -> Result<EndpointSettings, RuntimeError> {
		self.calls.set(self.calls.get() + 1);
		if self.failures_left.get() > 0 {
			self.failures_left.set(self.failures_left.get() - 1);
			return Err("port in use".into());
		}
		Ok(settings)
	}
}

struct Supplies {
	address: Option<&'static str>,
	transport: Option<&'static str>,
	bus: Option<&'static str>,
	service: Option<&'static str>,
}

impl Supplies {
	fn nothing() -> Self {
		Self {
			address: None,
			transport: None,
			bus: None,
			service: None,
		}
	}
}

impl Configurer for Supplies {
	fn address(&self) -> Option<String> {
		self.address.map(str::to_string)
	}

	fn transport(&self) -> Option<String> {
		self.transport.map(str::to_string)
	}

	fn bus(&self) -> Option<Bus> {
		self.bus.map(Bus::new)
	}

	fn add_services(&self, services: &mut Contributions<'_, Component>) {
		if let Some(name) = self.service {
			services.push(Component::new(name, ()));
		}
	}

	fn configure(&self, settings: &mut EndpointSettings) {
		settings.address = Some("/from-hook".to_string());
		settings.transport = Some("hook".to_string());
		settings.set_property("configured", "yes");
	}
}

fn catalog() -> MarkerCatalog {
	let mut catalog = markers::builtin_catalog().unwrap();
	catalog.register(MarkerDef::new("stereo")).unwrap();
	catalog
		.register(MarkerDef::new("rest-resource").composed_with(MarkerUse::new("stereo")))
		.unwrap();
	catalog
}

fn server_recipe() -> BuildRecipe {
	let mut recipe = BuildRecipe::new(EndpointKind::Server, "api", "Api");
	recipe.address = Some("/v1".to_string());
	recipe
}

fn names(registry: &Registry<Component>) -> Vec<&str> {
	registry.iter().map(Component::name).collect()
}

#[test]
fn endpoint_is_constructed_once() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let env = Environment::new();
	let runtime = Echo::default();
	let factory = EndpointFactory::new(server_recipe());

	assert_eq!(factory.phase(), Phase::Unbuilt);
	let first = factory.ensure_built(&env, &resolver, &runtime).unwrap();
	let second = factory.ensure_built(&env, &resolver, &runtime).unwrap();

	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(runtime.calls.get(), 1);
	assert_eq!(factory.phase(), Phase::Built);
	assert!(factory.recipe().is_none());
}

#[test]
fn local_values_win_over_configurers_and_hooks() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let mut env = Environment::new();
	env.add_configurer(
		EndpointKind::Server,
		Arc::new(Supplies {
			address: Some("/other"),
			transport: Some("jms"),
			..Supplies::nothing()
		}),
	);
	let mut recipe = server_recipe();
	recipe.transport = Some("http".to_string());

	let settings = EndpointFactory::new(recipe).ensure_built(&env, &resolver, &Echo::default()).unwrap();

	assert_eq!(settings.address.as_deref(), Some("/v1"));
	assert_eq!(settings.transport.as_deref(), Some("http"));
	assert_eq!(settings.property("configured"), Some("yes"));
}

#[test]
fn configurer_values_fill_unspecified_settings() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let mut env = Environment::new();
	env.add_configurer(
		EndpointKind::Server,
		Arc::new(Supplies {
			transport: Some("local"),
			bus: Some("main"),
			..Supplies::nothing()
		}),
	);

	let settings = EndpointFactory::new(server_recipe()).ensure_built(&env, &resolver, &Echo::default()).unwrap();

	assert_eq!(settings.transport.as_deref(), Some("local"));
	assert_eq!(settings.bus, Some(Bus::new("main")));
}

#[test]
fn unset_values_keep_what_configure_hooks_set() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let mut env = Environment::new();
	env.add_configurer(EndpointKind::Server, Arc::new(Supplies::nothing()));

	let settings = EndpointFactory::new(server_recipe()).ensure_built(&env, &resolver, &Echo::default()).unwrap();

	assert_eq!(settings.transport.as_deref(), Some("hook"));
	assert_eq!(settings.bus, None);
}

#[test]
fn services_merge_configurers_then_local_then_stereotypes() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let mut env = Environment::new();
	env.add_configurer(
		EndpointKind::Server,
		Arc::new(Supplies {
			service: Some("global"),
			..Supplies::nothing()
		}),
	);
	env.register_bean(Component::new("echo", ()), []);
	env.register_bean(Component::new("tagged", ()), [MarkerUse::new("stereo")]);
	env.register_bean(Component::new("plain", ()), []);
	env.register_bean(Component::new("meta-tagged", ()), [MarkerUse::new("rest-resource")]);

	let mut recipe = server_recipe();
	recipe.services.push("echo".to_string());
	recipe.stereotypes.push(MarkerId::new("stereo"));

	let settings = EndpointFactory::new(recipe).ensure_built(&env, &resolver, &Echo::default()).unwrap();

	assert_eq!(names(&settings.services), ["global", "echo", "tagged", "meta-tagged"]);
	assert!(settings.services.as_slice()[1].same_instance(env.bean("echo").unwrap()));
}

#[test]
fn unknown_bean_fails_the_build() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let env = Environment::new();
	let mut recipe = server_recipe();
	recipe.providers.push("json".to_string());

	let err = EndpointFactory::new(recipe).ensure_built(&env, &resolver, &Echo::default()).unwrap_err();
	assert!(matches!(&err, BuildError::UnknownBean { name, .. } if name == "json"), "{err:?}");
}

#[test]
fn conflicting_transports_fail_the_build() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let mut env = Environment::new();
	for transport in ["http", "jms"] {
		env.add_configurer(
			EndpointKind::Server,
			Arc::new(Supplies {
				transport: Some(transport),
				..Supplies::nothing()
			}),
		);
	}
	let runtime = Echo::default();

	let err = EndpointFactory::new(server_recipe()).ensure_built(&env, &resolver, &runtime).unwrap_err();

	match err {
		BuildError::Conflict { endpoint, source } => {
			assert_eq!(endpoint, "api");
			assert_eq!(source, ConflictError::TooMany { field: "transport", found: 2 });
		}
		other => panic!("unexpected error: {other:?}"),
	}
	assert_eq!(runtime.calls.get(), 0);
}

#[test]
fn client_requires_a_service_type() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let env = Environment::new();
	let mut recipe = BuildRecipe::new(EndpointKind::Client, "remote", "Remote");
	recipe.address = Some("http://localhost/api".to_string());

	let err = EndpointFactory::<EndpointSettings>::new(recipe.clone())
		.ensure_built(&env, &resolver, &Echo::default())
		.unwrap_err();
	assert!(matches!(&err, BuildError::Conflict { source, .. } if source.is_missing()), "{err:?}");

	recipe.service_type = Some(TypeRef::new("EchoApi"));
	let settings = EndpointFactory::new(recipe).ensure_built(&env, &resolver, &Echo::default()).unwrap();
	assert_eq!(settings.service_type, Some(TypeRef::new("EchoApi")));
}

#[test]
fn failed_build_can_be_retried() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let mut env = Environment::new();
	env.add_configurer(
		EndpointKind::Server,
		Arc::new(Supplies {
			service: Some("global"),
			..Supplies::nothing()
		}),
	);
	let runtime = Echo {
		failures_left: Cell::new(1),
		..Echo::default()
	};
	let factory = EndpointFactory::new(server_recipe());

	let err = factory.ensure_built(&env, &resolver, &runtime).unwrap_err();
	assert!(matches!(err, BuildError::Runtime { .. }), "{err:?}");
	assert_eq!(factory.phase(), Phase::Unbuilt);

	let settings = factory.ensure_built(&env, &resolver, &runtime).unwrap();
	assert_eq!(names(&settings.services), ["global"]);
	assert_eq!(runtime.calls.get(), 2);
}

/// Requests its own endpoint again from inside construction.
struct Recursive<'a> {
	factory: OnceCell<&'a EndpointFactory<String>>,
	env: &'a Environment,
	resolver: MetadataResolver<'a>,
	inner: Cell<Option<Phase>>,
}

impl EndpointRuntime for Recursive<'_> {
	type Endpoint = String;

	fn construct(&self, settings: EndpointSettings) -> Result<String, RuntimeError> {
		if let Some(factory) = self.factory.get() {
			self.inner.set(Some(factory.phase()));
			factory.ensure_built(self.env, &self.resolver, self)?;
		}
		Ok(settings.name)
	}
}

#[test]
fn reentrant_request_fails() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let env = Environment::new();
	let factory = EndpointFactory::new(server_recipe());
	let runtime = Recursive {
		factory: OnceCell::new(),
		env: &env,
		resolver,
		inner: Cell::new(None),
	};
	let _ = runtime.factory.set(&factory);

	let err = factory.ensure_built(&env, &resolver, &runtime).unwrap_err();

	assert_eq!(runtime.inner.get(), Some(Phase::Building));
	match err {
		BuildError::Runtime { source, .. } => {
			let inner = source.downcast_ref::<BuildError>().unwrap();
			assert!(matches!(inner, BuildError::Reentrant { endpoint } if endpoint == "api"), "{inner:?}");
		}
		other => panic!("unexpected error: {other:?}"),
	}
	assert_eq!(factory.phase(), Phase::Unbuilt);
}
