use super::*;
use crate::attr::{AttrValue, TypeRef};

fn catalog() -> MarkerCatalog {
	let mut catalog = MarkerCatalog::new();
	let defs = [
		MarkerDef::new("server")
			.attribute("name", "server")
			.attribute("address", "/")
			.attribute("transport", "http"),
		MarkerDef::new("service").attribute("name", AttrValue::strings(Vec::<String>::new())),
		MarkerDef::new("services")
			.attribute("names", AttrValue::strings(Vec::<String>::new()))
			.attribute("annotatedWith", AttrValue::types(Vec::<String>::new())),
		MarkerDef::new("typical-server")
			.attribute("address", "/")
			.composed_with(MarkerUse::new("server").with("transport", "local"))
			.composed_with(MarkerUse::new("services").with("names", AttrValue::strings(["myService"]))),
		MarkerDef::new("versioned-server")
			.attribute("name", "versioned")
			.composed_with(MarkerUse::new("typical-server").with("address", "/versioned")),
		MarkerDef::new("echo-service").composed_with(MarkerUse::new("service").with("name", AttrValue::strings(["echoBean"]))),
		MarkerDef::new("stereo"),
	];
	for def in defs {
		catalog.register(def).unwrap();
	}
	catalog
}

fn id(s: &str) -> MarkerId {
	MarkerId::new(s)
}

#[test]
fn direct_use_starts_from_declared_defaults() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let decl = Declaration::new("Api").marked(MarkerUse::new("server").with("address", "/v1"));

	let attrs = resolver.resolve_attributes(&decl, &id("server")).unwrap().unwrap();

	assert_eq!(attrs.string("address"), Ok(Some("/v1")));
	assert_eq!(attrs.string("transport"), Ok(Some("http")));
	assert_eq!(attrs.string("name"), Ok(Some("server")));
}

#[test]
fn missing_marker_resolves_to_none() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let decl = Declaration::new("Plain").marked(MarkerUse::new("stereo"));

	assert_eq!(resolver.resolve_attributes(&decl, &id("server")), Ok(None));
}

#[test]
fn composed_marker_attributes_are_inherited() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let decl = Declaration::new("Typical").marked(MarkerUse::new("typical-server").with("address", "/v4").with("name", "testServer4"));

	let attrs = resolver.resolve_attributes(&decl, &id("server")).unwrap().unwrap();

	assert_eq!(attrs.string("transport"), Ok(Some("local")));
	assert_eq!(attrs.string("address"), Ok(Some("/v4")));
	// `typical-server` does not declare `name`, so the outer value is not forwarded
	assert_eq!(attrs.string("name"), Ok(Some("server")));

	let services = resolver.resolve_attributes(&decl, &id("services")).unwrap().unwrap();
	assert_eq!(services.strings("names").unwrap(), ["myService"]);
}

#[test]
fn composed_marker_defaults_apply_when_use_is_bare() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let decl = Declaration::new("Typical").marked(MarkerUse::new("typical-server"));

	let attrs = resolver.resolve_attributes(&decl, &id("server")).unwrap().unwrap();
	assert_eq!(attrs.string("address"), Ok(Some("/")));
	assert_eq!(attrs.string("transport"), Ok(Some("local")));
}

#[test]
fn direct_attributes_override_inherited_ones() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let decl = Declaration::new("Override")
		.marked(MarkerUse::new("typical-server"))
		.marked(MarkerUse::new("server").with("transport", "jms"));

	let attrs = resolver.resolve_attributes(&decl, &id("server")).unwrap().unwrap();
	assert_eq!(attrs.string("transport"), Ok(Some("jms")));
}

#[test]
fn direct_use_merges_with_inherited_attributes_of_same_marker() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let decl = Declaration::new("Services")
		.marked(MarkerUse::new("typical-server"))
		.marked(MarkerUse::new("services").with("annotatedWith", AttrValue::types(["stereo"])));

	let attrs = resolver.resolve_attributes(&decl, &id("services")).unwrap().unwrap();
	assert_eq!(attrs.strings("names").unwrap(), ["myService"]);
	assert_eq!(attrs.type_refs("annotatedWith").unwrap(), [&TypeRef::new("stereo")]);
}

#[test]
fn composition_is_transitive() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let decl = Declaration::new("Nested").marked(MarkerUse::new("versioned-server"));

	let attrs = resolver.resolve_attributes(&decl, &id("server")).unwrap().unwrap();
	assert_eq!(attrs.string("transport"), Ok(Some("local")));
	assert_eq!(attrs.string("address"), Ok(Some("/versioned")));
	assert_eq!(attrs.string("name"), Ok(Some("versioned")));
}

#[test]
fn unknown_marker_is_unresolvable() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let decl = Declaration::new("Broken").marked(MarkerUse::new("nope"));

	let err = resolver.resolve_attributes(&decl, &id("server")).unwrap_err();
	assert_eq!(
		err,
		ResolveError::UnknownMarker {
			marker: id("nope"),
			referenced_by: "Broken".to_string(),
		}
	);
}

#[test]
fn composition_cycle_is_rejected() {
	let mut markers = catalog();
	markers.register(MarkerDef::new("a").composed_with(MarkerUse::new("b"))).unwrap();
	markers.register(MarkerDef::new("b").composed_with(MarkerUse::new("a"))).unwrap();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let decl = Declaration::new("Loop").marked(MarkerUse::new("a"));

	let err = resolver.resolve_attributes(&decl, &id("server")).unwrap_err();
	assert!(matches!(err, ResolveError::CyclicComposition { .. }), "{err:?}");
}

#[test]
fn factory_methods_include_inherited_and_meta_marked() {
	let markers = catalog();
	let mut decls = DeclarationSet::new();
	decls
		.insert(
			Declaration::new("Base")
				.method(MethodDescriptor::new("echo").marked(MarkerUse::new("service")))
				.method(MethodDescriptor::new("hidden").marked(MarkerUse::new("service")))
				.method(MethodDescriptor::new("helper")),
		)
		.unwrap();
	let child = Declaration::new("Child")
		.extends("Base")
		.method(MethodDescriptor::new("hidden"))
		.method(MethodDescriptor::new("meta").marked(MarkerUse::new("echo-service")));
	let resolver = MetadataResolver::new(&markers, &decls);

	let methods = resolver.find_marked_factory_methods(&child, &id("service")).unwrap();
	let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();

	assert_eq!(names, ["meta", "echo"]);
	assert_eq!(resolver.factory_name(methods[0], &id("service")), Ok(Some("echoBean".to_string())));
	assert_eq!(resolver.factory_name(methods[1], &id("service")), Ok(Some("echo".to_string())));
}

#[test]
fn factory_name_rules() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let service = id("service");

	let fallback = MethodDescriptor::new("echo").marked(MarkerUse::new("service"));
	let empty = MethodDescriptor::new("echo").marked(MarkerUse::new("service").with("name", AttrValue::strings(Vec::<String>::new())));
	let explicit = MethodDescriptor::new("echo").marked(MarkerUse::new("service").with("name", AttrValue::strings(["myOtherService"])));
	let several = MethodDescriptor::new("echo").marked(MarkerUse::new("service").with("name", AttrValue::strings(["first", "second"])));
	let unmarked = MethodDescriptor::new("echo");

	assert_eq!(resolver.factory_name(&fallback, &service), Ok(Some("echo".to_string())));
	assert_eq!(resolver.factory_name(&empty, &service), Ok(Some("echo".to_string())));
	assert_eq!(resolver.factory_name(&explicit, &service), Ok(Some("myOtherService".to_string())));
	assert_eq!(resolver.factory_name(&several, &service), Ok(Some("first".to_string())));
	assert_eq!(resolver.factory_name(&unmarked, &service), Ok(None));
}

#[test]
fn unknown_parent_is_unresolvable() {
	let markers = catalog();
	let decls = DeclarationSet::new();
	let resolver = MetadataResolver::new(&markers, &decls);
	let orphan = Declaration::new("Orphan").extends("Missing");

	let err = resolver.find_marked_factory_methods(&orphan, &id("service")).unwrap_err();
	assert_eq!(
		err,
		ResolveError::UnknownDeclaration {
			name: "Missing".to_string(),
			extended_by: "Orphan".to_string(),
		}
	);
}

#[test]
fn inheritance_cycle_is_rejected() {
	let markers = catalog();
	let mut decls = DeclarationSet::new();
	decls.insert(Declaration::new("A").extends("B")).unwrap();
	decls.insert(Declaration::new("B").extends("A")).unwrap();
	let resolver = MetadataResolver::new(&markers, &decls);
	let a = decls.get("A").unwrap();

	let err = resolver.hierarchy(a).unwrap_err();
	assert_eq!(err, ResolveError::CyclicInheritance { name: "A".to_string() });
}
