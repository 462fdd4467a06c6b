//! Serde shapes of a descriptor file and their conversion into the model.

use indexmap::IndexMap;
use plait_model::{AttrValue, AttributeSet, Declaration, MarkerDef, MarkerUse, MethodDescriptor, TypeRef};
use serde::Deserialize;

use crate::error::{LoadError, Result};

/// One descriptor file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDescriptor {
	#[serde(default)]
	pub marker: Vec<RawMarker>,
	#[serde(default)]
	pub declaration: Vec<RawDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawMarker {
	pub id: String,
	/// Declared attributes with their defaults.
	#[serde(default)]
	pub attributes: IndexMap<String, RawValue>,
	#[serde(default)]
	pub meta: Vec<RawUse>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawUse {
	pub marker: String,
	#[serde(default)]
	pub attributes: IndexMap<String, RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDeclaration {
	pub name: String,
	pub extends: Option<String>,
	#[serde(default)]
	pub markers: Vec<RawUse>,
	#[serde(default)]
	pub methods: Vec<RawMethod>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawMethod {
	pub name: String,
	#[serde(default)]
	pub markers: Vec<RawUse>,
}

/// `{ type = "id" }`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawType {
	#[serde(rename = "type")]
	pub ty: String,
}

/// Arrays are tried first: a derived struct also accepts a sequence.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawValue {
	Array(Vec<RawItem>),
	Type(RawType),
	Str(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawItem {
	Str(String),
	Type(RawType),
}

impl RawValue {
	fn into_value(self, origin: &str, attribute: &str) -> Result<AttrValue> {
		let items = match self {
			Self::Str(s) => return Ok(AttrValue::Str(s)),
			Self::Type(t) => return Ok(AttrValue::Type(TypeRef::new(t.ty))),
			Self::Array(items) => items,
		};

		if items.iter().all(|item| matches!(item, RawItem::Str(_))) {
			return Ok(AttrValue::StrArray(
				items
					.into_iter()
					.filter_map(|item| match item {
						RawItem::Str(s) => Some(s),
						RawItem::Type(_) => None,
					})
					.collect(),
			));
		}
		if items.iter().all(|item| matches!(item, RawItem::Type(_))) {
			return Ok(AttrValue::TypeArray(
				items
					.into_iter()
					.filter_map(|item| match item {
						RawItem::Type(t) => Some(TypeRef::new(t.ty)),
						RawItem::Str(_) => None,
					})
					.collect(),
			));
		}
		Err(LoadError::invalid(origin, format!("attribute `{attribute}` mixes strings and type references")))
	}
}

fn attributes(raw: IndexMap<String, RawValue>, origin: &str) -> Result<AttributeSet> {
	let mut set = AttributeSet::new();
	for (name, value) in raw {
		let value = value.into_value(origin, &name)?;
		set.insert(name, value);
	}
	Ok(set)
}

impl RawUse {
	fn into_use(self, origin: &str) -> Result<MarkerUse> {
		Ok(MarkerUse {
			marker: self.marker.into(),
			attrs: attributes(self.attributes, origin)?,
		})
	}
}

fn uses(raw: Vec<RawUse>, origin: &str) -> Result<Vec<MarkerUse>> {
	raw.into_iter().map(|u| u.into_use(origin)).collect()
}

impl RawMarker {
	pub fn into_def(self, origin: &str) -> Result<MarkerDef> {
		let origin = format!("{origin}: marker `{}`", self.id);
		Ok(MarkerDef {
			id: self.id.into(),
			attributes: attributes(self.attributes, &origin)?,
			meta: uses(self.meta, &origin)?,
		})
	}
}

impl RawDeclaration {
	pub fn into_declaration(self, origin: &str) -> Result<Declaration> {
		let origin = format!("{origin}: declaration `{}`", self.name);
		let methods = self
			.methods
			.into_iter()
			.map(|m| -> Result<MethodDescriptor> {
				Ok(MethodDescriptor {
					markers: uses(m.markers, &origin)?,
					name: m.name,
				})
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(Declaration {
			markers: uses(self.markers, &origin)?,
			name: self.name,
			extends: self.extends,
			methods,
		})
	}
}
