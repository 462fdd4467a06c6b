//! Type-erased contributions and the bus handle.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A named, type-erased value contributed to an endpoint: a service instance,
/// provider, feature, or interceptor.
///
/// Clones share the underlying instance.
#[derive(Clone)]
pub struct Component {
	name: Arc<str>,
	type_name: &'static str,
	value: Arc<dyn Any + Send + Sync>,
}

impl Component {
	pub fn new<T: Any + Send + Sync>(name: impl Into<Arc<str>>, value: T) -> Self {
		Self::shared(name, Arc::new(value))
	}

	/// Wraps an already shared value.
	pub fn shared<T: Any + Send + Sync>(name: impl Into<Arc<str>>, value: Arc<T>) -> Self {
		Self {
			name: name.into(),
			type_name: std::any::type_name::<T>(),
			value,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Name of the concrete type, for diagnostics.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.value.downcast_ref()
	}

	pub fn is<T: Any>(&self) -> bool {
		self.value.is::<T>()
	}

	/// Returns true if both handles point at the same instance.
	pub fn same_instance(&self, other: &Component) -> bool {
		Arc::ptr_eq(&self.value, &other.value)
	}
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component")
			.field("name", &self.name)
			.field("type", &self.type_name)
			.finish()
	}
}

/// Handle to the message bus an endpoint attaches to.
///
/// Compared by id, so two configurers naming the same bus agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bus {
	id: String,
}

impl Bus {
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into() }
	}

	pub fn id(&self) -> &str {
		&self.id
	}
}

impl fmt::Display for Bus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.id)
	}
}
