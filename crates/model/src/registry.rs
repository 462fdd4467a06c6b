//! Ordered, append-only contribution registries.


/// Ordered container of contributed values.
///
/// Insertion order is application order. Duplicates are kept and nothing can
/// be removed once pushed, so a registry only ever grows during the build that
/// owns it. The label names the collection in diagnostics
/// (`"providers"`, `"out_interceptors"`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry<T> {
	label: &'static str,
	items: Vec<T>,
}

impl<T> Registry<T> {
	/// Creates an empty registry with the given label for diagnostics.
	pub fn new(label: &'static str) -> Self {
		Self { label, items: Vec::new() }
	}

	/// Returns the diagnostic label.
	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Returns the number of contributions pushed so far.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if nothing has been contributed yet.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Appends a single contribution.
	pub fn push(&mut self, item: T) {
		self.items.push(item);
	}

	/// Iterates contributions in insertion order.
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.items.iter()
	}

	/// Returns the contributions as a slice.
	pub fn as_slice(&self) -> &[T] {
		&self.items
	}

	/// Consumes the registry, handing off its contributions.
	pub fn into_vec(self) -> Vec<T> {
		self.items
	}

	/// Opens an append-only handle for one contributor.
	pub fn contributions(&mut self) -> Contributions<'_, T> {
		Contributions { registry: self, added: 0 }
	}
}

/// Append-only view of a [`Registry`] handed to a contributor.
///
/// Earlier contributions are neither visible nor reachable through the handle.
#[derive(Debug)]
pub struct Contributions<'a, T> {
	registry: &'a mut Registry<T>,
	added: usize,
}

impl<T> Contributions<'_, T> {
	pub fn label(&self) -> &'static str {
		self.registry.label
	}

	pub fn push(&mut self, item: T) {
		self.registry.items.push(item);
		self.added += 1;
	}

	/// Number of items pushed through this handle.
	pub fn added(&self) -> usize {
		self.added
	}
}

impl<T> Extend<T> for Contributions<'_, T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for item in iter {
			self.push(item);
		}
	}
}

impl<T> Extend<T> for Registry<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.items.extend(iter);
	}
}

impl<T> IntoIterator for Registry<T> {
	type Item = T;
	type IntoIter = std::vec::IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

impl<'a, T> IntoIterator for &'a Registry<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}
