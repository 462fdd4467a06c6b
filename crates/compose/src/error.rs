use plait_model::ResolveError;

use crate::markers::EndpointKind;

/// Boxed failure reported by the endpoint-construction collaborator.
pub type RuntimeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single-valued property violated its cardinality policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
	/// More than one distinct value was supplied.
	#[error("found {found} distinct values configured for `{field}`, only one allowed")]
	TooMany { field: &'static str, found: usize },
	/// No value was supplied for a property requiring exactly one.
	#[error("found 0 values configured for `{field}`, exactly one required")]
	Missing { field: &'static str },
}

impl ConflictError {
	pub fn field(&self) -> &'static str {
		match self {
			Self::TooMany { field, .. } | Self::Missing { field } => field,
		}
	}

	/// Number of distinct values found.
	pub fn found(&self) -> usize {
		match self {
			Self::TooMany { found, .. } => *found,
			Self::Missing { .. } => 0,
		}
	}

	pub fn is_missing(&self) -> bool {
		matches!(self, Self::Missing { .. })
	}
}

/// Declaration registration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrarError {
	#[error("declaration `{declaration}` is already registered")]
	AlreadyRegistered { declaration: String },
	#[error("endpoint name `{name}` is declared more than once")]
	DuplicateEndpoint { name: String },
	#[error(transparent)]
	Resolve(#[from] ResolveError),
}

/// Failure while building one endpoint. Never fatal for other endpoints.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
	#[error("endpoint `{endpoint}`: {source}")]
	Conflict {
		endpoint: String,
		#[source]
		source: ConflictError,
	},
	#[error("endpoint `{endpoint}`: {source}")]
	Unresolvable {
		endpoint: String,
		#[source]
		source: ResolveError,
	},
	#[error("endpoint `{endpoint}` references unknown bean `{name}`")]
	UnknownBean { endpoint: String, name: String },
	#[error("endpoint `{endpoint}` was requested while it is being built")]
	Reentrant { endpoint: String },
	#[error("{kind} `{endpoint}` could not be constructed")]
	Runtime {
		kind: EndpointKind,
		endpoint: String,
		#[source]
		source: RuntimeError,
	},
	#[error("declaration `{declaration}` was not registered")]
	Registration {
		declaration: String,
		#[source]
		source: RegistrarError,
	},
	#[error("no endpoint named `{name}`")]
	UnknownEndpoint { name: String },
}

impl BuildError {
	pub(crate) fn conflict(endpoint: &str) -> impl FnOnce(ConflictError) -> Self + '_ {
		move |source| Self::Conflict {
			endpoint: endpoint.to_string(),
			source,
		}
	}

	pub(crate) fn unresolvable(endpoint: &str) -> impl FnOnce(ResolveError) -> Self + '_ {
		move |source| Self::Unresolvable {
			endpoint: endpoint.to_string(),
			source,
		}
	}

	pub fn endpoint(&self) -> &str {
		match self {
			Self::Conflict { endpoint, .. }
			| Self::Unresolvable { endpoint, .. }
			| Self::UnknownBean { endpoint, .. }
			| Self::Reentrant { endpoint }
			| Self::Runtime { endpoint, .. } => endpoint,
			Self::Registration { declaration, .. } => declaration,
			Self::UnknownEndpoint { name } => name,
		}
	}
}
