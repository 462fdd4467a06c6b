use std::path::PathBuf;

use plait_model::CatalogError;

/// Errors raised while reading descriptor files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("failed to read {}: {error}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},
	#[error("failed to parse {origin}: {source}")]
	Parse {
		origin: String,
		#[source]
		source: toml::de::Error,
	},
	#[error("{origin}: {message}")]
	Invalid { origin: String, message: String },
	#[error(transparent)]
	Catalog(#[from] CatalogError),
}

impl LoadError {
	pub(crate) fn invalid(origin: &str, message: impl Into<String>) -> Self {
		Self::Invalid {
			origin: origin.to_string(),
			message: message.into(),
		}
	}
}

/// Result type for descriptor loading.
pub type Result<T> = std::result::Result<T, LoadError>;
