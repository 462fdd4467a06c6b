//! Marker catalogs and declaration sets assembled from descriptor files.

use std::path::Path;
use std::str::FromStr;

use plait_compose::markers;
use plait_model::{DeclarationSet, MarkerCatalog, MetadataResolver};

use crate::error::{LoadError, Result};
use crate::raw::RawDescriptor;


/// Markers and declarations read from one or more descriptor sources.
///
/// The built-in markers are always present. Adding a source either applies
/// all of its markers and declarations or none of them.
#[derive(Debug, Clone)]
pub struct Manifest {
	markers: MarkerCatalog,
	declarations: DeclarationSet,
}

impl Manifest {
	/// Creates a manifest holding only the built-in markers.
	pub fn new() -> Result<Self> {
		Ok(Self {
			markers: markers::builtin_catalog()?,
			declarations: DeclarationSet::new(),
		})
	}

	/// Reads one descriptor file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let mut manifest = Self::new()?;
		manifest.add_file(path.as_ref())?;
		Ok(manifest)
	}

	/// Reads several descriptor files in order into one manifest.
	pub fn load_all<I, P>(paths: I) -> Result<Self>
	where
		I: IntoIterator<Item = P>,
		P: AsRef<Path>,
	{
		let mut manifest = Self::new()?;
		for path in paths {
			manifest.add_file(path.as_ref())?;
		}
		Ok(manifest)
	}

	pub fn add_file(&mut self, path: &Path) -> Result<()> {
		let source = std::fs::read_to_string(path).map_err(|error| LoadError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		self.add_source(&path.display().to_string(), &source)
	}

	/// Parses `source` and adds its markers and declarations.
	///
	/// `origin` names the source in errors.
	pub fn add_source(&mut self, origin: &str, source: &str) -> Result<()> {
		let raw: RawDescriptor = toml::from_str(source).map_err(|source| LoadError::Parse {
			origin: origin.to_string(),
			source,
		})?;

		let mut catalog = self.markers.clone();
		for raw_marker in raw.marker {
			if markers::is_builtin(&raw_marker.id) {
				return Err(LoadError::invalid(origin, format!("marker `{}` redefines a built-in marker", raw_marker.id)));
			}
			catalog.register(raw_marker.into_def(origin)?)?;
		}

		let mut declarations = self.declarations.clone();
		for raw_decl in raw.declaration {
			declarations.insert(raw_decl.into_declaration(origin)?)?;
		}

		tracing::debug!(
			origin,
			markers = catalog.len() - self.markers.len(),
			declarations = declarations.len() - self.declarations.len(),
			"loaded descriptor",
		);
		self.markers = catalog;
		self.declarations = declarations;
		Ok(())
	}

	pub fn markers(&self) -> &MarkerCatalog {
		&self.markers
	}

	pub fn declarations(&self) -> &DeclarationSet {
		&self.declarations
	}

	pub fn resolver(&self) -> MetadataResolver<'_> {
		MetadataResolver::new(&self.markers, &self.declarations)
	}

	pub fn into_parts(self) -> (MarkerCatalog, DeclarationSet) {
		(self.markers, self.declarations)
	}
}

impl FromStr for Manifest {
	type Err = LoadError;

	fn from_str(source: &str) -> Result<Self> {
		let mut manifest = Self::new()?;
		manifest.add_source("<inline>", source)?;
		Ok(manifest)
	}
}
