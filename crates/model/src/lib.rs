//! Declarative marker model for plait.
//!
//! This crate provides the foundation the composition engine builds on:
//! - [`Registry`] / [`Contributions`]: ordered, append-only contribution container and its contributor handle
//! - [`AttributeSet`] / [`AttrValue`]: attributes carried by marker uses
//! - [`MarkerDef`] / [`MarkerUse`] / [`MarkerCatalog`]: marker types and their applications
//! - [`Declaration`] / [`DeclarationSet`]: explicit descriptors that markers attach to
//! - [`MetadataResolver`]: attribute resolution through composed markers

pub mod attr;
pub mod decl;
pub mod error;
pub mod marker;
pub mod registry;
pub mod resolver;

pub use attr::{AttrValue, AttributeSet, TypeRef};
pub use decl::{Declaration, DeclarationSet, MethodDescriptor};
pub use error::{AttrTypeError, CatalogError, ResolveError};
pub use marker::{MarkerCatalog, MarkerDef, MarkerId, MarkerUse};
pub use registry::{Contributions, Registry};
pub use resolver::{MetadataResolver, NAME_ATTRIBUTE};
