//! Configuration composition for plait endpoints.
//!
//! A declaration carrying the `server` or `client` marker is registered into a
//! [`BuildRecipe`]. At build time an [`EndpointFactory`] merges the recipe with
//! the container-wide [`Configurer`]s of the [`Environment`] and hands the
//! resulting [`EndpointSettings`] to an [`EndpointRuntime`] exactly once.

pub mod assembly;
pub mod component;
pub mod configurer;
pub mod environment;
pub mod error;
pub mod factory;
pub mod markers;
pub mod recipe;
pub mod registrar;
pub mod settings;

pub use assembly::{Assembly, Registrations, register_all};
pub use component::{Bus, Component};
pub use configurer::{Configurer, ConfigurerComposite, at_most_one, exactly_one};
pub use environment::{Bean, Environment};
pub use error::{BuildError, ConflictError, RegistrarError, RuntimeError};
pub use factory::{EndpointFactory, Phase, compose_settings};
pub use markers::{Collection, EndpointKind};
pub use recipe::BuildRecipe;
pub use registrar::Registrar;
pub use settings::{EndpointRuntime, EndpointSettings};
