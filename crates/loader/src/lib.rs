//! TOML descriptor files for plait.
//!
//! A descriptor holds `[[marker]]` tables defining composed and stereotype
//! markers, and `[[declaration]]` tables describing the declarations those
//! markers attach to:
//!
//! ```toml
//! [[marker]]
//! id = "typical-server"
//! attributes = { address = "/" }
//!
//! [[marker.meta]]
//! marker = "server"
//! attributes = { transport = "local" }
//!
//! [[declaration]]
//! name = "Orders"
//! markers = [{ marker = "typical-server", attributes = { address = "/orders" } }]
//!
//! [[declaration.methods]]
//! name = "orders"
//! markers = [{ marker = "service" }]
//! ```
//!
//! Attribute values are strings, arrays of strings, type references written
//! as `{ type = "id" }`, or arrays of type references.

mod error;
mod manifest;
mod raw;

pub use error::{LoadError, Result};
pub use manifest::Manifest;
