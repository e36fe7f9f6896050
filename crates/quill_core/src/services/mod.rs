//! Backend services for the Quill SQLite browser.
//!
//! This module contains the service layer:
//! - `session` - The database session owning the single live connection
//! - `schema` - Catalog introspection for the navigation tree

pub mod schema;
pub mod session;

pub use schema::SchemaService;
pub use session::Session;
