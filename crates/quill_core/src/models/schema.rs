//! Schema introspection models.
//!
//! Data structures representing the objects of the open database for the
//! navigation tree.

use serde::{Deserialize, Serialize};

/// Cached listing of the schema objects in the open database.
///
/// The snapshot holds the table and view names as the catalog reported them,
/// with engine-reserved (`sqlite_`-prefixed) names excluded. It is always
/// recomputed in full and replaced wholesale; no code path patches it
/// incrementally, so a reader never observes a partially updated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// All user table names, ordered.
    pub tables: Vec<String>,
    /// All view names, ordered.
    pub views: Vec<String>,
}

impl SchemaSnapshot {
    /// Check whether the snapshot lists no objects at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.views.is_empty()
    }

    /// Check whether a table with the given name is listed.
    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t == name)
    }

    /// Check whether a view with the given name is listed.
    pub fn contains_view(&self, name: &str) -> bool {
        self.views.iter().any(|v| v == name)
    }
}

/// A column of a table or view.
///
/// Fetched on demand when the navigation tree expands a table node; not part
/// of [`SchemaSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared type from the table definition. SQLite permits columns with
    /// no declared type, in which case this is the empty string.
    pub decl_type: String,
}
