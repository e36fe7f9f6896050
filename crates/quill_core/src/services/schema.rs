//! Schema introspection service.
//!
//! Queries the `sqlite_master` catalog to list the tables and views of the
//! open database, and `PRAGMA table_info` for per-table column metadata.

use rusqlite::Connection;

use crate::error::QuillError;
use crate::models::schema::{ColumnInfo, SchemaSnapshot};

/// Schema introspection service.
///
/// Stateless; operates on the connection the session hands it.
pub struct SchemaService;

impl SchemaService {
    /// Load a complete snapshot of the schema objects in the database.
    ///
    /// Both listings are read before either is returned, so a caller can
    /// swap the whole snapshot in one assignment.
    pub fn load_snapshot(conn: &Connection) -> Result<SchemaSnapshot, QuillError> {
        let tables = Self::load_tables(conn)?;
        let views = Self::load_views(conn)?;
        Ok(SchemaSnapshot { tables, views })
    }

    /// Load all user table names, excluding the engine's reserved
    /// `sqlite_`-prefixed catalog objects.
    pub fn load_tables(conn: &Connection) -> Result<Vec<String>, QuillError> {
        Self::load_names(
            conn,
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
    }

    /// Load all view names.
    pub fn load_views(conn: &Connection) -> Result<Vec<String>, QuillError> {
        Self::load_names(
            conn,
            "SELECT name FROM sqlite_master
             WHERE type = 'view' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
    }

    /// Load column metadata for a table or view.
    ///
    /// An unknown name yields an empty listing; `PRAGMA table_info` reports
    /// no rows rather than an error for names it does not know.
    pub fn load_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>, QuillError> {
        let mut columns = Vec::new();
        conn.pragma(None, "table_info", table, |row| {
            columns.push(ColumnInfo { name: row.get(1)?, decl_type: row.get(2)? });
            Ok(())
        })?;
        Ok(columns)
    }

    fn load_names(conn: &Connection, sql: &str) -> Result<Vec<String>, QuillError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(QuillError::from)
    }
}
