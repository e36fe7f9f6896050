//! The database session.
//!
//! `Session` is the single point of contact with the driver and the
//! exclusive owner of the connection handle. At most one connection is live
//! at any time: opening a new database closes the previous one first, and
//! `&mut self` on every mutating operation is what makes that exclusion
//! structural rather than locked.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::error::QuillError;
use crate::models::{ColumnInfo, HistoryEntry, QueryOutcome, SchemaSnapshot, StatementClass};
use crate::services::schema::SchemaService;

/// Failure text for statements submitted with no open database.
const NO_CONNECTION: &str = "There is no active connection to the database";

/// Failure text for empty or whitespace-only submissions.
const EMPTY_QUERY: &str = "Empty query text submitted";

/// Oldest entries are discarded past this many.
const MAX_HISTORY_ENTRIES: usize = 256;

/// A session over at most one open SQLite database.
///
/// The cached [`SchemaSnapshot`] is populated exactly while a connection is
/// live, and is recomputed in full after any statement that lexically alters
/// the schema.
pub struct Session {
    connection: Option<Connection>,
    current_path: Option<PathBuf>,
    schema: SchemaSnapshot,
    history: Vec<HistoryEntry>,
}

impl Session {
    /// Create an empty session with no open database.
    pub fn new() -> Self {
        Self {
            connection: None,
            current_path: None,
            schema: SchemaSnapshot::default(),
            history: Vec::new(),
        }
    }

    /// Create a new database file at `path`, then open it.
    ///
    /// Opening a connection creates the file when it does not exist and
    /// preserves it when it does, so creating over an existing database is
    /// equivalent to opening it. Any open connection is closed first.
    pub fn create(&mut self, path: impl AsRef<Path>) -> Result<(), QuillError> {
        let path = path.as_ref();
        let bootstrap = Connection::open(path).map_err(|e| QuillError::Io {
            message: format!("Failed to create database file '{}': {e}", path.display()),
            source: Some(Box::new(e)),
        })?;
        drop(bootstrap);
        tracing::info!(path = %path.display(), "Database file created");
        self.open(path)
    }

    /// Open the database at `path`, replacing any open connection.
    ///
    /// The snapshot is recomputed as part of opening; a file the engine
    /// cannot read as a database fails here rather than on the first query.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), QuillError> {
        let path = path.as_ref();
        self.close();

        let connection = Connection::open(path).map_err(|e| {
            QuillError::connection_with_source(
                format!("Failed to open database '{}'", path.display()),
                e,
            )
        })?;
        self.connection = Some(connection);
        self.current_path = Some(path.to_path_buf());

        if let Err(e) = self.refresh_schema() {
            self.close();
            return Err(QuillError::connection(format!(
                "Failed to open database '{}': {e}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Database opened");
        Ok(())
    }

    /// Close the open database, if any. Idempotent.
    pub fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            drop(connection);
            self.schema = SchemaSnapshot::default();
            if let Some(path) = self.current_path.take() {
                tracing::info!(path = %path.display(), "Database closed");
            }
        }
    }

    /// Execute one SQL statement and report its outcome.
    ///
    /// Statements are classified lexically: a trimmed text starting with
    /// `SELECT`, `PRAGMA`, or `SHOW` (case-insensitive) is run as a query
    /// and returns `Rows`; everything else is run as a command and returns
    /// an affected-row `Message`. Commands whose text contains
    /// `CREATE TABLE`, `DROP TABLE`, or `ALTER TABLE` trigger a snapshot
    /// recompute before returning. Driver errors become `Failure` and leave
    /// the connection open and usable.
    pub fn execute(&mut self, sql: &str) -> QueryOutcome {
        let outcome = self.execute_inner(sql);
        self.record(sql, &outcome);
        outcome
    }

    fn execute_inner(&mut self, sql: &str) -> QueryOutcome {
        let trimmed = sql.trim();

        let result = match &self.connection {
            None => {
                tracing::debug!("Statement rejected: no open database");
                return QueryOutcome::Failure(NO_CONNECTION.to_string());
            }
            Some(_) if trimmed.is_empty() => {
                return QueryOutcome::Failure(EMPTY_QUERY.to_string());
            }
            Some(conn) => match StatementClass::classify(trimmed) {
                StatementClass::Read => {
                    tracing::debug!(sql = trimmed, "Running query");
                    Self::run_query(conn, trimmed).map(|outcome| (outcome, false))
                }
                StatementClass::Command => {
                    tracing::debug!(sql = trimmed, "Running command");
                    conn.execute(trimmed, [])
                        .map_err(QuillError::from)
                        .map(|n| (QueryOutcome::message(n), StatementClass::touches_schema(trimmed)))
                }
            },
        };

        match result {
            Ok((outcome, refresh)) => {
                if refresh {
                    // Non-fatal: the statement itself succeeded. The previous
                    // snapshot stays in place, never a partial one.
                    if let Err(e) = self.refresh_schema() {
                        tracing::warn!(error = %e, "Schema refresh failed after schema change");
                    }
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(error = %e, "Statement failed");
                QueryOutcome::Failure(e.to_string())
            }
        }
    }

    /// Recompute the schema snapshot from the catalog.
    ///
    /// With no open database this resets the snapshot to empty and
    /// succeeds. On a catalog error the snapshot is left untouched.
    pub fn refresh_schema(&mut self) -> Result<(), QuillError> {
        let Some(conn) = self.connection.as_ref() else {
            self.schema = SchemaSnapshot::default();
            return Ok(());
        };
        let snapshot = SchemaService::load_snapshot(conn)?;
        self.schema = snapshot;
        tracing::debug!(
            tables = self.schema.tables.len(),
            views = self.schema.views.len(),
            "Schema snapshot refreshed"
        );
        Ok(())
    }

    /// Fetch column metadata for `table`.
    ///
    /// Returns an empty listing when no database is open or the driver
    /// reports an error; metadata failures are logged, not propagated.
    pub fn list_columns(&self, table: &str) -> Vec<ColumnInfo> {
        let Some(conn) = self.connection.as_ref() else {
            return Vec::new();
        };
        match SchemaService::load_columns(conn, table) {
            Ok(columns) => columns,
            Err(e) => {
                tracing::warn!(table, error = %e, "Failed to read column metadata");
                Vec::new()
            }
        }
    }

    /// The cached schema snapshot.
    pub fn schema(&self) -> &SchemaSnapshot {
        &self.schema
    }

    /// Path of the open database, if any.
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Check whether a connection is live.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Submitted statements, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Submitted statements, most recent first.
    pub fn recent_history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().rev()
    }

    fn record(&mut self, sql: &str, outcome: &QueryOutcome) {
        if self.history.len() == MAX_HISTORY_ENTRIES {
            self.history.remove(0);
        }
        self.history.push(HistoryEntry::from_outcome(sql, outcome));
    }

    fn run_query(conn: &Connection, sql: &str) -> Result<QueryOutcome, QuillError> {
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = stmt.column_count();

        let mut out = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                cells.push(display_value(row.get_ref(idx)?));
            }
            out.push(cells);
        }

        Ok(QueryOutcome::Rows { columns, rows: out })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert one result cell to its display text. NULL renders as the empty
/// string; blobs as lossy UTF-8.
fn display_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_session(dir: &tempfile::TempDir, name: &str) -> Session {
        let mut session = Session::new();
        session.create(dir.path().join(name)).unwrap();
        session
    }

    #[test]
    fn create_yields_live_session_with_empty_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh.db");
        let mut session = Session::new();
        session.create(&path).unwrap();

        assert!(session.is_connected());
        assert_eq!(session.current_path(), Some(path.as_path()));
        assert!(session.schema().tables.is_empty());
        assert!(session.schema().views.is_empty());

        // Reopening the same file preserves it.
        session.execute("CREATE TABLE t (id INTEGER)");
        session.close();
        session.open(&path).unwrap();
        assert!(session.schema().contains_table("t"));
    }

    #[test]
    fn create_over_existing_database_does_not_truncate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keep.db");
        let mut session = Session::new();
        session.create(&path).unwrap();
        session.execute("CREATE TABLE kept (id INTEGER)");
        session.close();

        session.create(&path).unwrap();
        assert!(session.schema().contains_table("kept"));
    }

    #[test]
    fn open_rejects_non_database_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not_a_db.txt");
        std::fs::write(&path, "plain text, definitely not a database").unwrap();

        let mut session = Session::new();
        let err = session.open(&path).unwrap_err();
        assert_eq!(err.category(), "Connection");
        assert!(!session.is_connected());
        assert!(session.current_path().is_none());
        assert!(session.schema().is_empty());
    }

    #[test]
    fn create_table_updates_snapshot_and_drop_removes_it() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "schema.db");

        let outcome = session.execute("CREATE TABLE tracks (id INTEGER, title TEXT)");
        assert!(!outcome.is_failure());
        assert!(session.schema().contains_table("tracks"));

        session.execute("DROP TABLE tracks");
        assert!(!session.schema().contains_table("tracks"));
    }

    #[test]
    fn create_view_is_invisible_until_explicit_refresh() {
        // CREATE VIEW is not in the schema-mutating keyword set, so the
        // snapshot lags until refresh_schema is called.
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "views.db");
        session.execute("CREATE TABLE t (a INTEGER)");

        let outcome = session.execute("CREATE VIEW v AS SELECT a FROM t");
        assert!(!outcome.is_failure());
        assert!(!session.schema().contains_view("v"));

        session.refresh_schema().unwrap();
        assert!(session.schema().contains_view("v"));
    }

    #[test]
    fn select_returns_columns_and_stringified_rows() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "rows.db");
        session.execute("CREATE TABLE t (c1 INTEGER, c2 TEXT)");
        session.execute("INSERT INTO t VALUES (1, 'one')");
        session.execute("INSERT INTO t VALUES (2, NULL)");

        match session.execute("SELECT * FROM t ORDER BY c1") {
            QueryOutcome::Rows { columns, rows } => {
                assert_eq!(columns, vec!["c1", "c2"]);
                assert_eq!(rows, vec![vec!["1", "one"], vec!["2", ""]]);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn select_on_empty_table_returns_headers_and_no_rows() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "empty.db");
        session.execute("CREATE TABLE t (c1 INTEGER, c2 TEXT)");

        match session.execute("SELECT * FROM t") {
            QueryOutcome::Rows { columns, rows } => {
                assert_eq!(columns, vec!["c1", "c2"]);
                assert!(rows.is_empty());
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn insert_reports_one_affected_row_and_leaves_schema_alone() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "insert.db");
        session.execute("CREATE TABLE t (id INTEGER)");
        let before = session.schema().clone();

        match session.execute("INSERT INTO t VALUES (42)") {
            QueryOutcome::Message(text) => assert!(text.contains("1"), "message was: {text}"),
            other => panic!("expected message, got {other:?}"),
        }
        assert_eq!(session.schema(), &before);
    }

    #[test]
    fn pragma_runs_on_the_query_path() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "pragma.db");
        session.execute("CREATE TABLE t (id INTEGER, name TEXT)");

        match session.execute("PRAGMA table_info(t)") {
            QueryOutcome::Rows { columns, rows } => {
                assert!(columns.contains(&"name".to_string()));
                assert_eq!(rows.len(), 2);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn execute_without_connection_fails_with_precondition_text() {
        let mut session = Session::new();
        match session.execute("SELECT 1") {
            QueryOutcome::Failure(text) => assert!(text.contains("no active connection")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn empty_statement_is_rejected_before_the_driver() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "blank.db");
        match session.execute("   \n\t") {
            QueryOutcome::Failure(text) => assert!(text.contains("Empty query")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn driver_error_is_recovered_and_connection_stays_usable() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "recover.db");

        match session.execute("SELECT * FROM nonexistent_table") {
            QueryOutcome::Failure(text) => assert!(text.contains("no such table")),
            other => panic!("expected failure, got {other:?}"),
        }

        assert!(session.is_connected());
        let outcome = session.execute("SELECT 1 AS one");
        assert_eq!(outcome.row_count(), Some(1));
    }

    #[test]
    fn close_twice_is_a_noop() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "close.db");
        session.close();
        assert!(!session.is_connected());
        assert!(session.schema().is_empty());
        session.close();
        assert!(!session.is_connected());
    }

    #[test]
    fn open_replaces_the_previous_connection() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.db");
        let second = dir.path().join("second.db");

        let mut session = Session::new();
        session.create(&first).unwrap();
        session.execute("CREATE TABLE only_in_first (id INTEGER)");

        session.create(&second).unwrap();
        assert_eq!(session.current_path(), Some(second.as_path()));
        assert!(!session.schema().contains_table("only_in_first"));
    }

    #[test]
    fn list_columns_reports_pairs_and_swallows_errors() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "cols.db");
        session.execute("CREATE TABLE t (id INTEGER, label TEXT)");

        let columns = session.list_columns("t");
        let pairs: Vec<(&str, &str)> =
            columns.iter().map(|c| (c.name.as_str(), c.decl_type.as_str())).collect();
        assert_eq!(pairs, vec![("id", "INTEGER"), ("label", "TEXT")]);

        assert!(session.list_columns("missing").is_empty());
        session.close();
        assert!(session.list_columns("t").is_empty());
    }

    #[test]
    fn history_records_outcomes_most_recent_first() {
        let dir = tempdir().unwrap();
        let mut session = open_session(&dir, "history.db");
        session.execute("CREATE TABLE t (id INTEGER)");
        session.execute("SELECT * FROM missing");

        let recent: Vec<&HistoryEntry> = session.recent_history().collect();
        assert_eq!(recent.len(), 2);
        assert!(!recent[0].is_success());
        assert!(recent[1].is_success());
        assert!(recent[1].sql.contains("CREATE TABLE"));
    }
}
