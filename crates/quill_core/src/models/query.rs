//! Query execution models.

use serde::{Deserialize, Serialize};

/// Lexical shape of a SQL statement.
///
/// Classification is a prefix test on the trimmed, uppercased statement
/// text, not a SQL parse. Leading comments, unusual whitespace, or
/// multi-statement input can misclassify a statement; the heuristic is a
/// known limitation and is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementClass {
    /// Statement that returns rows (SELECT, PRAGMA, and introspection
    /// statements).
    Read,
    /// Everything else; executed for its side effect and reported as an
    /// affected-row count.
    Command,
}

/// Keywords whose presence marks a statement as altering the schema.
///
/// Matched as substrings of the uppercased statement text, so e.g.
/// `CREATE INDEX` does not trigger a refresh but a `DROP TABLE` buried in a
/// longer script does.
const SCHEMA_KEYWORDS: [&str; 3] = ["CREATE TABLE", "DROP TABLE", "ALTER TABLE"];

/// Statement prefixes classified as row-returning.
const READ_PREFIXES: [&str; 3] = ["SELECT", "PRAGMA", "SHOW"];

impl StatementClass {
    /// Classify a statement by its leading keyword.
    pub fn classify(sql: &str) -> Self {
        let upper = sql.trim().to_uppercase();
        if READ_PREFIXES.iter().any(|p| upper.starts_with(p)) {
            Self::Read
        } else {
            Self::Command
        }
    }

    /// Check whether a statement lexically alters the schema and so requires
    /// the snapshot to be recomputed.
    pub fn touches_schema(sql: &str) -> bool {
        let upper = sql.trim().to_uppercase();
        SCHEMA_KEYWORDS.iter().any(|kw| upper.contains(kw))
    }
}

/// Outcome of executing exactly one SQL statement.
///
/// Every driver-level failure is folded into `Failure`; callers never see an
/// `Err` from execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryOutcome {
    /// A row-returning statement: column names from the result metadata
    /// (empty if the driver reports none) and every cell stringified.
    Rows {
        /// Column names, in result order.
        columns: Vec<String>,
        /// Result rows; each cell already converted to display text.
        rows: Vec<Vec<String>>,
    },
    /// A side-effecting statement that completed, with a human-readable
    /// summary of the affected-row count.
    Message(String),
    /// A failed statement, carrying the engine's error text.
    Failure(String),
}

impl QueryOutcome {
    /// Build the standard affected-rows message.
    pub fn message(rows_affected: usize) -> Self {
        Self::Message(format!("Command executed successfully. Rows affected: {rows_affected}"))
    }

    /// Number of result rows, if this outcome carries rows.
    pub fn row_count(&self) -> Option<usize> {
        match self {
            Self::Rows { rows, .. } => Some(rows.len()),
            _ => None,
        }
    }

    /// Check if this outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_read_prefixes() {
        assert_eq!(StatementClass::classify("SELECT * FROM t"), StatementClass::Read);
        assert_eq!(StatementClass::classify("  select 1"), StatementClass::Read);
        assert_eq!(StatementClass::classify("PRAGMA table_info(t)"), StatementClass::Read);
        assert_eq!(StatementClass::classify("pragma foreign_keys = 1"), StatementClass::Read);
        assert_eq!(StatementClass::classify("SHOW TABLES"), StatementClass::Read);
    }

    #[test]
    fn classify_commands() {
        assert_eq!(StatementClass::classify("INSERT INTO t VALUES (1)"), StatementClass::Command);
        assert_eq!(StatementClass::classify("UPDATE t SET a = 1"), StatementClass::Command);
        assert_eq!(StatementClass::classify("CREATE TABLE t (id INTEGER)"), StatementClass::Command);
        // WITH ... SELECT is row-returning but falls on the command side of
        // the prefix test; the heuristic is lexical only.
        assert_eq!(StatementClass::classify("WITH c AS (SELECT 1) SELECT * FROM c"), StatementClass::Command);
    }

    #[test]
    fn schema_keywords_match_as_substrings() {
        assert!(StatementClass::touches_schema("CREATE TABLE t (id INTEGER)"));
        assert!(StatementClass::touches_schema("drop table if exists t"));
        assert!(StatementClass::touches_schema("ALTER TABLE t ADD COLUMN b TEXT"));
        assert!(!StatementClass::touches_schema("CREATE INDEX i ON t(a)"));
        assert!(!StatementClass::touches_schema("INSERT INTO t VALUES (1)"));
        assert!(!StatementClass::touches_schema("CREATE VIEW v AS SELECT 1"));
    }

    #[test]
    fn message_reports_affected_rows() {
        let outcome = QueryOutcome::message(3);
        match &outcome {
            QueryOutcome::Message(text) => assert!(text.contains("3")),
            other => panic!("expected message, got {other:?}"),
        }
        assert!(!outcome.is_failure());
        assert_eq!(outcome.row_count(), None);
    }
}
