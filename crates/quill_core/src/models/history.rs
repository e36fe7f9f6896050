//! Query history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::QueryOutcome;

/// Record of a previously submitted statement.
///
/// History lives in memory for the lifetime of the process; the user's
/// database file is the only thing Quill ever writes to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The submitted SQL.
    pub sql: String,
    /// Rows returned or affected (None for failures).
    pub row_count: Option<usize>,
    /// Error message if the statement failed.
    pub error_message: Option<String>,
    /// Submission timestamp.
    pub executed_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create a history entry from a statement's outcome.
    pub fn from_outcome(sql: impl Into<String>, outcome: &QueryOutcome) -> Self {
        let (row_count, error_message) = match outcome {
            QueryOutcome::Rows { rows, .. } => (Some(rows.len()), None),
            QueryOutcome::Message(_) => (None, None),
            QueryOutcome::Failure(text) => (None, Some(text.clone())),
        };
        Self { sql: sql.into(), row_count, error_message, executed_at: Utc::now() }
    }

    /// Check if this entry represents a successful statement.
    pub fn is_success(&self) -> bool {
        self.error_message.is_none()
    }

    /// Get a truncated version of the SQL for display.
    pub fn sql_preview(&self, max_len: usize) -> &str {
        if self.sql.len() <= max_len {
            &self.sql
        } else {
            &self.sql[..max_len]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_from_rows_records_count() {
        let outcome = QueryOutcome::Rows {
            columns: vec!["id".into()],
            rows: vec![vec!["1".into()], vec!["2".into()]],
        };
        let entry = HistoryEntry::from_outcome("SELECT id FROM t", &outcome);
        assert_eq!(entry.row_count, Some(2));
        assert!(entry.is_success());
    }

    #[test]
    fn entry_from_failure_records_error() {
        let outcome = QueryOutcome::Failure("no such table: t".into());
        let entry = HistoryEntry::from_outcome("SELECT * FROM t", &outcome);
        assert!(!entry.is_success());
        assert_eq!(entry.error_message.as_deref(), Some("no such table: t"));
    }

    #[test]
    fn preview_truncates() {
        let outcome = QueryOutcome::message(0);
        let entry = HistoryEntry::from_outcome("SELECT 1234567890", &outcome);
        assert_eq!(entry.sql_preview(6), "SELECT");
        assert_eq!(entry.sql_preview(100), "SELECT 1234567890");
    }
}
