//! Results grid model.
//!
//! Renders a [`QueryOutcome`] the way the results pane expects it: row
//! outcomes as column headings plus data rows, message and failure outcomes
//! as a single-column message grid. An empty row set also renders as a
//! message grid so the pane never shows a bare header with nothing under it.

use quill_core::models::QueryOutcome;
use serde::{Deserialize, Serialize};

/// Placeholder row shown when a query returns no rows.
const NO_RESULTS: &str = "No results found.";

/// Heading used for message-shaped grids.
const MESSAGE_COLUMN: &str = "Message";

/// A rendered results grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsGrid {
    /// Column headings.
    pub columns: Vec<String>,
    /// Data rows, already stringified.
    pub rows: Vec<Vec<String>>,
}

impl ResultsGrid {
    /// An empty grid (nothing executed yet, or database closed).
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single-column grid carrying one message row.
    pub fn message(text: impl Into<String>) -> Self {
        Self { columns: vec![MESSAGE_COLUMN.to_string()], rows: vec![vec![text.into()]] }
    }

    /// Render an outcome into a grid.
    pub fn from_outcome(outcome: &QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Rows { rows, .. } if rows.is_empty() => Self::message(NO_RESULTS),
            QueryOutcome::Rows { columns, rows } => {
                Self { columns: columns.clone(), rows: rows.clone() }
            }
            QueryOutcome::Message(text) | QueryOutcome::Failure(text) => Self::message(text.clone()),
        }
    }
}

/// Status-line text for an outcome.
pub fn status_line(outcome: &QueryOutcome) -> String {
    match outcome {
        QueryOutcome::Rows { rows, .. } if rows.is_empty() => {
            "Query executed successfully, but no results were returned.".to_string()
        }
        QueryOutcome::Rows { rows, .. } => {
            format!("Query executed successfully. {} records found.", rows.len())
        }
        QueryOutcome::Message(text) => text.clone(),
        QueryOutcome::Failure(_) => "Error executing query.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_render_headings_and_data() {
        let outcome = QueryOutcome::Rows {
            columns: vec!["id".into(), "title".into()],
            rows: vec![vec!["1".into(), "one".into()]],
        };
        let grid = ResultsGrid::from_outcome(&outcome);
        assert_eq!(grid.columns, vec!["id", "title"]);
        assert_eq!(grid.rows, vec![vec!["1", "one"]]);
        assert_eq!(status_line(&outcome), "Query executed successfully. 1 records found.");
    }

    #[test]
    fn empty_row_set_renders_placeholder() {
        let outcome = QueryOutcome::Rows { columns: vec!["id".into()], rows: vec![] };
        let grid = ResultsGrid::from_outcome(&outcome);
        assert_eq!(grid.columns, vec!["Message"]);
        assert_eq!(grid.rows, vec![vec!["No results found."]]);
        assert!(status_line(&outcome).contains("no results"));
    }

    #[test]
    fn message_outcome_renders_its_text() {
        let outcome = QueryOutcome::message(2);
        let grid = ResultsGrid::from_outcome(&outcome);
        assert_eq!(grid.columns, vec!["Message"]);
        assert!(grid.rows[0][0].contains("Rows affected: 2"));
        assert_eq!(status_line(&outcome), grid.rows[0][0]);
    }

    #[test]
    fn failure_renders_message_grid_and_error_status() {
        let outcome = QueryOutcome::Failure("no such table: t".into());
        let grid = ResultsGrid::from_outcome(&outcome);
        assert_eq!(grid.rows, vec![vec!["no such table: t"]]);
        assert_eq!(status_line(&outcome), "Error executing query.");
    }
}
