//! The workspace: session state as the shell sees it.
//!
//! Owns the [`Session`], the editor buffer, and the rendered models (tree,
//! grid, status line, pending alert). User actions arrive through a fixed
//! command table and are dispatched by identifier; the tree is rebuilt
//! exactly when the snapshot can have changed: after create, open, close,
//! refresh, and any executed statement that lexically alters the schema.

use std::path::Path;

use quill_core::models::{QueryOutcome, StatementClass};
use quill_core::Session;

use crate::results::{self, ResultsGrid};
use crate::tree::{self, NodeKind, SchemaTree};

/// Editor text seeded after creating a fresh database.
const NEW_DATABASE_TEMPLATE: &str = "\
-- Example of table creation
CREATE TABLE customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);";

/// A user action. The set is fixed at startup; there is nothing dynamic to
/// dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a database file and open it.
    NewDatabase,
    /// Open an existing database file.
    OpenDatabase,
    /// Close the open database.
    CloseDatabase,
    /// Rebuild the navigation tree.
    RefreshTree,
    /// Execute the editor contents.
    ExecuteQuery,
    /// Clear the editor.
    ClearEditor,
}

/// One entry of the command table.
pub struct ActionBinding {
    /// Stable identifier the shell dispatches by.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// The bound action.
    pub action: Action,
    /// Whether dispatch requires a file path argument.
    pub takes_path: bool,
}

/// The command table, constructed once.
pub const ACTIONS: [ActionBinding; 6] = [
    ActionBinding { id: "new", label: "New DB", action: Action::NewDatabase, takes_path: true },
    ActionBinding { id: "open", label: "Open DB", action: Action::OpenDatabase, takes_path: true },
    ActionBinding { id: "close", label: "Close DB", action: Action::CloseDatabase, takes_path: false },
    ActionBinding { id: "refresh", label: "Update", action: Action::RefreshTree, takes_path: false },
    ActionBinding { id: "execute", label: "Execute Query", action: Action::ExecuteQuery, takes_path: false },
    ActionBinding { id: "clear", label: "Clear", action: Action::ClearEditor, takes_path: false },
];

impl Action {
    /// Look an action up by its identifier.
    pub fn from_id(id: &str) -> Option<Action> {
        ACTIONS.iter().find(|b| b.id == id).map(|b| b.action)
    }
}

/// A blocking notification the shell must surface before anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Dialog title.
    pub title: String,
    /// Dialog body.
    pub text: String,
}

impl Alert {
    fn warning(text: impl Into<String>) -> Self {
        Self { title: "Warning".to_string(), text: text.into() }
    }

    fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self { title: title.into(), text: text.into() }
    }
}

/// Central view state: the session plus everything the shell renders.
pub struct Workspace {
    session: Session,
    editor: String,
    tree: SchemaTree,
    grid: ResultsGrid,
    status: String,
    alert: Option<Alert>,
}

impl Workspace {
    /// Create a workspace with no open database.
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            editor: String::new(),
            tree: SchemaTree::new(),
            grid: ResultsGrid::empty(),
            status: "Ready".to_string(),
            alert: None,
        }
    }

    /// Dispatch an action from the command table.
    ///
    /// `argument` carries the file path for the actions that take one (in a
    /// windowed shell it would come from the file dialog).
    pub fn dispatch(&mut self, action: Action, argument: Option<&str>) {
        tracing::debug!(?action, "Dispatching action");
        match action {
            Action::NewDatabase => match argument {
                Some(path) => self.new_database(Path::new(path)),
                None => self.status = "A file path is required to create a database".to_string(),
            },
            Action::OpenDatabase => match argument {
                Some(path) => self.open_database(Path::new(path)),
                None => self.status = "A file path is required to open a database".to_string(),
            },
            Action::CloseDatabase => self.close_database(),
            Action::RefreshTree => self.refresh_tree(),
            Action::ExecuteQuery => self.execute_editor(),
            Action::ClearEditor => self.editor.clear(),
        }
    }

    /// Create a new database and open it.
    pub fn new_database(&mut self, path: &Path) {
        match self.session.create(path) {
            Ok(()) => {
                self.status = format!("Database created: {}", file_name(path));
                self.rebuild_tree();
                self.editor = NEW_DATABASE_TEMPLATE.to_string();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Create failed");
                self.status = "Error creating the database".to_string();
            }
        }
    }

    /// Open an existing database.
    pub fn open_database(&mut self, path: &Path) {
        match self.session.open(path) {
            Ok(()) => {
                self.status = format!("Connected to database: {}", file_name(path));
                self.rebuild_tree();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Open failed");
                self.status = "Error connecting to the database".to_string();
            }
        }
    }

    /// Close the open database, clearing the tree and grid.
    pub fn close_database(&mut self) {
        if self.session.is_connected() {
            self.session.close();
            self.tree.clear();
            self.grid = ResultsGrid::empty();
            self.status = "Database connection closed".to_string();
        } else {
            self.status = "No open database to close".to_string();
        }
    }

    /// Rebuild the navigation tree from the current snapshot.
    pub fn refresh_tree(&mut self) {
        if self.session.is_connected() {
            self.rebuild_tree();
            self.status = "Navigation tree updated".to_string();
        } else {
            self.status = "No open database to refresh".to_string();
        }
    }

    /// Execute the editor contents as one statement.
    pub fn execute_editor(&mut self) {
        let sql = self.editor.clone();
        self.execute_sql(&sql);
    }

    /// Execute one statement and update grid, status, tree, and alert.
    pub fn execute_sql(&mut self, sql: &str) {
        if !self.session.is_connected() {
            self.alert = Some(Alert::warning("No database open."));
            return;
        }
        if sql.trim().is_empty() {
            self.alert = Some(Alert::warning("Empty query."));
            return;
        }

        let outcome = self.session.execute(sql);
        self.grid = ResultsGrid::from_outcome(&outcome);
        self.status = results::status_line(&outcome);

        match &outcome {
            QueryOutcome::Failure(text) => {
                self.alert = Some(Alert::error("SQL Error", text.clone()));
            }
            _ if StatementClass::touches_schema(sql) => self.rebuild_tree(),
            _ => {}
        }
    }

    /// Handle a tree selection: tables and views seed the editor with a
    /// browse query.
    pub fn select_node(&mut self, kind: NodeKind, name: &str) {
        if let Some(suggestion) = tree::suggested_query(kind, name) {
            self.editor = suggestion;
        }
    }

    /// Replace the editor contents.
    pub fn set_editor(&mut self, text: impl Into<String>) {
        self.editor = text.into();
    }

    /// The editor contents.
    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// The navigation tree model.
    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    /// The results grid model.
    pub fn grid(&self) -> &ResultsGrid {
        &self.grid
    }

    /// The status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Take the pending alert, if one was raised.
    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn rebuild_tree(&mut self) {
        let name = match self.session.current_path() {
            Some(path) => file_name(path),
            None => {
                self.tree.clear();
                return;
            }
        };
        self.tree.rebuild(&name, self.session.schema(), |table| self.session.list_columns(table));
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| {
        path.display().to_string()
    })
}
