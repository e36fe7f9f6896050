//! Presentation layer for Quill, a desktop SQLite browser.
//!
//! Everything here is a headless model: the schema tree, the results grid,
//! and the workspace that binds user actions to the session. Widget layout,
//! styling, and file dialogs belong to whichever shell renders these models.

pub mod results;
pub mod tree;
pub mod workspace;

pub use results::ResultsGrid;
pub use tree::{NodeKind, SchemaTree, TreeNode};
pub use workspace::{Action, ActionBinding, Alert, Workspace, ACTIONS};
