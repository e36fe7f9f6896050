//! Navigation tree model.
//!
//! Models the left-hand schema tree: a root node named after the database
//! file, a "Tables" group whose table nodes carry their columns as children,
//! and a "Views" group. The tree is rebuilt from the session's snapshot
//! whenever the snapshot can have changed, and cleared when the database
//! closes.

use quill_core::models::{ColumnInfo, SchemaSnapshot};
use serde::{Deserialize, Serialize};

/// What a tree node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// The database root node.
    Database,
    /// The "Tables" grouping node.
    TableGroup,
    /// The "Views" grouping node.
    ViewGroup,
    /// A table.
    Table,
    /// A view.
    View,
    /// A column beneath a table node.
    Column,
}

/// One node of the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Display label.
    pub label: String,
    /// Node kind, used for selection handling.
    pub kind: NodeKind,
    /// Child nodes, in display order.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        Self { label: label.into(), kind, children: Vec::new() }
    }
}

/// The navigation tree: empty, or one database root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTree {
    root: Option<TreeNode>,
}

impl SchemaTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the tree from a snapshot.
    ///
    /// `columns_for` is consulted once per table; column metadata is not
    /// part of the snapshot and is fetched on demand.
    pub fn rebuild(
        &mut self,
        database_name: &str,
        snapshot: &SchemaSnapshot,
        mut columns_for: impl FnMut(&str) -> Vec<ColumnInfo>,
    ) {
        let mut tables_group = TreeNode::new("Tables", NodeKind::TableGroup);
        for table in &snapshot.tables {
            let mut node = TreeNode::new(table.clone(), NodeKind::Table);
            for column in columns_for(table) {
                node.children.push(TreeNode::new(
                    format!("{} ({})", column.name, column.decl_type),
                    NodeKind::Column,
                ));
            }
            tables_group.children.push(node);
        }

        let mut views_group = TreeNode::new("Views", NodeKind::ViewGroup);
        for view in &snapshot.views {
            views_group.children.push(TreeNode::new(view.clone(), NodeKind::View));
        }

        let mut root = TreeNode::new(database_name, NodeKind::Database);
        root.children.push(tables_group);
        root.children.push(views_group);
        self.root = Some(root);
    }

    /// Clear the tree.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// The database root node, if a database is open.
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Check whether the tree shows nothing.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

/// Editor suggestion for a selected node.
///
/// Selecting a table or view suggests browsing it; other node kinds suggest
/// nothing.
pub fn suggested_query(kind: NodeKind, name: &str) -> Option<String> {
    match kind {
        NodeKind::Table | NodeKind::View => Some(format!("SELECT * FROM {name} LIMIT 100;")),
        _ => None,
    }
}
