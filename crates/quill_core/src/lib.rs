//! Core types and services for Quill, a desktop SQLite browser.
//!
//! This crate provides the backend layer for Quill:
//!
//! - **error**: Error handling with driver-specific details
//! - **models**: Data structures for schema snapshots, query outcomes, and history
//! - **services**: The database session and schema introspection
//! - **logging**: Structured logging setup

pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use error::QuillError;
pub use models::{ColumnInfo, HistoryEntry, QueryOutcome, SchemaSnapshot, StatementClass};
pub use services::{SchemaService, Session};
