//! The interactive shell.
//!
//! Drives a [`Workspace`] over stdin/stdout: dot-commands map onto the
//! workspace command table, any other line is executed as SQL. Rendering is
//! plain text; the workspace models carry everything that would back a
//! windowed front end.

use std::io::{self, BufRead, Write};

use quill_ui::{Action, ResultsGrid, TreeNode, Workspace};

/// The application shell owning the workspace.
pub struct QuillApp {
    workspace: Workspace,
}

impl QuillApp {
    /// Create a shell with no open database.
    pub fn new() -> Self {
        Self { workspace: Workspace::new() }
    }

    /// Run the line loop until EOF or `.quit`.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        writeln!(output, "Quill - type SQL to execute it, or .help for commands")?;
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed == ".quit" || trimmed == ".exit" {
                break;
            }
            self.handle_line(trimmed, &mut output)?;
        }

        // Release the connection handle before the process exits.
        if self.workspace.session().is_connected() {
            self.workspace.close_database();
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str, output: &mut impl Write) -> io::Result<()> {
        if let Some(rest) = line.strip_prefix('.') {
            self.handle_command(rest, output)?;
        } else {
            self.workspace.set_editor(line);
            self.workspace.dispatch(Action::ExecuteQuery, None);
            if let Some(alert) = self.workspace.take_alert() {
                writeln!(output, "!! {}: {}", alert.title, alert.text)?;
            } else {
                render_grid(self.workspace.grid(), output)?;
            }
            writeln!(output, "-- {}", self.workspace.status())?;
        }
        Ok(())
    }

    fn handle_command(&mut self, rest: &str, output: &mut impl Write) -> io::Result<()> {
        let mut parts = rest.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

        // Workspace-bound commands go through the command table.
        if let Some(action) = Action::from_id(command) {
            self.workspace.dispatch(action, argument);
            if let Some(alert) = self.workspace.take_alert() {
                writeln!(output, "!! {}: {}", alert.title, alert.text)?;
            }
            writeln!(output, "-- {}", self.workspace.status())?;
            return Ok(());
        }

        match command {
            "tree" => match self.workspace.tree().root() {
                Some(root) => render_tree(root, 0, output)?,
                None => writeln!(output, "(no database open)")?,
            },
            "columns" => match argument {
                Some(table) => {
                    for column in self.workspace.session().list_columns(table) {
                        writeln!(output, "{} ({})", column.name, column.decl_type)?;
                    }
                }
                None => writeln!(output, "Usage: .columns <table>")?,
            },
            "history" => {
                for entry in self.workspace.session().recent_history() {
                    let outcome = match (&entry.error_message, entry.row_count) {
                        (Some(err), _) => format!("failed: {err}"),
                        (None, Some(n)) => format!("{n} rows"),
                        (None, None) => "ok".to_string(),
                    };
                    writeln!(output, "{}  [{}]", entry.sql_preview(60), outcome)?;
                }
            }
            "help" => {
                writeln!(output, "Commands:")?;
                writeln!(output, "  .new <path>      create a database file and open it")?;
                writeln!(output, "  .open <path>     open an existing database file")?;
                writeln!(output, "  .close           close the open database")?;
                writeln!(output, "  .refresh         rebuild the navigation tree")?;
                writeln!(output, "  .tree            print the navigation tree")?;
                writeln!(output, "  .columns <tbl>   print the columns of a table")?;
                writeln!(output, "  .history         print recent statements")?;
                writeln!(output, "  .quit            exit")?;
                writeln!(output, "Anything else is executed as a SQL statement.")?;
            }
            other => writeln!(output, "Unknown command: .{other}")?,
        }
        Ok(())
    }
}

impl Default for QuillApp {
    fn default() -> Self {
        Self::new()
    }
}

fn render_tree(node: &TreeNode, depth: usize, output: &mut impl Write) -> io::Result<()> {
    writeln!(output, "{}{}", "  ".repeat(depth), node.label)?;
    for child in &node.children {
        render_tree(child, depth + 1, output)?;
    }
    Ok(())
}

fn render_grid(grid: &ResultsGrid, output: &mut impl Write) -> io::Result<()> {
    if grid.columns.is_empty() {
        return Ok(());
    }

    // Column widths sized to the widest cell, header included.
    let mut widths: Vec<usize> = grid.columns.iter().map(|c| c.len()).collect();
    for row in &grid.rows {
        for (idx, cell) in row.iter().enumerate() {
            if idx < widths.len() && cell.len() > widths[idx] {
                widths[idx] = cell.len();
            }
        }
    }

    render_row(&grid.columns, &widths, output)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    render_row(&rule, &widths, output)?;
    for row in &grid.rows {
        render_row(row, &widths, output)?;
    }
    Ok(())
}

fn render_row<S: AsRef<str>>(
    cells: &[S],
    widths: &[usize],
    output: &mut impl Write,
) -> io::Result<()> {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        let width = widths.get(idx).copied().unwrap_or(0);
        line.push_str("| ");
        line.push_str(&format!("{:width$} ", cell.as_ref(), width = width));
    }
    line.push('|');
    writeln!(output, "{line}")
}
