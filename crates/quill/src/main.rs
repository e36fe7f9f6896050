//! Quill - a lightweight SQLite browser.

mod app;

use app::QuillApp;
use quill_core::logging::{init_logging, log_dir, LogConfig};

fn main() {
    // Initialize logging before anything touches the session
    let log_config = LogConfig::new(log_dir());
    let _logging_guard = init_logging(log_config);

    tracing::info!("Starting Quill");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut app = QuillApp::new();
    if let Err(e) = app.run(stdin.lock(), stdout.lock()) {
        tracing::error!(error = %e, "Shell terminated with an I/O error");
        std::process::exit(1);
    }

    tracing::info!("Quill exiting");
}
