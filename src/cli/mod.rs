//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! and the interactive session runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod input;
pub mod presenter;
pub mod session_app;
pub mod signals;

// Re-export commonly used types
pub use app::{EXIT_ERROR, EXIT_SUCCESS};
pub use args::{Cli, Commands, ConfigAction};
pub use presenter::Presenter;
pub use session_app::run_session;
