//! CLI command implementations.

pub mod document;
pub mod snapshot;
pub mod table;

/// Result type shared by the commands.
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;
