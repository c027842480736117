/// Error types for rerun
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rerun operations
#[derive(Error, Debug)]
pub enum RecallError {
    /// I/O errors (history files, stdin/stdout)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A built-in pattern failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// None of the candidate history files exist
    #[error("no history file found, tried: {}", format_paths(.tried))]
    NoHistory { tried: Vec<PathBuf> },

    /// A history file contained a record we could not make sense of
    #[error("invalid line {line} in {}: {reason}", .path.display())]
    InvalidHistoryLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A folded match had nowhere to go in the restoration map.
    /// This is a corpus builder bug, never bad input.
    #[error("internal error: missing restore case for {0:?}")]
    MissingRestoration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for rerun operations
pub type Result<T> = std::result::Result<T, RecallError>;

fn format_paths(paths: &[PathBuf]) -> String {
    let shown: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    format!("[{}]", shown.join(", "))
}

/// Convert RecallError to a user-friendly error message
impl RecallError {
    pub fn user_message(&self) -> String {
        match self {
            RecallError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            RecallError::Serialization(e) => {
                format!("Could not understand request: {}", e)
            }
            RecallError::Regex(e) => {
                format!("Internal pattern error: {}", e)
            }
            RecallError::NoHistory { tried } => {
                format!(
                    "No shell history found. Set $HISTFILE or pass --history-file. Tried: {}",
                    format_paths(tried)
                )
            }
            RecallError::InvalidHistoryLine { path, line, reason } => {
                format!("Skipping {} (line {}): {}", path.display(), line, reason)
            }
            RecallError::MissingRestoration(cmd) => {
                format!("Internal error restoring the case of '{}'. Please report this.", cmd)
            }
            RecallError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }

    /// True for errors that mean the program itself is broken,
    /// as opposed to bad input or a missing file.
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, RecallError::MissingRestoration(_))
    }
}
