//! Error types for the interpreter.

use crate::command::{ExitCode, FORK_FAILED, NOT_FOUND};
use thiserror::Error;

/// Everything that can go wrong while reading or running a command line.
#[derive(Error, Debug)]
pub enum ShellError {
    /// The command could not be resolved or its program could not be started.
    #[error("{0}: not found")]
    NotFound(String),

    /// Creating the child process failed for lack of resources.
    #[error("Fork failed")]
    ForkFailed(#[source] std::io::Error),

    /// Waiting for a started child failed.
    #[error("wait failed: {0}")]
    Wait(#[source] std::io::Error),

    /// I/O on the interpreter's own streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The interactive line editor failed.
    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl ShellError {
    /// Whether this error is a per-line failure that is reported as a diagnostic
    /// while the loop carries on. Everything else ends the session.
    pub fn is_reportable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::ForkFailed(_) | Self::Wait(_))
    }

    /// Status recorded for the line that failed with this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::NotFound(_) => NOT_FOUND,
            Self::ForkFailed(_) => FORK_FAILED,
            _ => 1,
        }
    }
}

/// Convenience Result type for interpreter operations.
pub type Result<T> = std::result::Result<T, ShellError>;
