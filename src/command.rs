use crate::env::Environment;
use crate::error::Result;
use crate::session::Session;
use std::fmt::Display;
use std::io::{self, Write};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Status recorded when a command cannot be resolved or its program cannot be started.
pub const NOT_FOUND: ExitCode = 127;

/// Status recorded when a child process could not be created.
pub const FORK_FAILED: ExitCode = 2;

/// Status recorded for a builtin invoked with bad arguments.
pub const USAGE: ExitCode = 2;

/// What the session loop does after a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Read the next line. Carries the command's status.
    Continue(ExitCode),
    /// Stop the session and end the process with this status.
    Exit(ExitCode),
}

/// Everything a command may touch while it runs: the session and the interpreter's
/// own output streams.
pub struct Context<'a> {
    pub session: &'a mut Session,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl Context<'_> {
    /// Write one diagnostic line as `<shell_name>: <command_count>: <message>`.
    pub fn report(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(
            self.stderr,
            "{}: {}: {}",
            self.session.shell_name(),
            self.session.command_count(),
            message
        )
    }

    pub fn env(&self) -> &Environment {
        self.session.env()
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        self.session.env_mut()
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by builtins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command.
    ///
    /// Per-line failures are returned as errors for which
    /// [`ShellError::is_reportable`](crate::error::ShellError::is_reportable) holds;
    /// the session loop turns those into diagnostics.
    fn execute(self: Box<Self>, ctx: &mut Context<'_>) -> Result<Control>;
}

/// Factory that tries to create a command from a tokenized line.
///
/// Returns `None` when the factory doesn't recognize the line. `argv` is never empty.
pub trait CommandFactory {
    /// Attempt to create a command instance for `argv` (`argv[0]` is the name).
    fn try_create(&self, env: &Environment, argv: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
