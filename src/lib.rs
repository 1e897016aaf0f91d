//! A small line-oriented command interpreter.
//!
//! Each input line is split on whitespace into a command and its arguments. The
//! command is either a builtin run inside the interpreter (`cd`, `exit`,
//! `env-reset`) or a program found along `PATH` and run as a child process, one at a
//! time. Failures are reported on standard error as
//! `<shell_name>: <command_count>: <message>` and the loop goes on.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`] and
//! [`env`] expose the traits and types for implementing your own commands and for
//! working with the interpreter's environment.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod logging;
pub mod path;
pub mod session;

pub use builtin::parse_status;
pub use command::{Control, ExitCode};
pub use config::{Config, FilterMode};
pub use error::ShellError;
/// Just a convenient re-export of the command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
