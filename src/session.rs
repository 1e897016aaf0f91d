//! State that lives for the whole interpreter run.

use crate::command::ExitCode;
use crate::config::Config;
use crate::env::Environment;

/// Per-process interpreter state, shared by every line that is processed.
#[derive(Debug, Clone)]
pub struct Session {
    shell_name: String,
    command_count: u64,
    env: Environment,
    last_status: ExitCode,
}

impl Session {
    pub fn new(shell_name: impl Into<String>, env: Environment) -> Self {
        Self {
            shell_name: shell_name.into(),
            command_count: 0,
            env,
            last_status: 0,
        }
    }

    /// Capture the process environment and apply `config` to it.
    ///
    /// The shell name is taken from `$_` before the environment filter runs, since
    /// the filter normally removes `_`.
    pub fn start(config: &Config) -> Self {
        let mut env = Environment::new();
        let argv0 = std::env::args_os()
            .next()
            .map(|arg| arg.to_string_lossy().into_owned());
        let shell_name = config.shell_name_from(env.get_var("_"), argv0.as_deref());
        env.filter(&config.keep_var, config.filter_mode);
        tracing::debug!(%shell_name, vars = env.len(), "session started");
        Self::new(shell_name, env)
    }

    pub fn shell_name(&self) -> &str {
        &self.shell_name
    }

    /// Number of lines accepted so far. The line being processed is included.
    pub fn command_count(&self) -> u64 {
        self.command_count
    }

    /// Account for one more accepted input line and return its number.
    pub fn next_command(&mut self) -> u64 {
        self.command_count += 1;
        self.command_count
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Status the process ends with at end of input: 127 or 2 when the last
    /// dispatched line could not be started, 0 otherwise.
    pub fn last_status(&self) -> ExitCode {
        self.last_status
    }

    pub fn set_last_status(&mut self, status: ExitCode) {
        self.last_status = status;
    }
}
