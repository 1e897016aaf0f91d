use crate::command::{CommandFactory, Context, Control, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::interpreter::Factory;
use crate::path;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Command that is not a builtin: a program run in a child process.
pub struct ExternalCommand {
    program: PathBuf,
    argv0: String,
    args: Vec<String>,
}

impl ExternalCommand {
    /// `program` is what gets executed, `argv0` is what the program sees as its own
    /// name (the command as the user typed it).
    pub fn new(program: PathBuf, argv0: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program,
            argv0: argv0.into(),
            args,
        }
    }

    fn spawn_error(&self, err: io::Error) -> ShellError {
        tracing::debug!(program = %self.program.display(), %err, "spawn failed");
        if is_resource_exhaustion(&err) {
            ShellError::ForkFailed(err)
        } else {
            ShellError::NotFound(self.argv0.clone())
        }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(&self, env: &Environment, argv: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        let (name, args) = argv.split_first()?;
        let program = path::resolve(env, name)?;
        Some(Box::new(ExternalCommand::new(
            program,
            *name,
            args.iter().map(|x| x.to_string()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    /// Start the program with the session's environment and working directory and
    /// block until it terminates. The child's status never ends the session.
    fn execute(self: Box<Self>, ctx: &mut Context<'_>) -> Result<Control> {
        ctx.stdout.flush()?;
        ctx.stderr.flush()?;

        let env = ctx.env();
        let mut cmd = std::process::Command::new(&self.program);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.argv0);
        }
        cmd.args(&self.args)
            .env_clear()
            .envs(&env.vars)
            .current_dir(&env.current_dir);

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;
        tracing::debug!(pid = child.id(), program = %self.program.display(), "spawned");

        let exit_status = child.wait().map_err(ShellError::Wait)?;
        let code = match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        };
        tracing::debug!(code, "child exited");
        Ok(Control::Continue(code))
    }
}

#[cfg(unix)]
fn is_resource_exhaustion(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(libc::EAGAIN | libc::ENOMEM))
}

#[cfg(not(unix))]
fn is_resource_exhaustion(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::OutOfMemory
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}
