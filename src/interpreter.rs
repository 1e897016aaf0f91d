use crate::command::{CommandFactory, Context, Control, ExitCode};
use crate::config::{Config, DEFAULT_SHELL_NAME};
use crate::env::Environment;
use crate::error::ShellError;
use crate::io_adapters::LineSource;
use crate::lexer;
use crate::session::Session;
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: builtins and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// The interpreter owns a [`Session`] and a list of [`CommandFactory`] objects that
/// are queried in order to create a command for each line. The first factory that
/// recognizes the line wins; when none does the command is reported as not found.
///
/// Example
/// ```
/// use hsh::{Control, Interpreter};
/// use hsh::io_adapters::MemWriter;
///
/// let (err, errors) = MemWriter::with_handle();
/// let mut sh = Interpreter::default().with_output(Box::new(std::io::sink()), Box::new(err));
/// assert_eq!(sh.run_line("zzzznotacommand").unwrap(), Control::Continue(127));
/// assert_eq!(String::from_utf8_lossy(&errors.borrow()), "hsh: 1: zzzznotacommand: not found\n");
/// ```
pub struct Interpreter {
    session: Session,
    commands: Vec<Box<dyn CommandFactory>>,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(session: Session, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            session,
            commands,
            stdout: Box::new(std::io::stdout()),
            stderr: Box::new(std::io::stderr()),
        }
    }

    /// Create an interpreter for `session` with the default set of commands.
    pub fn with_session(session: Session) -> Self {
        Self::new(session, default_commands())
    }

    /// Start a session from the process environment as described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_session(Session::start(config))
    }

    /// Replace the streams the interpreter itself writes to. Children always inherit
    /// the process's real standard streams.
    pub fn with_output(mut self, stdout: Box<dyn Write>, stderr: Box<dyn Write>) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run lines from `input` until `exit` or the end of input.
    ///
    /// Returns the status the process should exit with: the `exit` argument, or at
    /// end of input 0 unless the last dispatched line failed to start (127 when
    /// not found, 2 when the launch hit "Fork failed").
    pub fn repl(&mut self, input: &mut dyn LineSource) -> anyhow::Result<ExitCode> {
        loop {
            let Some(line) = input.read_line()? else {
                if input.is_interactive() {
                    writeln!(self.stdout)?;
                    self.stdout.flush()?;
                }
                let status = self.session.last_status();
                tracing::debug!(status, "end of input");
                return Ok(status);
            };

            if let Control::Exit(status) = self.run_line(&line)? {
                return Ok(status);
            }
        }
    }

    /// Process one accepted input line.
    ///
    /// The command counter moves first, so diagnostics for this line carry its
    /// number. Blank lines are counted but not dispatched.
    pub fn run_line(&mut self, line: &str) -> anyhow::Result<Control> {
        let count = self.session.next_command();
        let argv = lexer::tokenize(line);
        if argv.is_empty() {
            return Ok(Control::Continue(self.session.last_status()));
        }
        tracing::debug!(count, command = argv[0], "dispatching");
        self.run_command(&argv)
    }

    /// Dispatch an already tokenized, non-empty command.
    pub fn run_command(&mut self, argv: &[&str]) -> anyhow::Result<Control> {
        let created = self
            .commands
            .iter()
            .find_map(|factory| factory.try_create(self.session.env(), argv));

        let mut ctx = Context {
            session: &mut self.session,
            stdout: &mut *self.stdout,
            stderr: &mut *self.stderr,
        };
        let result = match created {
            Some(cmd) => cmd.execute(&mut ctx),
            None => Err(ShellError::NotFound(argv[0].to_string())),
        };

        // Only a failure to start the command is remembered; child statuses and
        // builtin errors are not.
        let (control, failure) = match result {
            Ok(control) => (control, 0),
            Err(err) if err.is_reportable() => {
                ctx.report(&err)?;
                let failure = match &err {
                    ShellError::NotFound(_) | ShellError::ForkFailed(_) => err.exit_code(),
                    _ => 0,
                };
                (Control::Continue(err.exit_code()), failure)
            }
            Err(err) => return Err(err.into()),
        };
        ctx.stdout.flush()?;
        ctx.stderr.flush()?;

        if let Control::Continue(_) = control {
            self.session.set_last_status(failure);
        }
        Ok(control)
    }
}

fn default_commands() -> Vec<Box<dyn CommandFactory>> {
    use crate::builtin::*;
    use crate::external::ExternalCommand;
    vec![
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<EnvReset>::default()),
        Box::new(Factory::<ExternalCommand>::default()),
    ]
}

impl Default for Interpreter {
    /// Create an interpreter over the unfiltered process environment, named
    /// [`DEFAULT_SHELL_NAME`], with the default set of commands:
    /// - builtins: `cd`, `exit`, `env-reset`
    /// - external command launcher
    fn default() -> Self {
        Self::with_session(Session::new(DEFAULT_SHELL_NAME, Environment::new()))
    }
}
