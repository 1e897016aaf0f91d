use crate::command::{CommandFactory, Context, Control, ExecutableCommand, ExitCode, USAGE};
use crate::env::Environment;
use crate::error::Result;
use crate::interpreter::Factory;
use std::env;
use std::fs;

/// Built-in commands known to the shell at compile time.
///
/// Builtins run directly in the interpreter's process, since they have to change its
/// state (working directory, environment) or end it.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Other names the command answers to.
    fn aliases() -> &'static [&'static str] {
        &[]
    }

    /// Build the command from the arguments following its name.
    ///
    /// `None` means the line is not handled as this builtin and dispatch moves on to
    /// the next factory.
    fn from_args(args: &[&str]) -> Option<Self>;

    /// Executes the command.
    fn execute(self, ctx: &mut Context<'_>) -> Result<Control>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, ctx: &mut Context<'_>) -> Result<Control> {
        T::execute(*self, ctx)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, _env: &Environment, argv: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        let (name, args) = argv.split_first()?;
        if *name != T::name() && !T::aliases().iter().any(|alias| alias == name) {
            return None;
        }
        let cmd: Box<dyn ExecutableCommand> = Box::new(T::from_args(args)?);
        Some(cmd)
    }
}

/// Change the current working directory.
///
/// Arguments past the first are ignored.
#[derive(Debug, PartialEq, Eq)]
pub struct Cd {
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &[&str]) -> Option<Self> {
        Some(Self {
            target: args.first().map(|t| t.to_string()),
        })
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Control> {
        let Some(target) = self.target else {
            ctx.report("Usage: cd <directory>")?;
            return Ok(Control::Continue(USAGE));
        };

        let new_dir = ctx.env().current_dir.join(&target);
        let changed = fs::canonicalize(&new_dir).and_then(|canonical| {
            env::set_current_dir(&canonical)?;
            Ok(canonical)
        });

        match changed {
            Ok(canonical) => {
                tracing::debug!(dir = %canonical.display(), "changed directory");
                ctx.env_mut().current_dir = canonical;
                Ok(Control::Continue(0))
            }
            Err(err) => {
                tracing::debug!(%target, %err, "cd failed");
                writeln!(ctx.stderr, "cd: can't cd to {}", target)?;
                Ok(Control::Continue(USAGE))
            }
        }
    }
}

/// Leave the shell.
///
/// Accepts at most one argument, the status. With more arguments the line is not an
/// `exit` at all and goes through ordinary command lookup.
#[derive(Debug, PartialEq, Eq)]
pub struct Exit {
    pub status: ExitCode,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(args: &[&str]) -> Option<Self> {
        match args {
            [] => Some(Self { status: 0 }),
            [status] => Some(Self {
                status: parse_status(status),
            }),
            _ => None,
        }
    }

    fn execute(self, _ctx: &mut Context<'_>) -> Result<Control> {
        tracing::debug!(status = self.status, "exit requested");
        Ok(Control::Exit(self.status))
    }
}

/// Parse an exit status the way C's `atoi` does.
///
/// Leading whitespace and one sign are accepted, then as many decimal digits as
/// follow. Anything else ends the number; no digits at all gives 0. Overflow wraps.
pub fn parse_status(text: &str) -> ExitCode {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, d| acc.wrapping_mul(10).wrapping_add(i32::from(d - b'0')));
    if negative { value.wrapping_neg() } else { value }
}

/// Clear the whole session environment and print what is left of it.
///
/// A debugging aid; unrelated to the filter applied at startup.
#[derive(Debug, PartialEq, Eq)]
pub struct EnvReset;

impl BuiltinCommand for EnvReset {
    fn name() -> &'static str {
        "env-reset"
    }

    fn aliases() -> &'static [&'static str] {
        &["clearenv"]
    }

    fn from_args(_args: &[&str]) -> Option<Self> {
        Some(Self)
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Control> {
        ctx.env_mut().clear();
        for entry in ctx.env().entries() {
            writeln!(ctx.stdout, "{}", entry)?;
        }
        ctx.stdout.flush()?;
        Ok(Control::Continue(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use std::env as stdenv;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn session_in(dir: PathBuf) -> Session {
        let env = Environment::with_vars([("PATH", "/bin:/usr/bin")], dir);
        Session::new("hsh", env)
    }

    /// Run `cmd` against `session`, returning its control flow, stdout and stderr.
    fn run<T: BuiltinCommand>(cmd: T, session: &mut Session) -> (Control, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut ctx = Context {
            session,
            stdout: &mut out,
            stderr: &mut err,
        };
        let control = T::execute(cmd, &mut ctx).unwrap();
        (
            control,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn create(factory: &dyn CommandFactory, argv: &[&str]) -> bool {
        let env = Environment::with_vars(Vec::<(String, String)>::new(), stdenv::current_dir().unwrap());
        factory.try_create(&env, argv).is_some()
    }

    #[test]
    fn test_cd_without_target_prints_usage_with_current_count() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut session = session_in(orig.clone());
        session.next_command();
        session.next_command();

        let (control, out, err) = run(Cd::from_args(&[]).unwrap(), &mut session);

        assert_eq!(control, Control::Continue(USAGE));
        assert!(out.is_empty());
        assert_eq!(err, "hsh: 2: Usage: cd <directory>\n");
        assert_eq!(stdenv::current_dir().unwrap(), orig);
        assert_eq!(session.env().current_dir, orig);
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let canonical_temp = fs::canonicalize(temp.path()).expect("canonicalize failed");
        let orig = stdenv::current_dir().unwrap();
        let mut session = session_in(orig.clone());

        let target = canonical_temp.to_string_lossy().to_string();
        let (control, out, err) = run(Cd::from_args(&[target.as_str()]).unwrap(), &mut session);

        let new_cwd = fs::canonicalize(stdenv::current_dir().unwrap()).unwrap();
        stdenv::set_current_dir(&orig).expect("failed to restore cwd");

        assert_eq!(control, Control::Continue(0));
        assert!(out.is_empty() && err.is_empty());
        assert_eq!(new_cwd, canonical_temp);
        assert_eq!(session.env().current_dir, canonical_temp);
    }

    #[test]
    fn test_cd_relative_to_session_dir() {
        let _lock = lock_current_dir();
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        let base = fs::canonicalize(temp.path()).unwrap();
        let orig = stdenv::current_dir().unwrap();
        let mut session = session_in(base.clone());

        let (control, _, _) = run(Cd::from_args(&["sub", "ignored"]).unwrap(), &mut session);
        stdenv::set_current_dir(&orig).expect("failed to restore cwd");

        assert_eq!(control, Control::Continue(0));
        assert_eq!(session.env().current_dir, base.join("sub"));
    }

    #[test]
    fn test_cd_nonexistent_path_reports_target() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut session = session_in(orig.clone());

        let name = format!("nonexistent_dir_for_hsh_test_{}", std::process::id());
        let (control, _, err) = run(Cd::from_args(&[name.as_str()]).unwrap(), &mut session);

        assert_eq!(control, Control::Continue(USAGE));
        assert_eq!(err, format!("cd: can't cd to {}\n", name));
        assert_eq!(stdenv::current_dir().unwrap(), orig);
        assert_eq!(session.env().current_dir, orig);
    }

    #[test]
    fn test_exit_argument_policy() {
        assert_eq!(Exit::from_args(&[]), Some(Exit { status: 0 }));
        assert_eq!(Exit::from_args(&["42"]), Some(Exit { status: 42 }));
        assert_eq!(Exit::from_args(&["7", "8"]), None);
    }

    #[test]
    fn test_exit_requests_termination() {
        let mut session = session_in(stdenv::current_dir().unwrap());
        let (control, out, err) = run(Exit { status: 42 }, &mut session);
        assert_eq!(control, Control::Exit(42));
        assert!(out.is_empty() && err.is_empty());
    }

    #[test]
    fn test_parse_status_follows_atoi() {
        assert_eq!(parse_status("42"), 42);
        assert_eq!(parse_status("  7"), 7);
        assert_eq!(parse_status("+3"), 3);
        assert_eq!(parse_status("-1"), -1);
        assert_eq!(parse_status("12abc"), 12);
        assert_eq!(parse_status("abc"), 0);
        assert_eq!(parse_status("-"), 0);
        assert_eq!(parse_status(""), 0);
    }

    #[test]
    fn test_env_reset_clears_environment() {
        let mut session = session_in(stdenv::current_dir().unwrap());
        session.env_mut().set_var("FOO", "bar");

        let (control, out, err) = run(EnvReset, &mut session);

        assert_eq!(control, Control::Continue(0));
        assert!(session.env().is_empty());
        assert!(out.is_empty() && err.is_empty());
    }

    #[test]
    fn test_factories_match_names_and_aliases() {
        assert!(create(&Factory::<Cd>::default(), &["cd"]));
        assert!(create(&Factory::<Exit>::default(), &["exit", "3"]));
        assert!(!create(&Factory::<Exit>::default(), &["exit", "7", "8"]));
        assert!(create(&Factory::<EnvReset>::default(), &["env-reset"]));
        assert!(create(&Factory::<EnvReset>::default(), &["clearenv"]));
        assert!(!create(&Factory::<Cd>::default(), &["cdx"]));
        assert!(!create(&Factory::<Cd>::default(), &[]));
    }
}
