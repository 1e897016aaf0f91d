use anyhow::Context;
use argh::FromArgs;
use hsh::config::DEFAULT_KEEP_VAR;
use hsh::{Config, FilterMode, Interpreter, io_adapters, logging};

#[derive(FromArgs, Debug)]
/// Read commands from standard input and run them, one line at a time.
struct Args {
    /// name used in diagnostics; defaults to $_, then to the program name.
    #[argh(option)]
    name: Option<String>,

    /// environment entries to keep at startup (default: PATH).
    #[argh(option, default = "DEFAULT_KEEP_VAR.to_string()")]
    keep: String,

    /// keep only the variable named by --keep instead of every entry starting with it.
    #[argh(switch)]
    exact_env: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            shell_name: args.name,
            keep_var: args.keep,
            filter_mode: if args.exact_env {
                FilterMode::Exact
            } else {
                FilterMode::Prefix
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Args = argh::from_env();
    let config = Config::from(args);
    tracing::debug!(?config, "starting");

    let mut interpreter = Interpreter::from_config(&config);
    let mut input = io_adapters::stdin_source().context("cannot open standard input")?;
    let status = interpreter.repl(input.as_mut())?;

    drop(input);
    drop(interpreter);
    std::process::exit(status)
}
