//! Startup configuration.
//!
//! Values come from the command line (see `main.rs`) and, for the shell name, from
//! the environment the interpreter was started in. Everything here is fixed before
//! the first line is read.

/// Fallback display name when nothing better is known.
pub const DEFAULT_SHELL_NAME: &str = "hsh";

/// Variable kept by the startup environment filter unless configured otherwise.
pub const DEFAULT_KEEP_VAR: &str = "PATH";

/// How the startup environment filter decides which entries to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Keep entries whose raw `name=value` text starts with the keep string.
    #[default]
    Prefix,
    /// Keep only the entry whose name equals the keep string.
    Exact,
}

/// Interpreter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Explicit display name for diagnostics. Overrides `$_` and `argv[0]`.
    pub shell_name: Option<String>,
    /// What the environment filter keeps.
    pub keep_var: String,
    /// How `keep_var` is matched.
    pub filter_mode: FilterMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shell_name: None,
            keep_var: DEFAULT_KEEP_VAR.to_string(),
            filter_mode: FilterMode::default(),
        }
    }
}

impl Config {
    /// Resolve the display name: explicit name, then `$_`, then `argv[0]`, then
    /// [`DEFAULT_SHELL_NAME`]. Empty candidates are skipped.
    pub fn shell_name_from(&self, underscore: Option<&str>, argv0: Option<&str>) -> String {
        [self.shell_name.as_deref(), underscore, argv0]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SHELL_NAME)
            .to_string()
    }
}
