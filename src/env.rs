use crate::config::FilterMode;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// The interpreter's own view of the process environment.
///
/// The environment contains:
/// - `vars`: the variables visible to path resolution and to every launched child.
/// - `current_dir`: the working directory children are started in.
///
/// It is captured once at startup and from then on is the only source of truth:
/// lookups never fall back to the real process environment, and the real process
/// environment is never written to. Children get exactly `vars`.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Variables keyed by name (e.g. `PATH`).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn new() -> Self {
        let vars = stdenv::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// Build an environment from explicit variables, rooted at `current_dir`.
    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>, current_dir: PathBuf) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            current_dir,
        }
    }

    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Reduce the environment to the entries matched by `keep`.
    ///
    /// With [`FilterMode::Prefix`] an entry survives when its raw `name=value` text
    /// starts with `keep`, so `keep = "PATH"` also retains `PATHEXT=...` or even
    /// `PATHOLOGICAL=1`. [`FilterMode::Exact`] keeps only the variable named `keep`.
    ///
    /// Returns the number of entries kept.
    pub fn filter(&mut self, keep: &str, mode: FilterMode) -> usize {
        let before = self.vars.len();
        self.vars.retain(|name, value| match mode {
            FilterMode::Prefix => format!("{name}={value}").starts_with(keep),
            FilterMode::Exact => name == keep,
        });
        tracing::debug!(
            keep,
            ?mode,
            kept = self.vars.len(),
            removed = before - self.vars.len(),
            "filtered environment"
        );
        self.vars.len()
    }

    /// Remove every variable.
    pub fn clear(&mut self) {
        self.vars.clear();
    }

    /// All entries as `name=value`, sorted by name.
    pub fn entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = self.vars.iter().map(|(k, v)| format!("{k}={v}")).collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
