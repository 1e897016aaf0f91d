use crate::env::Environment;
use std::path::{Path, PathBuf};

/// Separator between entries of `PATH`.
const PATH_LIST_SEPARATOR: char = ':';

/// Whether a command name already names a location and must not be searched for.
pub fn has_separator(name: &str) -> bool {
    name.contains('/')
}

/// Resolve a command name to the program that should be started for it.
///
/// Behavior:
/// - Name containing `/`: returned unchanged, nothing is looked up.
/// - `PATH` missing or empty in `env`: the name is looked up in the current directory.
/// - Otherwise every `PATH` entry is tried in order and the first executable match
///   wins. Empty entries are skipped, relative ones are taken against
///   `env.current_dir`.
/// - Empty name, or no match: `None`.
///
/// `PATH` is read from `env` on every call.
pub fn resolve(env: &Environment, name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    if has_separator(name) {
        return Some(PathBuf::from(name));
    }

    let found = match env.get_var("PATH") {
        Some(search_paths) if !search_paths.is_empty() => {
            find_in_path(search_paths, &env.current_dir, name)
        }
        _ => {
            let candidate = env.current_dir.join(name);
            is_executable(&candidate).then_some(candidate)
        }
    };
    tracing::debug!(name, ?found, "resolved command");
    found
}

fn find_in_path(search_paths: &str, current_dir: &Path, name: &str) -> Option<PathBuf> {
    search_paths
        .split(PATH_LIST_SEPARATOR)
        .filter(|dir| !dir.is_empty())
        .map(|dir| current_dir.join(dir).join(name))
        .find(|candidate| {
            let ok = is_executable(candidate);
            tracing::trace!(?candidate, ok, "checked candidate");
            ok
        })
}

/// A regular file (after following symlinks) that the calling user may execute.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    if !path.metadata().is_ok_and(|meta| meta.is_file()) {
        return false;
    }
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}
