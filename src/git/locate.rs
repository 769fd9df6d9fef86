use std::path::{Path, PathBuf};

use crate::error::GitError;

pub(crate) const GIT_BIN: &str = "git";

/// Resolve the `git` executable by searching the directories on `PATH`.
///
/// # Errors
/// Returns [`GitError::GitNotFound`] when no executable `git` exists on the
/// search path. This is fatal for the whole extraction session.
pub fn find_git() -> Result<PathBuf, GitError> {
    let Some(path_var) = std::env::var_os("PATH") else {
        return Err(GitError::GitNotFound { bin: GIT_BIN });
    };
    for dir in std::env::split_paths(&path_var) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(GIT_BIN);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
    }
    Err(GitError::GitNotFound { bin: GIT_BIN })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
