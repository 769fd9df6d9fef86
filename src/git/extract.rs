use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use crate::error::GitError;
use crate::parse::FileChanges;

use super::gitter::Gitter;

pub(crate) const EXTRACT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Lazy sequence of file-change records parsed from one extraction.
pub type PatchStream = FileChanges<Cursor<Vec<u8>>>;

/// Extract the full patch history of `source` as a stream of file changes.
///
/// With an empty `log_opts` the whole history of every ref is scanned
/// (`--full-history --all`), the widest net for a secret-scanning caller.
/// A non-empty `log_opts` is split on whitespace, with no shell quoting,
/// and appended verbatim so callers can scope to branches, paths, or dates.
///
/// # Errors
/// Propagates handle construction and execution failures; see
/// [`Gitter::new`] and [`Gitter::exec`].
pub fn git_log(source: &Path, log_opts: &str) -> Result<PatchStream, GitError> {
    git_log_with_timeout(source, log_opts, EXTRACT_TIMEOUT)
}

/// [`git_log`] with a caller-chosen deadline instead of the 5 minute default.
///
/// # Errors
/// Same contract as [`git_log`].
pub fn git_log_with_timeout(
    source: &Path,
    log_opts: &str,
    timeout: Duration,
) -> Result<PatchStream, GitError> {
    let args = build_log_args(log_opts);
    let g = Gitter::new(source)?;
    let bytes = g.exec(timeout, &args)?;
    Ok(FileChanges::new(Cursor::new(bytes)))
}

/// Extract uncommitted changes of `source` as a stream of file changes.
///
/// `staged` compares the index against HEAD; otherwise the working tree is
/// compared against the index. Both scope to the whole directory tree.
///
/// # Errors
/// Propagates handle construction and execution failures; see
/// [`Gitter::new`] and [`Gitter::exec`].
pub fn git_diff(source: &Path, staged: bool) -> Result<PatchStream, GitError> {
    git_diff_with_timeout(source, staged, EXTRACT_TIMEOUT)
}

/// [`git_diff`] with a caller-chosen deadline instead of the 5 minute default.
///
/// # Errors
/// Same contract as [`git_diff`].
pub fn git_diff_with_timeout(
    source: &Path,
    staged: bool,
    timeout: Duration,
) -> Result<PatchStream, GitError> {
    let args = build_diff_args(staged);
    let g = Gitter::new(source)?;
    let bytes = g.exec(timeout, &args)?;
    Ok(FileChanges::new(Cursor::new(bytes)))
}

fn build_log_args(log_opts: &str) -> Vec<String> {
    let mut args = vec![
        "log".to_string(),
        "--patch".to_string(),
        "--unified=0".to_string(),
    ];
    if log_opts.trim().is_empty() {
        args.push("--full-history".to_string());
        args.push("--all".to_string());
    } else {
        args.extend(log_opts.split_whitespace().map(str::to_string));
    }
    args
}

fn build_diff_args(staged: bool) -> Vec<String> {
    let mut args = vec!["diff".to_string(), "--unified=0".to_string()];
    if staged {
        args.push("--staged".to_string());
    }
    args.push(".".to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::{build_diff_args, build_log_args};

    #[test]
    fn log_defaults_to_full_history_all_refs() {
        assert_eq!(
            build_log_args(""),
            ["log", "--patch", "--unified=0", "--full-history", "--all"]
        );
    }

    #[test]
    fn blank_override_is_same_as_no_override() {
        assert_eq!(build_log_args("   "), build_log_args(""));
    }

    #[test]
    fn override_tokens_replace_defaults_in_order() {
        assert_eq!(
            build_log_args("--since=2020-01-01 -- src/"),
            ["log", "--patch", "--unified=0", "--since=2020-01-01", "--", "src/"]
        );
    }

    #[test]
    fn override_splits_on_runs_of_whitespace() {
        assert_eq!(
            build_log_args("--all \t --max-count=3"),
            ["log", "--patch", "--unified=0", "--all", "--max-count=3"]
        );
    }

    #[test]
    fn diff_args_for_working_tree_and_index() {
        assert_eq!(build_diff_args(false), ["diff", "--unified=0", "."]);
        assert_eq!(build_diff_args(true), ["diff", "--unified=0", "--staged", "."]);
    }
}
