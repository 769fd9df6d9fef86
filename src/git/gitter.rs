use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::GitError;

use super::locate::{GIT_BIN, find_git};

pub(crate) const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One git binary bound to one absolute working directory.
///
/// Construction normalizes the directory exactly once and runs the bootstrap
/// configuration; after that the handle is immutable and owns every command
/// issued against that directory. Intended for one extraction call at a time.
pub struct Gitter {
    bin_path: PathBuf,
    path: PathBuf,
}

impl Gitter {
    /// Bind git to `dir` and bootstrap it for patch extraction.
    ///
    /// The directory is lexically cleaned and made absolute, marked as a
    /// `safe.directory` in git's global configuration (required when the
    /// directory owner differs from the invoking user, as in CI containers),
    /// and `diff.renameLimit` is raised to 65535 so commits touching many
    /// files still get renames detected instead of delete/add pairs. Both
    /// config commands are idempotent.
    ///
    /// # Errors
    /// Returns [`GitError::GitNotFound`] when git is absent from `PATH`,
    /// [`GitError::PathResolve`] when `dir` cannot be made absolute, and
    /// [`GitError::Config`] when either bootstrap command fails.
    pub fn new(dir: &Path) -> Result<Self, GitError> {
        let bin_path = find_git()?;
        let path = std::path::absolute(dir).map_err(|source| GitError::PathResolve {
            path: dir.to_path_buf(),
            source,
        })?;
        let g = Self { bin_path, path };

        g.exec(
            BOOTSTRAP_TIMEOUT,
            &[
                OsStr::new("config"),
                OsStr::new("--add"),
                OsStr::new("--global"),
                OsStr::new("safe.directory"),
                g.path.as_os_str(),
            ],
        )
        .map_err(|e| GitError::Config {
            source: Box::new(e),
        })?;

        let rename_limit = u16::MAX.to_string();
        g.exec(
            BOOTSTRAP_TIMEOUT,
            &["config", "diff.renameLimit", rename_limit.as_str()],
        )
        .map_err(|e| GitError::Config {
            source: Box::new(e),
        })?;

        Ok(g)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one git invocation under `timeout` and return its stdout bytes.
    ///
    /// Every invocation is prefixed with `--no-pager -C <path>` and has its
    /// working directory pinned to the handle's path, so behavior does not
    /// depend on the caller's cwd or terminal. Stderr is captured only to
    /// enrich failure messages.
    ///
    /// # Errors
    /// [`GitError::Start`] when the child cannot be spawned or waited on,
    /// [`GitError::Exit`] when it exits non-zero (with trimmed stderr), and
    /// [`GitError::TimedOut`] when the deadline elapses, in which case the
    /// child is killed.
    pub fn exec<S: AsRef<OsStr>>(
        &self,
        timeout: Duration,
        args: &[S],
    ) -> Result<Vec<u8>, GitError> {
        let command = self.describe(args);
        let mut child = Command::new(&self.bin_path)
            .arg("--no-pager")
            .arg("-C")
            .arg(&self.path)
            .args(args)
            .current_dir(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::Start {
                command: command.clone(),
                source,
            })?;

        // Drain both pipes off-thread so a chatty child never blocks on a
        // full pipe while we poll for exit.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let out_handle = std::thread::spawn(move || drain(stdout));
        let err_handle = std::thread::spawn(move || drain(stderr));

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(GitError::TimedOut { command, timeout });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GitError::Start { command, source });
                }
            }
        };

        let out = out_handle.join().unwrap_or_default();
        let err = err_handle.join().unwrap_or_default();
        if !status.success() {
            let stderr = String::from_utf8_lossy(&err).trim().to_string();
            return Err(GitError::Exit {
                command,
                status,
                stderr,
            });
        }
        Ok(out)
    }

    fn describe<S: AsRef<OsStr>>(&self, args: &[S]) -> String {
        let mut parts = vec![
            GIT_BIN.to_string(),
            "--no-pager".to_string(),
            "-C".to_string(),
            self.path.to_string_lossy().into_owned(),
        ];
        parts.extend(
            args.iter()
                .map(|a| a.as_ref().to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}

fn drain<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}
