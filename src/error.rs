use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

#[derive(Debug)]
pub enum GitError {
    GitNotFound {
        bin: &'static str,
    },
    PathResolve {
        path: PathBuf,
        source: std::io::Error,
    },
    Config {
        source: Box<GitError>,
    },
    Start {
        command: String,
        source: std::io::Error,
    },
    Exit {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    TimedOut {
        command: String,
        timeout: Duration,
    },
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitNotFound { bin } => {
                write!(f, "{bin} is required for executing but was not found on PATH")
            }
            Self::PathResolve { path, source } => {
                write!(
                    f,
                    "could not resolve {} to an absolute path: {source}",
                    path.display()
                )
            }
            Self::Config { source } => {
                write!(f, "failed to configure repository: {source}")
            }
            Self::Start { command, source } => {
                write!(f, "error executing '{command}': {source}")
            }
            Self::Exit {
                command,
                status,
                stderr,
            } => {
                if stderr.is_empty() {
                    write!(f, "error executing '{command}': exited with {status}")
                } else {
                    write!(
                        f,
                        "error executing '{command}': exited with {status}, output: {stderr}"
                    )
                }
            }
            Self::TimedOut { command, timeout } => {
                write!(f, "'{command}' timed out after {}s", timeout.as_secs())
            }
        }
    }
}

impl std::error::Error for GitError {}
