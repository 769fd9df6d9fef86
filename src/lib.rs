#![forbid(unsafe_code)]
#![deny(warnings, clippy::all, clippy::pedantic)]

mod error;
mod git;
mod parse;
pub mod output;

pub use error::GitError;
pub use git::{
    Gitter, PatchStream, find_git, git_diff, git_diff_with_timeout, git_log,
    git_log_with_timeout,
};
pub use parse::{ChangeKind, FileChange, FileChanges, Hunk, ParseError};
