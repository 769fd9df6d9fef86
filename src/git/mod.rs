mod extract;
mod gitter;
mod locate;

pub use extract::{PatchStream, git_diff, git_diff_with_timeout, git_log, git_log_with_timeout};
pub use gitter::Gitter;
pub use locate::find_git;
