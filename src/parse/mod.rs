//! One-pass parser turning raw `git log -p` / `git diff` bytes into
//! structured file-change records.
//!
//! The iterator is lazy, finite, and forward-only: each call to `next`
//! consumes just enough input to produce one record, and the stream ends
//! when the underlying reader does.

mod header;
mod hunk;

use std::io::BufRead;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Renamed,
}

/// One contiguous block of changed lines within a file.
#[derive(Debug, Clone, Serialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub added: Vec<String>,
    pub deleted: Vec<String>,
}

/// One file's patch within a single commit or diff.
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    /// Commit the change belongs to; `None` for working-tree diffs.
    pub commit: Option<String>,
    /// Pre-image path; `None` for added files.
    pub old_path: Option<String>,
    /// Post-image path; `None` for deleted files.
    pub new_path: Option<String>,
    pub kind: ChangeKind,
    pub is_binary: bool,
    pub hunks: Vec<Hunk>,
}

impl FileChange {
    /// The path a consumer would report for this change: the post-image
    /// path when one exists, the pre-image path otherwise.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.new_path.as_deref().or(self.old_path.as_deref())
    }

    fn new(commit: Option<String>) -> Self {
        Self {
            commit,
            old_path: None,
            new_path: None,
            kind: ChangeKind::Modified,
            is_binary: false,
            hunks: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum ParseError {
    MalformedHunk { line: String },
    Io { source: std::io::Error },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedHunk { line } => write!(f, "malformed hunk header: '{line}'"),
            Self::Io { source } => write!(f, "failed to read patch stream: {source}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Lazy iterator of [`FileChange`] records over a unified-diff byte stream.
///
/// Accepts both `git log --patch` output (commit headers are tracked and
/// stamped onto each record) and plain `git diff` output. Content that is
/// not valid UTF-8 is replaced lossily; paths survive because git emits
/// them C-style quoted when they contain non-ASCII bytes.
pub struct FileChanges<R> {
    reader: R,
    pending: Option<String>,
    commit: Option<String>,
    failed: bool,
}

impl<R: BufRead> FileChanges<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
            commit: None,
            failed: false,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        let mut buf = Vec::new();
        let n = self
            .reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| ParseError::Io { source })?;
        if n == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    fn next_record(&mut self) -> Result<Option<FileChange>, ParseError> {
        loop {
            let Some(line) = self.next_line()? else {
                return Ok(None);
            };
            if let Some(rest) = line.strip_prefix("commit ")
                && let Some(sha) = rest.split_whitespace().next()
            {
                self.commit = Some(sha.to_string());
            } else if line.starts_with("diff --git ") {
                return self.parse_file(&line).map(Some);
            }
        }
    }

    fn parse_file(&mut self, diff_line: &str) -> Result<FileChange, ParseError> {
        let mut change = FileChange::new(self.commit.clone());
        let (old, new) = header::paths_from_diff_line(diff_line);
        change.old_path = old;
        change.new_path = new;

        loop {
            let Some(line) = self.next_line()? else {
                return Ok(change);
            };
            if line.starts_with("@@") || is_boundary(&line) {
                self.pending = Some(line);
                break;
            }
            if let Some(rest) = line.strip_prefix("rename from ") {
                change.kind = ChangeKind::Renamed;
                change.old_path = Some(header::unquote(rest));
            } else if let Some(rest) = line.strip_prefix("rename to ") {
                change.kind = ChangeKind::Renamed;
                change.new_path = Some(header::unquote(rest));
            } else if line.starts_with("new file mode ") {
                change.kind = ChangeKind::Added;
            } else if line.starts_with("deleted file mode ") {
                change.kind = ChangeKind::Deleted;
            } else if let Some(rest) = line.strip_prefix("--- ") {
                change.old_path = header::pre_image_path(rest);
            } else if let Some(rest) = line.strip_prefix("+++ ") {
                change.new_path = header::post_image_path(rest);
            } else if line.starts_with("Binary files ") {
                change.is_binary = true;
            } else if line == "GIT binary patch" {
                change.is_binary = true;
                self.skip_binary_payload()?;
            }
            // index/mode/similarity headers carry nothing we report
        }

        loop {
            let Some(line) = self.next_line()? else {
                break;
            };
            if line.starts_with("@@") {
                let mut h = hunk::parse_header(&line)?;
                self.read_hunk_body(&mut h)?;
                change.hunks.push(h);
            } else {
                self.pending = Some(line);
                break;
            }
        }
        Ok(change)
    }

    // Base85 payload lines can start with bytes that mimic hunk headers,
    // so they are skipped wholesale up to the next record boundary.
    fn skip_binary_payload(&mut self) -> Result<(), ParseError> {
        loop {
            let Some(line) = self.next_line()? else {
                return Ok(());
            };
            if is_boundary(&line) {
                self.pending = Some(line);
                return Ok(());
            }
        }
    }

    fn read_hunk_body(&mut self, h: &mut Hunk) -> Result<(), ParseError> {
        loop {
            let Some(line) = self.next_line()? else {
                return Ok(());
            };
            if let Some(rest) = line.strip_prefix('+') {
                h.added.push(rest.to_string());
            } else if let Some(rest) = line.strip_prefix('-') {
                h.deleted.push(rest.to_string());
            } else if line.starts_with(' ') || line.starts_with('\\') {
                // context line or "\ No newline at end of file"
            } else {
                self.pending = Some(line);
                return Ok(());
            }
        }
    }
}

fn is_boundary(line: &str) -> bool {
    line.starts_with("diff --git ") || line.starts_with("commit ")
}

impl<R: BufRead> Iterator for FileChanges<R> {
    type Item = Result<FileChange, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
