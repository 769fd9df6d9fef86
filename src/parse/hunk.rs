use super::{Hunk, ParseError};

/// Parse a `@@ -old_start[,old_lines] +new_start[,new_lines] @@` header.
pub(crate) fn parse_header(line: &str) -> Result<Hunk, ParseError> {
    let malformed = || ParseError::MalformedHunk {
        line: line.to_string(),
    };

    let rest = line.strip_prefix("@@ -").ok_or_else(malformed)?;
    let end = rest.find(" @@").ok_or_else(malformed)?;
    let mut ranges = rest[..end].split(" +");
    let old = ranges.next().ok_or_else(malformed)?;
    let new = ranges.next().ok_or_else(malformed)?;
    if ranges.next().is_some() {
        return Err(malformed());
    }

    let (old_start, old_lines) = parse_range(old).ok_or_else(malformed)?;
    let (new_start, new_lines) = parse_range(new).ok_or_else(malformed)?;
    Ok(Hunk {
        old_start,
        old_lines,
        new_start,
        new_lines,
        added: Vec::new(),
        deleted: Vec::new(),
    })
}

// A range without an explicit count spans exactly one line.
fn parse_range(s: &str) -> Option<(u32, u32)> {
    match s.split_once(',') {
        Some((start, lines)) => Some((start.parse().ok()?, lines.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}
