//! Path extraction from diff headers, including git's C-style quoting of
//! names with non-ASCII or control bytes.

/// Pre-image path from the text after `--- `; `/dev/null` maps to `None`.
pub(crate) fn pre_image_path(raw: &str) -> Option<String> {
    marker_path(raw, "a/")
}

/// Post-image path from the text after `+++ `; `/dev/null` maps to `None`.
pub(crate) fn post_image_path(raw: &str) -> Option<String> {
    marker_path(raw, "b/")
}

fn marker_path(raw: &str, prefix: &str) -> Option<String> {
    // Unquoted names with spaces get a trailing tab terminator.
    let unquoted = unquote(raw.trim_end_matches(['\t', ' ']));
    if unquoted == "/dev/null" {
        return None;
    }
    Some(drop_prefix(&unquoted, prefix))
}

/// Best-effort paths from a `diff --git a/X b/Y` line. Names containing
/// ` b/` are ambiguous here; the `---`/`+++` and rename headers that follow
/// are authoritative and overwrite whatever this returns.
pub(crate) fn paths_from_diff_line(line: &str) -> (Option<String>, Option<String>) {
    let rest = line.strip_prefix("diff --git ").unwrap_or(line);
    let Some(idx) = rest.find(" b/").or_else(|| rest.find(" \"b/")) else {
        return (None, None);
    };
    let old = unquote(rest[..idx].trim());
    let new = unquote(rest[idx + 1..].trim());
    (
        Some(drop_prefix(&old, "a/")),
        Some(drop_prefix(&new, "b/")),
    )
}

fn drop_prefix(s: &str, prefix: &str) -> String {
    s.strip_prefix(prefix).unwrap_or(s).to_string()
}

/// Decode a git C-style quoted name (`"caf\303\251.txt"`); anything not
/// wrapped in double quotes passes through unchanged.
pub(crate) fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    else {
        return raw.to_string();
    };
    let src = inner.as_bytes();
    let mut bytes = Vec::with_capacity(src.len());
    let mut i = 0;
    while i < src.len() {
        if src[i] != b'\\' {
            bytes.push(src[i]);
            i += 1;
            continue;
        }
        i += 1;
        if i >= src.len() {
            break;
        }
        match src[i] {
            b'n' => {
                bytes.push(b'\n');
                i += 1;
            }
            b't' => {
                bytes.push(b'\t');
                i += 1;
            }
            b'r' => {
                bytes.push(b'\r');
                i += 1;
            }
            b'0'..=b'7' => {
                let mut val: u8 = 0;
                let mut digits = 0;
                while digits < 3 && i < src.len() && (b'0'..=b'7').contains(&src[i]) {
                    val = val.wrapping_mul(8).wrapping_add(src[i] - b'0');
                    i += 1;
                    digits += 1;
                }
                bytes.push(val);
            }
            other => {
                bytes.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
