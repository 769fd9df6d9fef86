use crate::parse::FileChange;

/// Serialize records as a pretty-printed JSON array.
#[must_use]
pub fn to_json(records: &[FileChange]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}
