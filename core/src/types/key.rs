use nutype::nutype;

pub const MAX_ISSUE_KEY_LENGTH: usize = 256;

/// Fully-qualified issue identifier, e.g. `UE-1234`.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = MAX_ISSUE_KEY_LENGTH),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Borrow,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct IssueKey(String);

impl IssueKey {
    /// Name used as the persistence key for this issue.
    ///
    /// `[A-Za-z0-9.-]` is kept as is; every other byte, `_` included, is
    /// written as `_XX` in uppercase hex. The mapping is one-to-one and the
    /// result is safe to embed in a file name.
    pub fn storage_name(&self) -> String {
        let mut name = String::with_capacity(self.len());
        for byte in self.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-') {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{byte:02X}"));
            }
        }
        name
    }
}

/// Prepends `"{prefix}-"` to a bare issue number.
///
/// Input that already carries the prefix, and empty input, is returned trimmed
/// but otherwise unchanged.
pub fn normalize_issue_key(raw: &str, prefix: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || prefix.is_empty() || raw.starts_with(&format!("{prefix}-")) {
        return raw.to_string();
    }
    format!("{prefix}-{raw}")
}
