//! Canonical request encoding.
//!
//! Fields are written in a fixed order (method, path, body, key id, timestamp),
//! each as `<byte length>:<bytes>\n`. The length prefix makes the encoding
//! injective: field values may contain any byte, including `:` and `\n`.

/// Identifies the encoding rule above; sent as `x-api-canonical-version`.
pub const CANONICAL_VERSION: &str = "1";

/// Builds the signable bytes for a request.
///
/// The method is uppercased. The path is used exactly as given, query string
/// included, because the verifier canonicalizes the raw path too.
#[must_use]
pub fn canonicalize(
    method: &str,
    path: &str,
    body: &[u8],
    key_id: &str,
    timestamp: i64,
) -> Vec<u8> {
    let method = method.to_ascii_uppercase();
    let timestamp = timestamp.to_string();

    let fields: [&[u8]; 5] = [
        method.as_bytes(),
        path.as_bytes(),
        body,
        key_id.as_bytes(),
        timestamp.as_bytes(),
    ];

    let capacity = fields.iter().map(|f| f.len() + 12).sum();
    let mut out = Vec::with_capacity(capacity);
    for field in fields {
        out.extend_from_slice(field.len().to_string().as_bytes());
        out.push(b':');
        out.extend_from_slice(field);
        out.push(b'\n');
    }
    out
}
