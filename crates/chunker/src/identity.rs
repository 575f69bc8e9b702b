use sha2::{Digest, Sha256};

/// Derive the content-addressed identifier for a (path, content) pair.
///
/// The digest covers the path bytes followed by the content bytes, so equal
/// content at two different paths yields two distinct ids. Filesystem
/// metadata never participates; the id is stable across runs and machines,
/// which is what makes the remote index deduplicable.
#[must_use]
pub fn blob_id(path: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
