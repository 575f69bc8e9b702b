use crate::identity::blob_id;
use serde::{Deserialize, Serialize};

/// One unit of uploadable content: a whole file, or a numbered chunk of an
/// oversized file. The `path` of a chunk carries the `#chunk<i>of<n>` suffix
/// and is part of the blob's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub path: String,
    pub content: String,
}

impl Blob {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Content-addressed identifier for this blob.
    #[must_use]
    pub fn id(&self) -> String {
        blob_id(&self.path, &self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::Blob;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_id_matches_free_function() {
        let blob = Blob::new("a.rs", "fn a() {}\n");
        assert_eq!(blob.id(), crate::blob_id("a.rs", "fn a() {}\n"));
    }
}
