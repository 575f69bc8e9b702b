//! # Uplink Chunker
//!
//! Content chunking and blob identity for the upload pipeline.
//!
//! Files are uploaded as blobs: a small file becomes one blob, an oversized
//! file is split into line-aligned chunks that each become a blob of their
//! own. Every blob is addressed by a deterministic content hash, which is
//! what makes re-uploads skippable across runs and machines.
//!
//! ## Example
//!
//! ```
//! use uplink_chunker::{blob_id, split_into_blobs, ChunkerConfig};
//!
//! let config = ChunkerConfig::default();
//! let blobs = split_into_blobs("src/main.rs", "fn main() {}\n", &config);
//! assert_eq!(blobs.len(), 1);
//!
//! let id = blob_id(&blobs[0].path, &blobs[0].content);
//! assert_eq!(id.len(), 64);
//! ```

mod blob;
mod chunker;
mod identity;

pub use blob::Blob;
pub use chunker::{split_into_blobs, ChunkerConfig, DEFAULT_MAX_LINES_PER_CHUNK};
pub use identity::blob_id;
