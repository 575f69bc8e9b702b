use crate::blob::Blob;

/// Default line budget per chunk.
pub const DEFAULT_MAX_LINES_PER_CHUNK: usize = 800;

/// Chunking configuration
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Maximum number of lines a single blob may carry. Files longer than
    /// this are split into `ceil(lines / max)` numbered chunks.
    pub max_lines_per_chunk: usize,
}

impl ChunkerConfig {
    #[must_use]
    pub fn with_max_lines(max_lines_per_chunk: usize) -> Self {
        Self {
            max_lines_per_chunk,
        }
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_lines_per_chunk: DEFAULT_MAX_LINES_PER_CHUNK,
        }
    }
}

/// Split file content into one blob per chunk.
///
/// A file within the line budget yields exactly one blob with the original
/// path and content. A longer file is partitioned into contiguous line
/// groups; chunk `i` of `n` gets the path `<path>#chunk<i>of<n>` (1-indexed).
/// Line terminators stay attached to their line, so concatenating the
/// returned contents in order reproduces the input byte-for-byte.
///
/// `#chunk` inside a real filename collides with this naming scheme; that is
/// a known limitation, not detected here.
#[must_use]
pub fn split_into_blobs(path: &str, content: &str, config: &ChunkerConfig) -> Vec<Blob> {
    let max_lines = config.max_lines_per_chunk.max(1);
    let lines = split_lines_keep_ends(content);

    if lines.len() <= max_lines {
        return vec![Blob::new(path, content)];
    }

    let total = lines.len().div_ceil(max_lines);
    lines
        .chunks(max_lines)
        .enumerate()
        .map(|(index, group)| {
            let chunk_path = format!("{path}#chunk{}of{total}", index + 1);
            Blob::new(chunk_path, group.concat())
        })
        .collect()
}

/// Split on `\n`, `\r\n`, and bare `\r`, keeping each terminator attached to
/// the line it ends. The terminators are ASCII, so the byte offsets used
/// here are always valid char boundaries.
fn split_lines_keep_ends(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..=i]);
                start = i + 1;
                i += 1;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') {
                    i + 1
                } else {
                    i
                };
                lines.push(&content[start..=end]);
                start = end + 1;
                i = end + 1;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        lines.push(&content[start..]);
    }

    lines
}
