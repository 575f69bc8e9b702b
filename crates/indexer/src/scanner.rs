use crate::error::{IndexerError, Result};
use crate::ignore_rules::{ExcludeMatcher, IgnoreSpec};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Default recursion bound for a scan.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Scan tuning knobs.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directories deeper than this are not descended into.
    pub max_depth: usize,
    /// Extensions (without the dot) a file must carry to be indexed.
    /// Empty means every file qualifies.
    pub allowed_extensions: Vec<String>,
    /// Globs matched against scan-relative paths and single path segments;
    /// a hit excludes the entry independently of the ignore rules.
    pub exclude_patterns: Vec<String>,
    pub follow_symlinks: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allowed_extensions: Vec::new(),
            exclude_patterns: Vec::new(),
            follow_symlinks: false,
        }
    }
}

/// One scan candidate: slash-separated path relative to the scan root plus
/// decoded file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub relative_path: String,
    pub content: String,
}

/// Walks a project tree and collects the files worth indexing.
///
/// Unreadable or non-UTF-8 files are logged and skipped; only a bad scan
/// root fails the whole scan.
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, options: ScanOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    /// Scan the tree depth-first in deterministic name order.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.exists() {
            return Err(IndexerError::PathNotFound(self.root.display().to_string()));
        }
        if !self.root.is_dir() {
            return Err(IndexerError::NotADirectory(self.root.display().to_string()));
        }
        let canonical_root = self
            .root
            .canonicalize()
            .map_err(|_| IndexerError::PathNotFound(self.root.display().to_string()))?;

        let ignore = IgnoreSpec::resolve(&self.root);
        let exclude = ExcludeMatcher::new(&self.options.exclude_patterns)?;

        let walker = WalkDir::new(&self.root)
            .max_depth(self.options.max_depth)
            .follow_links(self.options.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.should_visit(entry, &ignore, &exclude));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.has_allowed_extension(path) {
                continue;
            }

            // Symlinks may point anywhere; only content that really lives
            // under the root belongs to the project.
            match path.canonicalize() {
                Ok(resolved) if resolved.starts_with(&canonical_root) => {}
                Ok(_) => {
                    log::warn!(
                        "Skipping {} (resolves outside the project root)",
                        path.display()
                    );
                    continue;
                }
                Err(err) => {
                    log::warn!("Skipping {} (cannot resolve: {err})", path.display());
                    continue;
                }
            }

            let content = match read_utf8(path) {
                Some(content) => content,
                None => continue,
            };

            files.push(ScannedFile {
                relative_path: self.relative_path(path),
                content,
            });
        }

        log::debug!("Scanned {} files under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn should_visit(&self, entry: &DirEntry, ignore: &IgnoreSpec, exclude: &ExcludeMatcher) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        let path = entry.path();
        let is_dir = entry.file_type().is_dir();
        if ignore.is_ignored(path, is_dir) {
            log::debug!("Ignored: {}", path.display());
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if exclude.is_excluded(relative) {
            log::debug!("Excluded: {}", path.display());
            return false;
        }

        true
    }

    fn has_allowed_extension(&self, path: &Path) -> bool {
        if self.options.allowed_extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.options
                    .allowed_extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut normalized = relative.to_string_lossy().to_string();
        if normalized.contains('\\') {
            normalized = normalized.replace('\\', "/");
        }
        normalized
    }
}

fn read_utf8(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("Skipping {} (read failed: {err})", path.display());
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(content) => Some(content),
        Err(_) => {
            log::warn!("Skipping {} (not valid UTF-8)", path.display());
            None
        }
    }
}
