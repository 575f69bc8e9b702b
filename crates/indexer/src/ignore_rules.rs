use crate::error::{IndexerError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

const IGNORE_FILE_NAME: &str = ".gitignore";

/// Compiled ignore rules plus the directory their patterns are relative to.
///
/// The ignore root is the directory containing the rule file, which may sit
/// above the scan root. Matching has to stay relative to the ignore root:
/// a rule like `sub/build/` written at the repository top level only lines
/// up with real paths when they are relativized against that top level.
pub struct IgnoreSpec {
    matcher: Gitignore,
    ignore_root: PathBuf,
}

impl IgnoreSpec {
    /// Find the nearest ignore file at or above `scan_root` and compile it.
    /// With no ignore file anywhere up the tree, only the built-in rule for
    /// version-control metadata applies and the ignore root is the scan
    /// root itself.
    pub fn resolve(scan_root: &Path) -> Self {
        match find_ignore_file(scan_root) {
            Some(ignore_file) => {
                let ignore_root = ignore_file
                    .parent()
                    .unwrap_or(scan_root)
                    .to_path_buf();
                log::debug!(
                    "Using ignore rules from {} (root {})",
                    ignore_file.display(),
                    ignore_root.display()
                );
                let matcher = compile(&ignore_root, Some(&ignore_file));
                Self {
                    matcher,
                    ignore_root,
                }
            }
            None => Self {
                matcher: compile(scan_root, None),
                ignore_root: scan_root.to_path_buf(),
            },
        }
    }

    /// Whether `absolute_path` is excluded by the compiled rules. A parent
    /// directory matching is enough to exclude everything beneath it.
    pub fn is_ignored(&self, absolute_path: &Path, is_dir: bool) -> bool {
        self.matcher
            .matched_path_or_any_parents(absolute_path, is_dir)
            .is_ignore()
    }

    #[must_use]
    pub fn ignore_root(&self) -> &Path {
        &self.ignore_root
    }
}

fn find_ignore_file(scan_root: &Path) -> Option<PathBuf> {
    let mut dir = Some(scan_root);
    while let Some(current) = dir {
        let candidate = current.join(IGNORE_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

fn compile(ignore_root: &Path, ignore_file: Option<&Path>) -> Gitignore {
    let mut builder = GitignoreBuilder::new(ignore_root);
    if let Some(file) = ignore_file {
        if let Some(err) = builder.add(file) {
            log::warn!("Failed to read {}: {err}", file.display());
        }
    }
    // Version-control metadata is never indexable.
    if let Err(err) = builder.add_line(None, ".git/") {
        log::warn!("Failed to add built-in ignore rule: {err}");
    }

    builder.build().unwrap_or_else(|err| {
        log::warn!("Failed to compile ignore rules: {err}");
        Gitignore::empty()
    })
}

/// Caller-supplied exclusion globs, evaluated independently of the ignore
/// file. A glob counts as a hit when it matches the path relative to the
/// scan root or any single segment of it, so `node_modules` excludes the
/// directory wherever it appears.
pub struct ExcludeMatcher {
    set: GlobSet,
}

impl ExcludeMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|err| IndexerError::InvalidPattern(format!("{pattern}: {err}")))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|err| IndexerError::InvalidPattern(err.to_string()))?;
        Ok(Self { set })
    }

    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        if self.set.is_empty() {
            return false;
        }
        if self.set.is_match(relative_path) {
            return true;
        }
        relative_path
            .iter()
            .any(|segment| self.set.is_match(Path::new(segment)))
    }
}
