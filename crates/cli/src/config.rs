use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uplink_backend::{BackendConfig, RetryPolicy};
use uplink_chunker::{ChunkerConfig, DEFAULT_MAX_LINES_PER_CHUNK};
use uplink_indexer::{IndexerConfig, ScanOptions, DEFAULT_MAX_DEPTH};

/// Consulted for the API token when the config file does not carry one.
pub const API_TOKEN_ENV: &str = "UPLINK_API_TOKEN";

/// On-disk configuration, deserialized from TOML.
///
/// Every field has a default, so a file only needs to name what it changes.
/// `base_url` and the API token are validated when a command actually talks
/// to the backend; local commands run without them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UplinkConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub batch_size: usize,
    pub max_lines_per_chunk: usize,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub max_depth: usize,
    pub follow_symlinks: bool,
    pub allowed_extensions: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub store_path: Option<PathBuf>,
}

impl Default for UplinkConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: None,
            batch_size: 64,
            max_lines_per_chunk: DEFAULT_MAX_LINES_PER_CHUNK,
            max_attempts: 3,
            base_delay_ms: 500,
            request_timeout_secs: 30,
            max_depth: DEFAULT_MAX_DEPTH,
            follow_symlinks: false,
            allowed_extensions: default_extensions(),
            exclude_patterns: default_excludes(),
            store_path: None,
        }
    }
}

impl UplinkConfig {
    /// Load from an explicit path, or from the per-user default location.
    ///
    /// An explicit path must exist; the default location is allowed to be
    /// absent, in which case built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(explicit) => Self::from_file(explicit),
            None => {
                let fallback = default_config_path()?;
                if fallback.is_file() {
                    Self::from_file(&fallback)
                } else {
                    log::debug!("No config file at {}, using defaults", fallback.display());
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Token from the config file, or from [`API_TOKEN_ENV`].
    pub fn api_token(&self) -> Result<String> {
        if let Some(token) = &self.api_token {
            return Ok(token.clone());
        }
        match std::env::var(API_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => bail!(
                "no API token configured; set api_token in the config file or export {API_TOKEN_ENV}"
            ),
        }
    }

    pub fn require_base_url(&self) -> Result<&str> {
        if self.base_url.trim().is_empty() {
            bail!("no base_url configured; set base_url in the config file");
        }
        Ok(&self.base_url)
    }

    /// Where the membership file lives.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        let base = dirs::data_dir().context("could not determine the user data directory")?;
        Ok(base.join("context-uplink").join("index.json"))
    }

    pub fn backend_config(&self) -> Result<BackendConfig> {
        Ok(BackendConfig {
            base_url: self.require_base_url()?.to_string(),
            api_token: self.api_token()?,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
        }
    }

    pub fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig {
            chunker: ChunkerConfig::with_max_lines(self.max_lines_per_chunk),
            scan: ScanOptions {
                max_depth: self.max_depth,
                allowed_extensions: self.allowed_extensions.clone(),
                exclude_patterns: self.exclude_patterns.clone(),
                follow_symlinks: self.follow_symlinks,
            },
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("could not determine the user config directory")?;
    Ok(base.join("context-uplink").join("config.toml"))
}

fn default_extensions() -> Vec<String> {
    [
        "rs", "ts", "tsx", "js", "jsx", "py", "go", "java", "c", "h", "cpp", "hpp", "cs", "rb",
        "swift", "kt", "md", "toml", "json", "yaml", "yml",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

fn default_excludes() -> Vec<String> {
    [
        ".git",
        "node_modules",
        "target",
        "dist",
        "build",
        "out",
        ".venv",
        "__pycache__",
        "coverage",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}
