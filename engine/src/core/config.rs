use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_CAST_WIDTH, DEFAULT_PAGE_SIZE, MAX_CAST_WIDTH, MAX_FILTER_DEPTH,
    MAX_FILTER_JSON_SIZE, PAGINATION_VALUE_LIMIT,
};

// =============================================================================
// File Configuration (JSON)
// =============================================================================

/// Filter section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilterFileConfig {
    pub max_bytes: Option<usize>,
    pub max_depth: Option<usize>,
}

/// Pagination section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaginationFileConfig {
    pub cast_width: Option<u16>,
    pub default_page_size: Option<u64>,
    pub max_page_size: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub filter: Option<FilterFileConfig>,
    pub pagination: Option<PaginationFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Resolved engine limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Largest filter JSON accepted, in bytes
    pub max_filter_bytes: usize,
    /// Deepest filter nesting accepted (root is depth 1)
    pub max_filter_depth: usize,
    /// `n` in `CAST(uid AS CHAR(n))`
    pub cast_width: u16,
    /// Page size when the request does not name one
    pub default_page_size: u64,
    /// Largest page size accepted; never above `u32::MAX`
    pub max_page_size: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_filter_bytes: MAX_FILTER_JSON_SIZE,
            max_filter_depth: MAX_FILTER_DEPTH,
            cast_width: DEFAULT_CAST_WIDTH,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: PAGINATION_VALUE_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Load configuration with priority (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading engine configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                config.warn_unknown_fields();
                config
            }
            None => FileConfig::default(),
        };

        Self::resolve(file_config, cli)
    }

    /// Layer defaults -> file config -> CLI/env overrides, then validate
    pub fn resolve(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let defaults = Self::default();
        let file_filter = file_config.filter.unwrap_or_default();
        let file_pagination = file_config.pagination.unwrap_or_default();

        let config = Self {
            max_filter_bytes: cli
                .max_filter_bytes
                .or(file_filter.max_bytes)
                .unwrap_or(defaults.max_filter_bytes),
            max_filter_depth: cli
                .max_filter_depth
                .or(file_filter.max_depth)
                .unwrap_or(defaults.max_filter_depth),
            cast_width: cli
                .cast_width
                .or(file_pagination.cast_width)
                .unwrap_or(defaults.cast_width),
            default_page_size: cli
                .default_page_size
                .or(file_pagination.default_page_size)
                .unwrap_or(defaults.default_page_size),
            max_page_size: cli
                .max_page_size
                .or(file_pagination.max_page_size)
                .unwrap_or(defaults.max_page_size),
        };

        config.validate()?;
        tracing::debug!(config = ?config, "Engine configuration resolved");
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.max_filter_bytes == 0 {
            anyhow::bail!("Configuration error: filter.max_bytes must be greater than 0");
        }
        if self.max_filter_depth == 0 {
            anyhow::bail!("Configuration error: filter.max_depth must be greater than 0");
        }
        if self.cast_width == 0 || self.cast_width > MAX_CAST_WIDTH {
            anyhow::bail!(
                "Configuration error: pagination.cast_width must be between 1 and {}",
                MAX_CAST_WIDTH
            );
        }
        if self.max_page_size > PAGINATION_VALUE_LIMIT {
            anyhow::bail!(
                "Configuration error: pagination.max_page_size ({}) cannot exceed {}",
                self.max_page_size,
                PAGINATION_VALUE_LIMIT
            );
        }
        if self.default_page_size > self.max_page_size {
            anyhow::bail!(
                "Configuration error: pagination.default_page_size ({}) cannot exceed pagination.max_page_size ({})",
                self.default_page_size,
                self.max_page_size
            );
        }
        Ok(())
    }
}
