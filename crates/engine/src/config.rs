//! Bundling configuration via `xzbundle.toml`
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Values are validated eagerly on load.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use xzbundle_archive::{
    ArchiveOptions, DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL, TAR_XZ_CONTENT_TYPE,
};
use xzbundle_core::ErrorKind;

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "xzbundle.toml";

/// Default maximum keys per bulk delete request
pub const DEFAULT_DELETE_BATCH_SIZE: usize = 1000;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be written
    #[error("Failed to write config file '{path}': {source}")]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config file '{path}': {message}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Compression level out of range
    #[error("compression_level must be 0-{}, got {0}", MAX_COMPRESSION_LEVEL)]
    InvalidCompressionLevel(u32),

    /// Delete batch size of zero
    #[error("delete_batch_size must be at least 1")]
    InvalidDeleteBatchSize,

    /// Empty content type
    #[error("content_type must not be empty")]
    EmptyContentType,
}

impl ConfigError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Read { .. } | Self::Write { .. } => ErrorKind::Io,
            _ => ErrorKind::Config,
        }
    }
}

/// Bundling configuration loaded from `xzbundle.toml`.
///
/// # Example
///
/// ```toml
/// compression_level = 6
/// extreme = false
/// temp_dir = "/var/tmp"
/// delete_batch_size = 1000
/// content_type = "application/tar+xz"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// xz preset level, 0 (fastest) to 9 (smallest)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
    /// Use the xz "extreme" variant of the preset
    #[serde(default)]
    pub extreme: bool,
    /// Directory for the temporary archive; system temp dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    /// Maximum keys per bulk delete request
    #[serde(default = "default_delete_batch_size")]
    pub delete_batch_size: usize,
    /// Content type attached to the uploaded archive
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_compression_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

fn default_delete_batch_size() -> usize {
    DEFAULT_DELETE_BATCH_SIZE
}

fn default_content_type() -> String {
    TAR_XZ_CONTENT_TYPE.to_string()
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            compression_level: default_compression_level(),
            extreme: false,
            temp_dir: None,
            delete_batch_size: default_delete_batch_size(),
            content_type: default_content_type(),
        }
    }
}

impl BundleConfig {
    /// Create config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set compression level
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Builder: set the extreme flag
    pub fn with_extreme(mut self, extreme: bool) -> Self {
        self.extreme = extreme;
        self
    }

    /// Builder: set the temp directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Builder: set delete batch size
    pub fn with_delete_batch_size(mut self, size: usize) -> Self {
        self.delete_batch_size = size;
        self
    }

    /// Builder: set upload content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(ConfigError::InvalidCompressionLevel(self.compression_level));
        }
        if self.delete_batch_size == 0 {
            return Err(ConfigError::InvalidDeleteBatchSize);
        }
        if self.content_type.trim().is_empty() {
            return Err(ConfigError::EmptyContentType);
        }
        Ok(())
    }

    /// The archive pipeline's slice of this config
    pub fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions::new()
            .with_compression_level(self.compression_level)
            .with_extreme(self.extreme)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# xzbundle configuration
#
# xz preset level: 0 (fastest) to 9 (smallest, default).
# Level 9 needs roughly 700 MiB of memory while compressing.
compression_level = 9

# Use the slower "extreme" variant of the preset (default: false)
extreme = false

# Directory for the temporary archive (default: system temp dir).
# It must hold the whole compressed archive.
# temp_dir = "/var/tmp"

# Maximum keys per bulk delete request (default: 1000)
delete_batch_size = 1000

# Content type attached to the uploaded archive
content_type = "application/tar+xz"
"#
    }

    /// Read, parse and validate config from a file path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: BundleConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}
