//! Configuration for filebacked collections
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Configuration shared by every collection type
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Scratch File Configuration
    // -------------------------------------------------------------------------
    /// Directory that receives scratch files.
    /// `None` uses the OS temporary directory.
    pub scratch_dir: Option<PathBuf>,

    /// File name prefix of every scratch file
    pub file_prefix: String,

    /// File name suffix of every scratch file
    pub file_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            file_prefix: "filebackedcollection".to_string(),
            file_suffix: ".bin".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Place scratch files in `path` instead of the OS temp directory
    pub fn scratch_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.scratch_dir = Some(path.into());
        self
    }

    /// Set the scratch file name prefix
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    /// Set the scratch file name suffix
    pub fn file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.file_suffix = suffix.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
