//! Configuration file loading for review-squad
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./review-squad.toml` or `./.review-squad.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/review-squad/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileCatalogConfig, FileClassifierConfig, FileConfig, FileExecutionConfig, FileLoggingConfig,
    FileOutputConfig, FilePerformanceConfig, FilePermissionConfig, FileSelectionConfig,
    FileStateConfig, FileWatcherConfig,
};
pub use loader::{ConfigError, ConfigLoader};
