//! Configuration file loading for halcyon
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. Explicitly specified file
//! 2. Project root: `./halcyon.toml` or `./.halcyon.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/halcyon/config.toml`
//! 4. Fallback: `~/.config/halcyon/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDialogueConfig, FileLoggingConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
