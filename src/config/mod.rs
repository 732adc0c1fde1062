//! Configuration merge system
//!
//! Four layers, later wins:
//! 1. Built-in defaults
//! 2. Host/user config (~/.config/livedoc/config.toml)
//! 3. Repo config (livedoc.toml)
//! 4. CLI flags

mod build;
mod defaults;
mod effective;
mod merge;

use std::path::PathBuf;

pub use build::BuildConfig;
pub use defaults::BuiltinDefaults;
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{deep_merge, merge_layers};

/// Repo config file name, relative to the working directory
pub const REPO_CONFIG_FILE: &str = "livedoc.toml";

/// `~/.config/livedoc/config.toml`, if HOME is set
pub fn host_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/livedoc/config.toml"))
}
