#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration for the Easel editor core.
//!
//! # Usage
//!
//! ```rust,no_run
//! use easel_config::Config;
//!
//! let resolved = Config::load(Some(std::path::Path::new("."))).unwrap();
//! println!("fit ratio: {}", resolved.config.viewport.fit_ratio);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Project** (`{project}/.easel/config.toml`)
//! 2. **User** (`~/.easel/config.toml`)
//! 3. **Environment variables** (`EASEL_LOG_LEVEL`, `EASEL_LOG_FORMAT`),
//!    fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! This crate depends on no other easel crate. The editor converts these
//! types into its own settings at startup.

/// Environment variable fallbacks.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered merging with source tracking.
pub mod merge;
/// Resolved configuration display.
pub mod show;
/// Configuration struct definitions.
pub mod types;
/// Validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use merge::{ConfigLayer, FieldSources};
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a config file is malformed or the final
    /// configuration fails validation.
    pub fn load(project_root: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(project_root, None)
    }

    /// Load configuration with an explicit home directory.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_with_home(
        project_root: Option<&std::path::Path>,
        home_dir: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(project_root, Some(home_dir))
    }

    /// Load configuration from a single file (no layering).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
