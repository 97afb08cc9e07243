//! Configuration System
//!
//! Layered configuration for the `tinvoke` tool: built-in defaults, the global
//! config file, workspace files, then `TINVOKE__SECTION__KEY` environment
//! overrides. Tests included.

use crate::declaration::DeclarationConfig;
use crate::logging::LoggingConfig;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TinvokeConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Declaration output
    #[serde(default)]
    pub declaration: DeclarationConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Logging(String),
    Declaration(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
            ValidationError::Declaration(msg) => write!(f, "Declaration: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TinvokeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }
        if let Err(e) = self.declaration.validate() {
            errors.push(ValidationError::Declaration(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Declaration output directory, resolved against the workspace root.
    pub fn declaration_dir(&self, workspace_root: &Path) -> PathBuf {
        if self.declaration.out_dir.is_absolute() {
            self.declaration.out_dir.clone()
        } else {
            workspace_root.join(&self.declaration.out_dir)
        }
    }
}

/// Loads [`TinvokeConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    pub fn load(workspace_root: &Path) -> Result<TinvokeConfig, ConfigError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::environment::add_to_builder(builder);

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a single file, on top of the defaults only.
    pub fn load_from_file(path: &Path) -> Result<TinvokeConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        merge::builder_with_defaults()?
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()
    }

    /// Path of the global config file, if a home directory is known.
    pub fn global_config_path() -> Option<PathBuf> {
        global_config_path()
    }

    /// Built-in defaults.
    pub fn default() -> TinvokeConfig {
        TinvokeConfig::default()
    }
}
