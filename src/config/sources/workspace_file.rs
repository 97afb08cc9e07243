//! Workspace config file source: tinvoke.toml and tinvoke.{env}.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;
use tracing::debug;

/// Environment variable selecting the environment-specific workspace file.
pub const ENV_VAR: &str = "TINVOKE_ENV";

/// Add workspace config files to the builder.
/// Precedence: tinvoke.toml (base) then tinvoke.{TINVOKE_ENV}.toml.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let base = workspace_root.join("tinvoke.toml");
    if base.exists() {
        debug!(config_path = %base.display(), "Loading workspace configuration");
        builder = builder.add_source(File::from(base.as_path()).required(false));
    }

    if let Ok(env_name) = std::env::var(ENV_VAR) {
        let env_file = workspace_root.join(format!("tinvoke.{}.toml", env_name));
        if env_file.exists() {
            debug!(
                config_path = %env_file.display(),
                env = %env_name,
                "Loading environment configuration"
            );
            builder = builder.add_source(File::from(env_file.as_path()).required(false));
        }
    }

    Ok(builder)
}
