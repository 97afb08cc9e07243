//! Merge rules: built-in defaults and override order.
//!
//! Sources are layered lowest first: defaults, global file, workspace files,
//! environment. Later sources replace individual keys, not whole sections.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?
        .set_default("declaration.out_dir", "generated-types")?
        .set_default("declaration.module_name", "tinvoke")?
        .set_default("declaration.file_name", "tinvoke.d.ts")
}
