//! Environment source: TINVOKE__SECTION__KEY

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("TINVOKE")
            .prefix_separator("__")
            .separator("__"),
    )
}
