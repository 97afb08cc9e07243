//! CLI route: single route table and run context.

use crate::cli::output::{format_invocation_json, format_invocation_text};
use crate::cli::parse::Commands;
use crate::config::{ConfigLoader, TinvokeConfig};
use crate::declaration;
use crate::dispatch::{resolve, Slot};
use crate::error::InvokeError;
use crate::registry::RouteManifest;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: TinvokeConfig,
    manifest: RouteManifest,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, InvokeError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };

        config.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            InvokeError::Config(format!("Configuration validation failed:\n{}", msgs.join("\n")))
        })?;

        Ok(Self {
            workspace_root,
            config,
            manifest: RouteManifest::new(),
        })
    }

    /// Use a route manifest for `declare`. Defaults to empty, which emits the
    /// augmentation stub and no type bindings.
    pub fn with_manifest(mut self, manifest: RouteManifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &TinvokeConfig {
        &self.config
    }

    /// Execute one command and return its printable output.
    pub fn execute(&self, command: &Commands) -> Result<String, InvokeError> {
        match command {
            Commands::Explain {
                command,
                values,
                format,
            } => self.explain(command, values, format),
            Commands::Declare {
                out_dir,
                module_name,
            } => self.declare(out_dir.as_deref(), module_name.as_deref()),
        }
    }

    fn explain(
        &self,
        command: &str,
        values: &[String],
        format: &str,
    ) -> Result<String, InvokeError> {
        let slots = parse_slots(values)?;
        let arity = slots.len();
        debug!(command, arity, "Explaining call shape");

        let invocation = resolve(command, slots);
        match format {
            "json" => Ok(format_invocation_json(&invocation, arity)),
            "text" => Ok(format_invocation_text(&invocation, arity)),
            other => Err(InvokeError::Config(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }

    fn declare(
        &self,
        out_dir: Option<&Path>,
        module_name: Option<&str>,
    ) -> Result<String, InvokeError> {
        let mut settings = self.config.declaration.clone();
        if let Some(name) = module_name {
            settings.module_name = name.to_string();
        }

        let dir = match out_dir {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => self.workspace_root.join(dir),
            None => self.config.declaration_dir(&self.workspace_root),
        };

        let path = declaration::generate(&dir, &self.manifest, &settings)?;
        info!(path = %path.display(), "Declarations written");
        Ok(format!(
            "Wrote {} route declaration(s) to {}",
            self.manifest.len(),
            path.display()
        ))
    }
}

/// Parse positional CLI values as JSON documents.
fn parse_slots(values: &[String]) -> Result<Vec<Slot>, InvokeError> {
    values
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            serde_json::from_str::<Value>(raw)
                .map(Slot::Json)
                .map_err(|source| InvokeError::InvalidValue {
                    position: i + 1,
                    source,
                })
        })
        .collect()
}
