//! TypeScript Declarations
//!
//! Renders the module augmentation that declares the route map on the
//! TypeScript side (`tinvoke.d.ts`). With an empty manifest this is the bare
//! augmentation stub that downstream packages merge their own routes into.
//!
//! Type names come from `ts-rs`: every response and argument shape in a
//! manifest implements [`TS`]. Named types referenced by a route are imported
//! from the bindings [`export_types`] writes next to the declaration file.

use crate::error::InvokeError;
use crate::registry::{RouteInfo, RouteManifest};
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use ts_rs::{ExportError, TypeVisitor, TS};

/// A named TypeScript binding referenced by a route.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeImport {
    pub ident: String,
    /// Binding file relative to the output directory.
    pub path: PathBuf,
}

impl TypeImport {
    /// Module specifier relative to the declaration file.
    pub fn specifier(&self) -> String {
        let stem = self.path.with_extension("");
        format!("./{}", stem.to_string_lossy().replace('\\', "/"))
    }
}

/// TypeScript side of one Rust type.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Name as written inside `RouteDefinition<..>`.
    pub name: String,
    pub imports: Vec<TypeImport>,
    export: fn(&Path) -> Result<(), ExportError>,
}

impl TypeDecl {
    pub fn of<T: TS + 'static>() -> Self {
        let mut imports = ImportCollector::default();
        imports.visit::<T>();
        let mut imports = imports.0;
        imports.sort();
        imports.dedup();

        Self {
            name: ts_name::<T>(),
            imports,
            export: export_bindings::<T>,
        }
    }

    /// Write the bindings for this type and everything it references.
    pub fn export_to(&self, dir: &Path) -> Result<(), ExportError> {
        (self.export)(dir)
    }
}

/// `()` is a valid response in Rust and `void` on the TypeScript side.
fn ts_name<T: TS + 'static>() -> String {
    if TypeId::of::<T>() == TypeId::of::<()>() {
        "void".to_string()
    } else {
        T::name()
    }
}

#[derive(Default)]
struct ImportCollector(Vec<TypeImport>);

impl TypeVisitor for ImportCollector {
    fn visit<T: TS + 'static + ?Sized>(&mut self) {
        if let Some(path) = T::output_path() {
            self.0.push(TypeImport {
                ident: T::ident(),
                path: path.to_path_buf(),
            });
        }
        T::visit_generics(self);
    }
}

struct Exporter<'a> {
    dir: &'a Path,
    result: Result<(), ExportError>,
}

impl TypeVisitor for Exporter<'_> {
    fn visit<T: TS + 'static + ?Sized>(&mut self) {
        if self.result.is_err() {
            return;
        }
        if T::output_path().is_some() {
            self.result = T::export_all_to(self.dir);
        }
        T::visit_generics(self);
    }
}

fn export_bindings<T: TS + 'static>(dir: &Path) -> Result<(), ExportError> {
    let mut exporter = Exporter { dir, result: Ok(()) };
    exporter.visit::<T>();
    exporter.result
}

/// Declaration output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationConfig {
    /// Directory the declaration file is written to
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Module being augmented
    #[serde(default = "default_module_name")]
    pub module_name: String,

    /// Interface holding the routes
    #[serde(default = "default_interface_name")]
    pub interface_name: String,

    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("generated-types")
}

fn default_module_name() -> String {
    "tinvoke".to_string()
}

fn default_interface_name() -> String {
    "RouteMap".to_string()
}

fn default_file_name() -> String {
    "tinvoke.d.ts".to_string()
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            module_name: default_module_name(),
            interface_name: default_interface_name(),
            file_name: default_file_name(),
        }
    }
}

impl DeclarationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.module_name.trim().is_empty() {
            return Err("Module name cannot be empty".to_string());
        }
        if !is_identifier(&self.interface_name) {
            return Err(format!(
                "Interface name '{}' is not a valid identifier",
                self.interface_name
            ));
        }
        if self.file_name.trim().is_empty() || self.file_name.contains(['/', '\\']) {
            return Err(format!("Invalid declaration file name '{}'", self.file_name));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Render the declaration file contents.
pub fn render(manifest: &RouteManifest, config: &DeclarationConfig) -> String {
    let mut out = String::from("export {};\n\n");

    let imports = imports(manifest);
    for import in &imports {
        let _ = writeln!(
            out,
            "import type {{ {} }} from \"{}\";",
            import.ident,
            import.specifier()
        );
    }
    if !imports.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(out, "declare module \"{}\" {{", config.module_name);

    if manifest.is_empty() {
        let _ = writeln!(out, "  export interface {} {{}}", config.interface_name);
    } else {
        let _ = writeln!(out, "  export interface {} {{", config.interface_name);
        for route in manifest.routes() {
            let _ = writeln!(out, "    {}: {};", property_name(route.name), definition(route));
        }
        out.push_str("  }\n");
    }

    out.push_str("}\n");
    out
}

/// Write the declaration file into `dir`, creating it if needed.
pub fn write(
    dir: &Path,
    manifest: &RouteManifest,
    config: &DeclarationConfig,
) -> Result<PathBuf, InvokeError> {
    config.validate().map_err(InvokeError::Config)?;
    std::fs::create_dir_all(dir)?;

    let path = dir.join(&config.file_name);
    std::fs::write(&path, render(manifest, config))?;

    info!(path = %path.display(), routes = manifest.len(), "Wrote route declarations");
    Ok(path)
}

/// Write the bindings of every type the manifest references into `dir`.
pub fn export_types(dir: &Path, manifest: &RouteManifest) -> Result<(), InvokeError> {
    std::fs::create_dir_all(dir)?;
    for route in manifest.routes() {
        debug!(command = route.name, "Exporting type bindings");
        route.response.export_to(dir)?;
        if let Some(args) = &route.args {
            args.export_to(dir)?;
        }
    }
    Ok(())
}

/// Export the bindings, then write the declaration file that imports them.
pub fn generate(
    dir: &Path,
    manifest: &RouteManifest,
    config: &DeclarationConfig,
) -> Result<PathBuf, InvokeError> {
    config.validate().map_err(InvokeError::Config)?;
    export_types(dir, manifest)?;
    write(dir, manifest, config)
}

fn imports(manifest: &RouteManifest) -> Vec<TypeImport> {
    let mut imports: Vec<TypeImport> = manifest
        .routes()
        .iter()
        .flat_map(|route| {
            let args = route.args.iter().flat_map(|args| args.imports.iter());
            route.response.imports.iter().chain(args)
        })
        .cloned()
        .collect();
    imports.sort();
    imports.dedup_by(|a, b| a.ident == b.ident);
    imports
}

fn definition(route: &RouteInfo) -> String {
    match &route.args {
        Some(args) => format!("RouteDefinition<{}, {}>", route.response.name, args.name),
        None => format!("RouteDefinition<{}>", route.response.name),
    }
}

fn property_name(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("{:?}", name)
    }
}
