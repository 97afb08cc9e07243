//! Integration tests for the configuration system

use super::test_utils::with_xdg_env;
use std::path::PathBuf;
use tempfile::TempDir;
use tinvoke::config::{ConfigLoader, TinvokeConfig};

#[test]
fn test_global_config_under_xdg_config_home() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let path = ConfigLoader::global_config_path().unwrap();
        assert_eq!(
            path,
            temp_dir.path().join("config").join("tinvoke").join("config.toml")
        );
    });
}

#[test]
fn test_layers_merge_by_key() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let global = ConfigLoader::global_config_path().unwrap();
        std::fs::create_dir_all(global.parent().unwrap()).unwrap();
        std::fs::write(
            &global,
            r#"
[logging]
level = "warn"
format = "json"

[declaration]
module_name = "@org/ipc"
"#,
        )
        .unwrap();

        let workspace = temp_dir.path().join("ws");
        std::fs::create_dir_all(&workspace).unwrap();
        std::fs::write(
            workspace.join("tinvoke.toml"),
            "[logging]\nlevel = \"debug\"\n\n[declaration]\nout_dir = \"src/types\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.declaration.module_name, "@org/ipc");
        assert_eq!(config.declaration.out_dir, PathBuf::from("src/types"));
        assert_eq!(
            config.declaration_dir(&workspace),
            workspace.join("src/types")
        );
    });
}

#[test]
fn test_no_files_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let workspace = temp_dir.path().join("empty");
        std::fs::create_dir_all(&workspace).unwrap();
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config, TinvokeConfig::default());
    });
}

#[test]
fn test_malformed_workspace_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let workspace = temp_dir.path().join("ws");
        std::fs::create_dir_all(&workspace).unwrap();
        std::fs::write(workspace.join("tinvoke.toml"), "[logging\nlevel = ").unwrap();
        assert!(ConfigLoader::load(&workspace).is_err());
    });
}
