//! Declaration file emission.

use super::test_utils::*;
use tempfile::TempDir;
use tinvoke::declaration::{self, DeclarationConfig};
use tinvoke::{InvokeError, RouteManifest};

#[test]
fn test_stub_written_to_fresh_directory() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("generated-types");

    let path = declaration::write(&out_dir, &RouteManifest::new(), &DeclarationConfig::default())
        .unwrap();
    assert_eq!(path, out_dir.join("tinvoke.d.ts"));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("export {};\n"));
    assert!(contents.contains("export interface RouteMap {}"));
}

#[test]
fn test_manifest_routes_rendered_in_registration_order() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = RouteManifest::new()
        .with::<GetUser>()
        .unwrap()
        .with::<DeleteItem>()
        .unwrap()
        .with::<UpdateSettings>()
        .unwrap();

    let path =
        declaration::write(temp_dir.path(), &manifest, &DeclarationConfig::default()).unwrap();
    let contents = std::fs::read_to_string(path).unwrap();

    let get_user = contents.find("get_user: RouteDefinition<User>;").unwrap();
    let delete_item = contents
        .find("delete_item: RouteDefinition<boolean, DeleteItemArgs>;")
        .unwrap();
    let update = contents
        .find("update_settings: RouteDefinition<void, UpdateSettingsArgs>;")
        .unwrap();
    assert!(get_user < delete_item && delete_item < update);
}

#[test]
fn test_rewrite_is_stable() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = RouteManifest::new().with::<ListFiles>().unwrap();
    let config = DeclarationConfig::default();

    let path = declaration::write(temp_dir.path(), &manifest, &config).unwrap();
    let first = std::fs::read(&path).unwrap();
    declaration::write(temp_dir.path(), &manifest, &config).unwrap();
    assert_eq!(first, std::fs::read(&path).unwrap());
}

#[test]
fn test_existing_files_in_output_dir_are_kept() {
    let temp_dir = TempDir::new().unwrap();
    let sibling = temp_dir.path().join("bindings.ts");
    std::fs::write(&sibling, "export type User = {};\n").unwrap();

    declaration::write(temp_dir.path(), &RouteManifest::new(), &DeclarationConfig::default())
        .unwrap();
    assert!(sibling.exists());
}

#[test]
fn test_generate_writes_bindings_and_imports() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("generated-types");
    let manifest = RouteManifest::new()
        .with::<GetUser>()
        .unwrap()
        .with::<DeleteItem>()
        .unwrap()
        .with::<ListFiles>()
        .unwrap();

    let path = declaration::generate(&out_dir, &manifest, &DeclarationConfig::default()).unwrap();
    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.contains("import type { DeleteItemArgs } from \"./DeleteItemArgs\";"));
    assert!(contents.contains("import type { User } from \"./User\";"));
    assert!(contents.contains("list_files: RouteDefinition<Array<string>>;"));

    let user = std::fs::read_to_string(out_dir.join("User.ts")).unwrap();
    assert!(user.contains("export type User"));
    let args = std::fs::read_to_string(out_dir.join("DeleteItemArgs.ts")).unwrap();
    assert!(args.contains("itemId: bigint"));
}

#[test]
fn test_duplicate_routes_rejected() {
    let err = RouteManifest::new()
        .with::<GetUser>()
        .unwrap()
        .with::<GetUser>()
        .unwrap_err();
    assert!(matches!(err, InvokeError::DuplicateRoute(name) if name == "get_user"));
}

#[test]
fn test_invalid_settings_not_written() {
    let temp_dir = TempDir::new().unwrap();
    let config = DeclarationConfig {
        file_name: String::new(),
        ..Default::default()
    };
    let err = declaration::write(temp_dir.path(), &RouteManifest::new(), &config).unwrap_err();
    assert!(matches!(err, InvokeError::Config(_)));
}
