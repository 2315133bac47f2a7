//! Configuration loading, merging and writing tests

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use typesver_config::merge::merge;
use typesver_config::output::{resolve_output_dir, typings_dir_for};
use typesver_config::{
    CompilerConfig, CompilerVersion, ConfigError, EmitMode, FeatureGates, GeneratedOptions,
    Indent, DEFAULT_TYPINGS_PREFIX,
};

fn write_tsconfig(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("tsconfig.json");
    fs::write(&path, content).unwrap();
    path
}

fn version(token: &str) -> CompilerVersion {
    CompilerVersion::parse(token).unwrap()
}

/// Everything the build does to a tsconfig for one version, minus the compiler
fn prepare(base: &CompilerConfig, token: &str, mode: EmitMode) -> CompilerConfig {
    let v = version(token);
    let output_dir = resolve_output_dir(base);
    let typings_dir = typings_dir_for(&v, &output_dir, DEFAULT_TYPINGS_PREFIX);
    let generated = GeneratedOptions::new(base, &output_dir, &typings_dir)
        .with_mode(mode)
        .build();
    let mut merged = merge(base, &generated);
    FeatureGates::default().omit_unsupported_fields(&mut merged, &v);
    merged
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_tsconfig_with_comments() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_tsconfig(
        temp_dir.path(),
        r#"{
    /* project settings */
    "compilerOptions": {
        "outDir": "dist", // compiled output
        "declaration": false,
    },
}"#,
    );

    let (config, indent) = CompilerConfig::load_structured(&path).unwrap();
    assert_eq!(config.option_str("outDir"), Some("dist"));
    assert_eq!(indent, Indent::Spaces(4));
}

#[test]
fn test_load_missing_tsconfig() {
    let temp_dir = TempDir::new().unwrap();
    let err = CompilerConfig::load(&temp_dir.path().join("tsconfig.json")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn test_load_malformed_tsconfig() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_tsconfig(temp_dir.path(), r#"{ "compilerOptions": "#);
    let err = CompilerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_load_non_object_tsconfig() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_tsconfig(temp_dir.path(), "[1, 2]");
    let err = CompilerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

// ============================================================================
// Merge pipeline
// ============================================================================

#[test]
fn test_declaration_build_forces_declarations() {
    let base = CompilerConfig::from_value(json!({
        "extends": "./tsconfig.base.json",
        "compilerOptions": {
            "outDir": "dist",
            "declaration": false,
            "declarationMap": true,
            "target": "es2017"
        },
        "include": ["src"],
        "exclude": ["node_modules"]
    }))
    .unwrap();

    let merged = prepare(&base, "3.1", EmitMode::Declarations);

    assert_eq!(merged.option_bool("declaration"), Some(true));
    assert_eq!(
        merged.option_str("declarationDir"),
        Some("dist/ts-types-versions-3.1")
    );
    assert_eq!(merged.option_bool("noEmit"), Some(false));
    assert_eq!(merged.option_bool("declarationMap"), Some(true));
    assert_eq!(merged.option_str("target"), Some("es2017"));
    assert_eq!(merged.exclude(), vec!["node_modules", "dist"]);
    assert_eq!(
        merged.get_path("extends"),
        Some(&json!("./tsconfig.base.json"))
    );
    assert_eq!(merged.get_path("include"), Some(&json!(["src"])));
}

#[test]
fn test_old_version_loses_declaration_map_after_merge() {
    let base = CompilerConfig::from_value(json!({
        "compilerOptions": {"outFile": "bundle/app.js", "declarationMap": true}
    }))
    .unwrap();

    let merged = prepare(&base, "2.8", EmitMode::Declarations);

    assert_eq!(merged.option("declarationMap"), None);
    assert_eq!(
        merged.option_str("declarationDir"),
        Some("bundle/ts-types-versions-2.8")
    );
    assert_eq!(merged.option_bool("emitDeclarationOnly"), Some(true));
}

#[test]
fn test_generated_field_removed_for_unsupporting_version() {
    let base = CompilerConfig::from_value(json!({"compilerOptions": {}})).unwrap();
    let merged = prepare(&base, "2.7", EmitMode::CheckOnly);
    assert_eq!(merged.option("emitDeclarationOnly"), None);
    assert_eq!(merged.option_bool("declaration"), Some(true));
}

#[test]
fn test_check_only_respects_base_no_emit() {
    let base = CompilerConfig::from_value(json!({"compilerOptions": {"noEmit": true}})).unwrap();
    let merged = prepare(&base, "3.0", EmitMode::CheckOnly);
    assert_eq!(merged.option_bool("noEmit"), Some(true));
    assert_eq!(merged.option_bool("emitDeclarationOnly"), Some(true));
}

#[test]
fn test_merged_config_round_trips_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let base = CompilerConfig::from_value(json!({
        "compilerOptions": {"outDir": "lib", "strict": true}
    }))
    .unwrap();
    let merged = prepare(&base, "3.0", EmitMode::Declarations);

    let path = temp_dir.path().join("tsconfig.3.0.json");
    merged.save(&path, Indent::Tab).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n\t\"compilerOptions\""));
    assert!(text.ends_with("}\n"));

    let reloaded = CompilerConfig::load(&path).unwrap();
    assert_eq!(reloaded, merged);
}
