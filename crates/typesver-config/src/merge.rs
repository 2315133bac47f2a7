//! Strategy-driven configuration merging
//!
//! A [`MergeOverride`] pairs a generated configuration fragment with a table
//! mapping dotted field paths to a [`MergeStrategy`]. [`merge`] walks base and
//! override together and consults the table at every path:
//!
//! - `Replace`: the override value wins outright
//! - `Union`: arrays are concatenated, keeping the first copy of duplicates
//! - `DeepMerge`: objects are merged key by key
//!
//! Paths without an entry fall back to `Union` for arrays, `DeepMerge` for
//! objects and override-wins for scalars.

use crate::config::{options, CompilerConfig, COMPILER_OPTIONS, EXCLUDE};
use crate::output;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// How a single field is combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    Replace,
    Union,
    DeepMerge,
}

/// Generated configuration fragment plus its per-field strategies
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOverride {
    value: Map<String, Value>,
    strategies: BTreeMap<String, MergeStrategy>,
}

impl MergeOverride {
    pub fn new() -> Self {
        Self {
            value: Map::new(),
            strategies: BTreeMap::new(),
        }
    }

    /// Set a field at a dotted path, recording its strategy
    pub fn set(mut self, path: &str, value: Value, strategy: MergeStrategy) -> Self {
        insert_path(&mut self.value, path, value);
        self.strategies.insert(path.to_string(), strategy);
        self
    }

    /// Set a field that must always win over the base configuration
    pub fn replace(self, path: &str, value: Value) -> Self {
        self.set(path, value, MergeStrategy::Replace)
    }

    pub fn strategy(&self, path: &str) -> Option<MergeStrategy> {
        self.strategies.get(path).copied()
    }

    /// Paths declared with the `Replace` strategy
    pub fn replaced_paths(&self) -> impl Iterator<Item = &str> {
        self.strategies
            .iter()
            .filter(|(_, s)| **s == MergeStrategy::Replace)
            .map(|(p, _)| p.as_str())
    }

    pub fn value(&self) -> &Map<String, Value> {
        &self.value
    }

    /// Value of a field at a dotted path
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.value.get(first)?, |value, segment| {
            value.as_object()?.get(segment)
        })
    }
}

impl Default for MergeOverride {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            root.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = root
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert_path(map, rest, value);
            }
        }
    }
}

/// Merge a generated override into a base configuration
pub fn merge(base: &CompilerConfig, generated: &MergeOverride) -> CompilerConfig {
    let mut merged = base.as_map().clone();
    merge_object(&mut merged, &generated.value, "", &generated.strategies);
    CompilerConfig::from(merged)
}

fn merge_object(
    base: &mut Map<String, Value>,
    generated: &Map<String, Value>,
    prefix: &str,
    strategies: &BTreeMap<String, MergeStrategy>,
) {
    for (key, incoming) in generated {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match base.get_mut(key) {
            None => {
                base.insert(key.clone(), incoming.clone());
            }
            Some(existing) => merge_value(existing, incoming, &path, strategies),
        }
    }
}

fn merge_value(
    existing: &mut Value,
    incoming: &Value,
    path: &str,
    strategies: &BTreeMap<String, MergeStrategy>,
) {
    let strategy = strategies.get(path).copied();
    if strategy == Some(MergeStrategy::Replace) {
        *existing = incoming.clone();
        return;
    }

    match (existing, incoming) {
        (Value::Array(items), Value::Array(extra)) if strategy != Some(MergeStrategy::DeepMerge) => {
            for item in extra {
                if !items.contains(item) {
                    items.push(item.clone());
                }
            }
        }
        (Value::Object(map), Value::Object(extra)) if strategy != Some(MergeStrategy::Union) => {
            merge_object(map, extra, path, strategies);
        }
        // Shapes disagree or the field is a scalar: the generated value wins
        (existing, incoming) => *existing = incoming.clone(),
    }
}

/// What a build is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitMode {
    /// Emit declaration files for publishing
    #[default]
    Declarations,
    /// Only verify the project compiles under each version
    CheckOnly,
}

impl EmitMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Declarations => "declarations",
            Self::CheckOnly => "check-only",
        }
    }

    pub fn is_check_only(&self) -> bool {
        matches!(self, Self::CheckOnly)
    }
}

impl fmt::Display for EmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builder for the version-specific override fed to [`merge`]
#[derive(Debug, Clone)]
pub struct GeneratedOptions<'a> {
    mode: EmitMode,
    base: &'a CompilerConfig,
    output_dir: &'a str,
    typings_dir: &'a str,
}

impl<'a> GeneratedOptions<'a> {
    pub fn new(base: &'a CompilerConfig, output_dir: &'a str, typings_dir: &'a str) -> Self {
        Self {
            mode: EmitMode::default(),
            base,
            output_dir,
            typings_dir,
        }
    }

    pub fn for_mode(
        mode: EmitMode,
        base: &'a CompilerConfig,
        output_dir: &'a str,
        typings_dir: &'a str,
    ) -> Self {
        Self::new(base, output_dir, typings_dir).with_mode(mode)
    }

    pub fn with_mode(mut self, mode: EmitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Produce the override for the selected mode
    pub fn build(&self) -> MergeOverride {
        let opt = |key: &str| format!("{}.{}", COMPILER_OPTIONS, key);

        let mut generated = MergeOverride::new();
        // Excluding "." would exclude every input file
        if self.output_dir != output::CURRENT_DIR {
            generated = generated.set(EXCLUDE, json!([self.output_dir]), MergeStrategy::Union);
        }

        let generated = generated
            .replace(&opt(options::DECLARATION), json!(true))
            .replace(&opt(options::DECLARATION_DIR), json!(self.typings_dir))
            // Typings that fail to compile must never be published
            .replace(&opt(options::NO_EMIT_ON_ERROR), json!(true))
            .replace(&opt(options::EMIT_DECLARATION_ONLY), json!(true));

        match self.mode {
            EmitMode::Declarations => generated.replace(&opt(options::NO_EMIT), json!(false)),
            EmitMode::CheckOnly => match self.base.option(options::NO_EMIT) {
                Some(no_emit) => generated.replace(&opt(options::NO_EMIT), no_emit.clone()),
                None => generated,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn config(value: Value) -> CompilerConfig {
        CompilerConfig::from_value(value).unwrap()
    }

    #[test]
    fn test_replace_wins_over_base() {
        let base = config(json!({"compilerOptions": {"declaration": false, "strict": true}}));
        let generated = MergeOverride::new().replace("compilerOptions.declaration", json!(true));

        let merged = merge(&base, &generated);
        assert_eq!(
            merged.to_value(),
            json!({"compilerOptions": {"declaration": true, "strict": true}})
        );
    }

    #[test]
    fn test_replace_of_array_does_not_union() {
        let base = config(json!({"files": ["a.ts"]}));
        let generated = MergeOverride::new().replace("files", json!(["b.ts"]));

        let merged = merge(&base, &generated);
        assert_eq!(merged.to_value(), json!({"files": ["b.ts"]}));
    }

    #[test]
    fn test_arrays_union_without_duplicates() {
        let base = config(json!({"exclude": ["node_modules", "dist"]}));
        let generated = MergeOverride::new().set("exclude", json!(["dist", "lib"]), MergeStrategy::Union);

        let merged = merge(&base, &generated);
        assert_eq!(merged.exclude(), vec!["node_modules", "dist", "lib"]);
    }

    #[test]
    fn test_unlisted_objects_deep_merge() {
        let base = config(json!({"compilerOptions": {"paths": {"a": ["x"]}}}));
        let mut generated = MergeOverride::new();
        insert_path(&mut generated.value, "compilerOptions.paths.b", json!(["y"]));

        let merged = merge(&base, &generated);
        assert_eq!(
            merged.to_value(),
            json!({"compilerOptions": {"paths": {"a": ["x"], "b": ["y"]}}})
        );
    }

    #[test]
    fn test_missing_base_sections_are_created() {
        let generated = MergeOverride::new().replace("compilerOptions.declarationDir", json!("dist/v"));
        let merged = merge(&CompilerConfig::new(), &generated);
        assert_eq!(merged.option_str("declarationDir"), Some("dist/v"));
    }

    #[test]
    fn test_declaration_mode_override() {
        let base = config(json!({
            "compilerOptions": {"declaration": false, "noEmit": true, "outDir": "dist"},
            "exclude": ["node_modules"]
        }));
        let generated = GeneratedOptions::new(&base, "dist", "dist/ts-types-versions-3.1").build();
        let merged = merge(&base, &generated);

        assert_eq!(
            merged.to_value(),
            json!({
                "compilerOptions": {
                    "declaration": true,
                    "noEmit": false,
                    "outDir": "dist",
                    "declarationDir": "dist/ts-types-versions-3.1",
                    "noEmitOnError": true,
                    "emitDeclarationOnly": true
                },
                "exclude": ["node_modules", "dist"]
            })
        );
    }

    #[test]
    fn test_check_only_keeps_base_no_emit() {
        let base = config(json!({"compilerOptions": {"noEmit": true}}));
        let generated = GeneratedOptions::new(&base, ".", "ts-types-versions-3.0")
            .with_mode(EmitMode::CheckOnly)
            .build();
        assert_eq!(generated.get_path("compilerOptions.noEmit"), Some(&json!(true)));

        let bare = CompilerConfig::new();
        let generated = GeneratedOptions::new(&bare, ".", "ts-types-versions-3.0")
            .with_mode(EmitMode::CheckOnly)
            .build();
        assert_eq!(generated.get_path("compilerOptions.noEmit"), None);
        assert_eq!(generated.get_path("exclude"), None);
        assert_eq!(
            generated.get_path("compilerOptions.emitDeclarationOnly"),
            Some(&json!(true))
        );
    }

    #[test]
    fn test_replaced_paths_listed() {
        let base = CompilerConfig::new();
        let generated = GeneratedOptions::new(&base, "dist", "dist/t").build();
        let replaced: Vec<&str> = generated.replaced_paths().collect();
        assert!(replaced.contains(&"compilerOptions.declaration"));
        assert!(replaced.contains(&"compilerOptions.declarationDir"));
        assert!(!replaced.contains(&"exclude"));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (0i64..100).prop_map(|n| json!(n)),
            "[a-z]{0,4}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                proptest::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn arb_base() -> impl Strategy<Value = CompilerConfig> {
        (
            proptest::collection::btree_map("[a-z]{1,3}", arb_json(), 0..4),
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            proptest::collection::vec("[a-z]{1,3}", 0..3),
        )
            .prop_map(|(options, declaration, no_emit, exclude)| {
                let mut config = CompilerConfig::from_value(json!({
                    "compilerOptions": Value::Object(options.into_iter().collect()),
                    "exclude": exclude,
                }))
                .unwrap();
                if let Some(d) = declaration {
                    config.set_option("declaration", json!(d));
                }
                if let Some(n) = no_emit {
                    config.set_option("noEmit", json!(n));
                }
                config
            })
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(base in arb_base(), check_only in any::<bool>()) {
            let mode = if check_only { EmitMode::CheckOnly } else { EmitMode::Declarations };
            let generated = GeneratedOptions::new(&base, "dist", "dist/p-3.1").with_mode(mode).build();

            let once = merge(&base, &generated);
            let twice = merge(&once, &generated);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_replace_fields_always_win(base in arb_base()) {
            let generated = GeneratedOptions::new(&base, "dist", "dist/p-3.1").build();
            let merged = merge(&base, &generated);

            for path in generated.replaced_paths() {
                prop_assert_eq!(merged.get_path(path), generated.get_path(path));
            }
        }
    }
}
