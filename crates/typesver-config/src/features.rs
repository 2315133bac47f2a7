//! Compiler feature gates
//!
//! Older compilers reject options they do not know. Each [`FeatureGate`] names
//! a configuration path and the first compiler version that accepts it;
//! [`FeatureGates::omit_unsupported_fields`] strips gated fields for older
//! targets after merging, so generated values are removed too.

use crate::config::CompilerConfig;
use crate::version::CompilerVersion;
use tracing::warn;

/// First version that can emit declaration maps
pub fn minimum_declaration_map_version() -> CompilerVersion {
    CompilerVersion::from_parts(2, 9)
}

/// First version that understands `emitDeclarationOnly`
pub fn minimum_emit_declaration_only_version() -> CompilerVersion {
    CompilerVersion::from_parts(2, 8)
}

/// A configuration field that needs a minimum compiler version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGate {
    /// Dotted path such as `compilerOptions.declarationMap`
    pub path: String,
    /// First version supporting the field
    pub introduced_in: CompilerVersion,
}

impl FeatureGate {
    pub fn new(path: impl Into<String>, introduced_in: CompilerVersion) -> Self {
        Self {
            path: path.into(),
            introduced_in,
        }
    }

    pub fn supported_by(&self, version: &CompilerVersion) -> bool {
        version >= &self.introduced_in
    }
}

/// The set of gated fields consulted for every build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGates {
    gates: Vec<FeatureGate>,
}

impl FeatureGates {
    /// No gates; nothing is ever stripped
    pub fn none() -> Self {
        Self { gates: Vec::new() }
    }

    pub fn with_gate(mut self, gate: FeatureGate) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureGate> {
        self.gates.iter()
    }

    /// Gated paths the given version does not support
    pub fn unsupported_by(&self, version: &CompilerVersion) -> Vec<&str> {
        self.gates
            .iter()
            .filter(|g| !g.supported_by(version))
            .map(|g| g.path.as_str())
            .collect()
    }

    /// Remove every field the target version cannot accept
    ///
    /// Returns the paths that were actually present and dropped.
    pub fn omit_unsupported_fields(
        &self,
        config: &mut CompilerConfig,
        version: &CompilerVersion,
    ) -> Vec<String> {
        let dropped: Vec<String> = self
            .unsupported_by(version)
            .into_iter()
            .filter(|path| config.remove_path(path).is_some())
            .map(str::to_string)
            .collect();

        if !dropped.is_empty() {
            warn!(
                version = %version,
                "Omitting the following keys because they are not compatible with version {}: {}",
                version,
                dropped.join(", ")
            );
        }

        dropped
    }
}

impl Default for FeatureGates {
    fn default() -> Self {
        Self::none()
            .with_gate(FeatureGate::new(
                "compilerOptions.declarationMap",
                minimum_declaration_map_version(),
            ))
            .with_gate(FeatureGate::new(
                "compilerOptions.emitDeclarationOnly",
                minimum_emit_declaration_only_version(),
            ))
    }
}
