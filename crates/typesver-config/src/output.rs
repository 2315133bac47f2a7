//! Output directory and typings path resolution
//!
//! Paths produced here end up in JSON manifests, so they are always
//! forward-slash separated and normalized regardless of the host platform.

use crate::config::{options, CompilerConfig};
use crate::version::CompilerVersion;

/// Prefix distinguishing generated typings directories from user content
pub const DEFAULT_TYPINGS_PREFIX: &str = "ts-types-versions-";

pub const CURRENT_DIR: &str = ".";

/// Resolve where the compiler writes its output
///
/// Precedence, first match wins:
/// 1. `compilerOptions.outDir`
/// 2. directory of `compilerOptions.outFile` (or the legacy `out`)
/// 3. the current directory
pub fn resolve_output_dir(config: &CompilerConfig) -> String {
    if let Some(out_dir) = non_empty(config.option_str(options::OUT_DIR)) {
        return normalize(out_dir);
    }

    let output_file = non_empty(config.option_str(options::OUT_FILE))
        .or_else(|| non_empty(config.option_str(options::OUT)));
    if let Some(file) = output_file {
        return dir_name(file);
    }

    CURRENT_DIR.to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Per-version typings directory: `<outputDir>/<prefix><version>`
pub fn typings_dir_for(version: &CompilerVersion, output_dir: &str, prefix: &str) -> String {
    join(&[output_dir, &typings_dir_name(prefix, version)])
}

/// Directory name for one version's typings
pub fn typings_dir_name(prefix: &str, version: &CompilerVersion) -> String {
    format!("{}{}", prefix, version)
}

/// Declaration file consumers unaware of `typesVersions` load
///
/// The main entry's file name has its compiled extension swapped for the
/// matching declaration extension and is placed in the lowest version's
/// typings directory.
pub fn legacy_types_path_for(
    main_entry: Option<&str>,
    lowest: &CompilerVersion,
    prefix: &str,
    output_dir: &str,
) -> String {
    let entry = main_entry
        .map(base_name)
        .filter(|name| !name.is_empty())
        .unwrap_or("index.js");
    join(&[
        output_dir,
        &typings_dir_name(prefix, lowest),
        &declaration_file_name(entry),
    ])
}

/// `index.js` -> `index.d.ts`, `mod.mjs` -> `mod.d.mts`, `main` -> `main.d.ts`
pub fn declaration_file_name(entry: &str) -> String {
    const EXTENSIONS: [(&str, &str); 3] = [(".mjs", ".d.mts"), (".cjs", ".d.cts"), (".js", ".d.ts")];

    for (compiled, declaration) in EXTENSIONS {
        if let Some(stem) = entry.strip_suffix(compiled) {
            return format!("{}{}", stem, declaration);
        }
    }
    format!("{}.d.ts", entry)
}

/// Last path segment
pub fn base_name(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

/// Directory portion of a path; `.` when there is none
pub fn dir_name(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((dir, _)) => dir.to_string(),
        None => CURRENT_DIR.to_string(),
    }
}

/// Join path segments with `/` and normalize the result
pub fn join(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    normalize(&joined)
}

/// Collapse `.`, `..` and duplicate separators
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => CURRENT_DIR.to_string(),
        (false, false) => body,
    }
}
