//! Multi-version build orchestration
//!
//! Versions are built strictly one after another in the order the caller
//! gave them. The first failure stops the run; the failing version's
//! temporary config is still removed. Manifest writes from versions that
//! already succeeded are kept.

use crate::compiler::{compiler_args, compiler_binary};
use crate::error::{BuildError, BuildResult};
use crate::options::BuildOptions;
use crate::report::{count_declaration_files, BuildReport, VersionOutcome, VersionReport};
use crate::runner::{ProcessRunner, SystemRunner};
use crate::unit::{BuildPhase, BuildUnit};

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use typesver_config::merge::{merge, GeneratedOptions};
use typesver_config::output::{resolve_output_dir, typings_dir_for};
use typesver_config::{CompilerConfig, CompilerVersion, Indent};
use typesver_package::{legacy_entry, PackageManifest, TypesVersionsSection};

/// Inputs shared by every version of one run
struct RunContext {
    base: CompilerConfig,
    indent: Indent,
    output_dir: String,
    section: TypesVersionsSection,
    /// Lowest version that is actually built; the legacy entry points at it
    lowest_built: CompilerVersion,
}

/// Drives the per-version pipeline
pub struct BuildOrchestrator<R: ProcessRunner = SystemRunner> {
    options: BuildOptions,
    runner: R,
}

impl BuildOrchestrator<SystemRunner> {
    /// Orchestrator running real compilers
    pub fn new(options: BuildOptions) -> Self {
        Self::with_runner(options, SystemRunner)
    }
}

impl<R: ProcessRunner> BuildOrchestrator<R> {
    /// Orchestrator using a custom process runner
    pub fn with_runner(options: BuildOptions, runner: R) -> Self {
        Self { options, runner }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Build every requested version
    pub fn run(&self) -> BuildResult<BuildReport> {
        let run_start = Instant::now();
        let options = &self.options;

        info!(
            versions = %options.versions,
            mode = %options.mode,
            project = %options.project_dir.display(),
            "Starting multi-version build"
        );

        let (to_build, skipped) = options.plan();
        for version in &skipped {
            info!(
                version = %version,
                minimum = %options.manifest_minimum,
                "Skipping version below manifest minimum"
            );
        }

        let (base, indent) = CompilerConfig::load_structured(&options.tsconfig_path)?;
        let output_dir = resolve_output_dir(&base);
        debug!(output_dir = %output_dir, tsconfig = %options.tsconfig_path.display(), "Resolved output directory");

        let section = TypesVersionsSection::build(
            &options.versions,
            &options.prefix,
            &output_dir,
            &options.manifest_minimum,
        );

        let skipped_report = |version: &CompilerVersion| VersionReport {
            version: version.clone(),
            outcome: VersionOutcome::Skipped,
            typings_dir: typings_dir_for(version, &output_dir, &options.prefix),
            declaration_files: 0,
            advertised: false,
            elapsed: Duration::ZERO,
        };

        let lowest_built = match to_build.iter().min() {
            Some(lowest) => lowest.clone(),
            None => {
                warn!("No versions left to build");
                return Ok(BuildReport {
                    mode: options.mode.name().to_string(),
                    versions: skipped.iter().map(skipped_report).collect(),
                    output_dir,
                    types_versions: section.to_value(),
                    types: None,
                    manifest_written: false,
                    total_time: run_start.elapsed(),
                });
            }
        };

        let mut versions: Vec<VersionReport> = skipped.iter().map(skipped_report).collect();
        let ctx = RunContext {
            base,
            indent,
            output_dir,
            section,
            lowest_built,
        };

        for version in &to_build {
            versions.push(self.build_version(version, &ctx)?);
        }
        // Report in the order the versions were requested
        versions.sort_by_key(|report| {
            options
                .versions
                .iter()
                .position(|v| v == &report.version)
        });

        let types = self.legacy_types_entry(&ctx);
        Ok(BuildReport {
            mode: options.mode.name().to_string(),
            output_dir: ctx.output_dir.clone(),
            versions,
            types_versions: ctx.section.to_value(),
            types,
            manifest_written: options.writes_manifest(),
            total_time: run_start.elapsed(),
        })
    }

    /// One version's full pass, cleanup included
    fn build_version(&self, version: &CompilerVersion, ctx: &RunContext) -> BuildResult<VersionReport> {
        let start = Instant::now();
        info!(version = %version, "Starting compilation");

        let typings_dir = typings_dir_for(version, &ctx.output_dir, &self.options.prefix);
        let mut unit = BuildUnit::new(
            version.clone(),
            self.options.temp_config_path(version),
            ctx.output_dir.clone(),
            typings_dir.clone(),
            self.options.tsconfig_dir().join(&typings_dir),
        );

        if let Err(error) = self.execute_phases(&mut unit, ctx) {
            unit.fail();
            if let Err(cleanup_error) = self.cleanup(&unit) {
                warn!(
                    version = %version,
                    error = %cleanup_error,
                    "Cleanup failed after build failure"
                );
            }
            return Err(error);
        }

        unit.advance(BuildPhase::Cleanup);
        if let Err(error) = self.cleanup(&unit) {
            unit.fail();
            return Err(error);
        }
        unit.advance(BuildPhase::Done);

        let declaration_files = count_declaration_files(&unit.typings_path);
        let outcome = if self.options.mode.is_check_only() {
            info!(version = %version, "Compatibility check passed");
            VersionOutcome::Checked
        } else {
            info!(
                version = %version,
                files = declaration_files,
                "Successfully wrote type definitions to: {}",
                unit.typings_dir
            );
            VersionOutcome::Built
        };

        Ok(VersionReport {
            version: version.clone(),
            outcome,
            typings_dir,
            declaration_files,
            advertised: version >= &self.options.manifest_minimum,
            elapsed: start.elapsed(),
        })
    }

    /// Cleaning through ManifestUpdated
    fn execute_phases(&self, unit: &mut BuildUnit, ctx: &RunContext) -> BuildResult<()> {
        remove_dir_if_exists(&unit.typings_path)?;

        unit.advance(BuildPhase::ConfigWritten);
        self.write_temp_config(unit, ctx)?;

        unit.advance(BuildPhase::Compiling);
        self.compile(unit)?;

        if self.options.writes_manifest() {
            unit.advance(BuildPhase::ManifestUpdated);
            self.update_manifest(ctx)?;
        }
        Ok(())
    }

    fn write_temp_config(&self, unit: &BuildUnit, ctx: &RunContext) -> BuildResult<()> {
        let generated = GeneratedOptions::for_mode(
            self.options.mode,
            &ctx.base,
            &unit.output_dir,
            &unit.typings_dir,
        )
        .build();

        let mut merged = merge(&ctx.base, &generated);
        self.options
            .feature_gates
            .omit_unsupported_fields(&mut merged, &unit.version);

        merged.save(&unit.temp_config_path, ctx.indent)?;
        debug!(
            version = %unit.version,
            path = %unit.temp_config_path.display(),
            "Wrote merged compiler configuration"
        );
        Ok(())
    }

    fn compile(&self, unit: &BuildUnit) -> BuildResult<()> {
        let program = compiler_binary(&self.options.project_dir, &unit.version);
        let args = compiler_args(&unit.temp_config_path);
        debug!(version = %unit.version, program = %program.display(), args = ?args, "Invoking compiler");

        let output = self
            .runner
            .run(&program, &args, &self.options.project_dir)
            .map_err(|e| BuildError::compiler_launch(&unit.version, program.display().to_string(), e))?;

        if !output.success() {
            return Err(BuildError::compile_failure(
                &unit.version,
                output.exit_code,
                output.output(),
            ));
        }

        info!(
            version = %unit.version,
            elapsed_ms = output.execution_time.as_millis() as u64,
            "Executed version: {} ({})",
            unit.version,
            program.display()
        );
        Ok(())
    }

    /// Rewrite `package.json` with the full section for the whole run
    fn update_manifest(&self, ctx: &RunContext) -> BuildResult<()> {
        let path = &self.options.package_json_path;
        let mut manifest = PackageManifest::load(path)?;
        let legacy = legacy_entry(
            manifest.main(),
            &ctx.lowest_built,
            &self.options.prefix,
            &ctx.output_dir,
        );
        manifest.apply_types_versions(&ctx.section, &legacy);
        manifest.save(path)?;
        debug!(path = %path.display(), types = %legacy, "Updated package manifest");
        Ok(())
    }

    /// Legacy `types` entry for the report, read without failing the build
    fn legacy_types_entry(&self, ctx: &RunContext) -> Option<String> {
        let main = match PackageManifest::load(&self.options.package_json_path) {
            Ok(manifest) => manifest.main().map(str::to_string),
            Err(e) => {
                debug!(error = %e, "Package manifest unavailable; assuming index.js entry");
                None
            }
        };
        Some(legacy_entry(
            main.as_deref(),
            &ctx.lowest_built,
            &self.options.prefix,
            &ctx.output_dir,
        ))
    }

    fn cleanup(&self, unit: &BuildUnit) -> BuildResult<()> {
        if self.options.preserve_temp_configs {
            debug!(path = %unit.temp_config_path.display(), "Preserving temporary config");
            return Ok(());
        }
        remove_file_if_exists(&unit.temp_config_path)
    }
}

fn remove_dir_if_exists(path: &Path) -> BuildResult<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed previous typings");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::io(path, e)),
    }
}

fn remove_file_if_exists(path: &Path) -> BuildResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_missing_paths_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        assert!(remove_dir_if_exists(&temp_dir.path().join("gone")).is_ok());
        assert!(remove_file_if_exists(&temp_dir.path().join("gone.json")).is_ok());
    }

    #[test]
    fn test_remove_existing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("dist/ts-types-versions-3.1");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/index.d.ts"), "").unwrap();

        remove_dir_if_exists(&dir).unwrap();
        assert!(!dir.exists());
    }
}
