//! Build command - compile declarations for each requested compiler version

use anyhow::{Context, Result};
use std::path::PathBuf;
use typesver_build::{
    BelowThresholdPolicy, BuildOptions, BuildOrchestrator, BuildReport, EmitMode, VersionOutcome,
    VersionSet,
};

/// Build command arguments
#[derive(Debug, Default)]
pub struct BuildArgs {
    /// Comma separated versions; the built-in defaults when absent
    pub ts_versions: Option<String>,
    pub compatibility_check: bool,
    pub no_manifest: bool,
    /// Preserve temporary configs
    pub debug: bool,
    pub project_dir: PathBuf,
    pub tsconfig: Option<PathBuf>,
    pub prefix: Option<String>,
    pub skip_below_threshold: bool,
    pub json: bool,
    pub quiet: bool,
}

/// Run the build command
pub fn run(args: BuildArgs) -> Result<()> {
    let options = build_options(&args)?;
    let orchestrator = BuildOrchestrator::new(options);

    let report = orchestrator.run().context("Build failed")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize build report")?
        );
    } else if !args.quiet {
        print!("{}", render_summary(&report));
    }

    Ok(())
}

/// Resolve command line arguments into build options
pub fn build_options(args: &BuildArgs) -> Result<BuildOptions> {
    let versions = match args.ts_versions.as_deref() {
        Some(list) => VersionSet::from_list(list)
            .with_context(|| format!("Invalid --ts-versions value '{}'", list))?,
        None => VersionSet::defaults(),
    };

    let mode = if args.compatibility_check {
        EmitMode::CheckOnly
    } else {
        EmitMode::Declarations
    };

    let policy = if args.skip_below_threshold {
        BelowThresholdPolicy::Skip
    } else {
        BelowThresholdPolicy::BuildUnadvertised
    };

    let mut options = BuildOptions::new(&args.project_dir, versions)
        .with_mode(mode)
        .with_write_manifest(!args.no_manifest)
        .with_preserve_temp_configs(args.debug)
        .with_below_threshold(policy);

    if let Some(ref tsconfig) = args.tsconfig {
        options = options.with_tsconfig(tsconfig.clone());
    }
    if let Some(ref prefix) = args.prefix {
        options = options.with_prefix(prefix.clone());
    }

    Ok(options)
}

/// Human-readable build summary
pub fn render_summary(report: &BuildReport) -> String {
    let mut out = String::new();

    for version in &report.versions {
        let line = match version.outcome {
            VersionOutcome::Built => format!(
                "  built    {:<8} {} ({} declaration files, {:.2}s){}\n",
                version.version.as_str(),
                version.typings_dir,
                version.declaration_files,
                version.elapsed.as_secs_f64(),
                if version.advertised { "" } else { " [not advertised]" }
            ),
            VersionOutcome::Checked => format!(
                "  checked  {:<8} ({:.2}s)\n",
                version.version.as_str(),
                version.elapsed.as_secs_f64()
            ),
            VersionOutcome::Skipped => format!(
                "  skipped  {:<8} below typesVersions minimum\n",
                version.version.as_str()
            ),
        };
        out.push_str(&line);
    }

    if report.manifest_written {
        let keys: Vec<&String> = report
            .types_versions
            .as_object()
            .map(|section| section.keys().collect())
            .unwrap_or_default();
        out.push_str(&format!(
            "Updated package.json: typesVersions [{}]\n",
            keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
        ));
        if let Some(ref types) = report.types {
            out.push_str(&format!("  types: {}\n", types));
        }
    }

    let done = report.built().count();
    out.push_str(&format!(
        "{} {} version{} in {:.2}s\n",
        if report.mode == EmitMode::CheckOnly.name() {
            "Checked"
        } else {
            "Built"
        },
        done,
        if done == 1 { "" } else { "s" },
        report.total_time.as_secs_f64()
    ));

    out
}
