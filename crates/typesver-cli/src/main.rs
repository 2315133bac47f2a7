use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

/// Build TypeScript declarations for several compiler versions.
///
/// Compiles the project once per requested TypeScript version, each into its
/// own typings directory, and publishes a `typesVersions` section in
/// package.json so consumers pick the declarations matching their compiler.
///
/// Each version must be installed under an aliased package name, e.g.
///     npm install -D typescript-3.1@npm:typescript@3.1
///
/// EXAMPLES:
///     typesver build                        Build the default versions
///     typesver build -t 4.0,3.5             Build specific versions
///     typesver build --compatibility-check  Only check each version compiles
///     typesver versions                     List the default versions
///
/// ENVIRONMENT VARIABLES:
///     TYPESVER_TS_VERSIONS    Comma separated versions to build
///     CONSUMING_PROJECT_ROOT  Project directory
///     TYPESVER_DEBUG          Set to 'true' to keep tsconfig.<version>.json files
///     TYPESVER_JSON           Set to 'true' for JSON output
///     TYPESVER_LOG            Log level (trace, debug, info, warn, error)
///     NO_COLOR                Set to disable colored log output
#[derive(Parser)]
#[command(name = "typesver")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose logging
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet output (errors only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build declarations for every requested compiler version
    ///
    /// Versions are built one at a time in the order given; the first failure
    /// stops the run. package.json is updated after each successful version.
    ///
    /// EXAMPLES:
    ///     typesver build
    ///     typesver build --ts-versions 3.1,3.0 --debug
    ///     typesver build --project-dir packages/core --json
    #[command(visible_alias = "b")]
    Build {
        /// Comma separated compiler versions (default: 3.1,3.0,2.9)
        #[arg(long, short = 't', env = "TYPESVER_TS_VERSIONS", value_name = "LIST")]
        ts_versions: Option<String>,
        /// Only check that each version compiles; package.json is not modified
        #[arg(long, short = 'c')]
        compatibility_check: bool,
        /// Do not modify package.json
        #[arg(long)]
        no_manifest: bool,
        /// Keep the generated tsconfig.<version>.json files
        #[arg(long, short = 'd', env = "TYPESVER_DEBUG")]
        debug: bool,
        /// Project directory containing package.json and node_modules
        #[arg(long, env = "CONSUMING_PROJECT_ROOT", default_value = ".", value_name = "DIR")]
        project_dir: PathBuf,
        /// Compiler configuration, relative to the project directory (default: tsconfig.json)
        #[arg(long, value_name = "FILE")]
        tsconfig: Option<PathBuf>,
        /// Prefix for the per-version typings directories
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
        /// Do not build versions too old to be listed in typesVersions
        #[arg(long)]
        skip_below_threshold: bool,
        /// JSON output
        #[arg(long, env = "TYPESVER_JSON")]
        json: bool,
    },

    /// List the compiler versions built by default
    Versions {
        /// JSON output
        #[arg(long, env = "TYPESVER_JSON")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::from_env();
    logging::init(cli.verbose, cli.quiet, &config);

    match cli.command {
        Commands::Build {
            ts_versions,
            compatibility_check,
            no_manifest,
            debug,
            project_dir,
            tsconfig,
            prefix,
            skip_below_threshold,
            json,
        } => commands::build::run(commands::build::BuildArgs {
            ts_versions,
            compatibility_check,
            no_manifest,
            debug,
            project_dir,
            tsconfig,
            prefix,
            skip_below_threshold,
            json,
            quiet: cli.quiet,
        }),
        Commands::Versions { json } => commands::versions::run(json),
    }
}
