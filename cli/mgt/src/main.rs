//! mgt: configure and install multiarch GNU toolchains from the command line.

mod commands;
mod config;
mod request;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use mgt_targets::{OsKind, PlatformDescriptor};
use tracing_subscriber::EnvFilter;

use commands::resolve::OutputFormat;
use request::RequestArgs;

#[derive(Parser)]
#[command(name = "mgt", version, about = "Multiarch GNU toolchain configuration")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the toolchain configuration for a build
    Resolve {
        #[command(flatten)]
        request: RequestArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Check a request and list every problem found
    Validate {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Print shell exports for the resolved toolchain
    Env {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Print the package identity key of a request
    PackageId {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Install the resolved toolchain from an offline mirror of archives
    Install {
        #[command(flatten)]
        request: RequestArgs,
        /// Mirror root: <sha256>/<archive> and its extracted <sha256>/tree/
        #[arg(long)]
        mirror: PathBuf,
    },
    /// Inspect the toolchain catalog
    Catalog {
        /// Catalog TOML (default: `catalog` in mgt.toml)
        #[arg(long, global = true)]
        catalog: Option<PathBuf>,
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Flatten a macOS toolchain archive and create unversioned aliases
    Normalize {
        /// Installation root the archive was extracted into
        root: PathBuf,
        /// Toolchain version the archive contains
        #[arg(long, value_name = "VERSION")]
        toolchain_version: String,
        /// Build host OS the archive was built for (default: this machine)
        #[arg(long)]
        host_os: Option<OsKind>,
    },
    /// List the Cortex-M architectures and their flags
    Arch,
    /// List options with their defaults
    Options {
        /// Target platform as <os>/<arch>; without one, lto defaults off
        #[arg(long)]
        target: Option<PlatformDescriptor>,
        /// Compiler version the defaults are computed for
        #[arg(long)]
        compiler_version: Option<String>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List versions and their variants
    List,
    /// Show the archives published for a version
    Show {
        /// Toolchain version
        version: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let directives = ["mgt", "mgt_core", "mgt_catalog", "mgt_install", "mgt_targets"]
        .map(|target| format!("{target}={default}"))
        .join(",");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Resolve { request, format } => {
            let prepared = request::prepare(&request, &cwd)?;
            commands::resolve::run(&prepared, format)
        }
        Commands::Validate { request } => {
            let prepared = request::prepare(&request, &cwd)?;
            commands::resolve::validate(&prepared)
        }
        Commands::Env { request } => {
            let prepared = request::prepare(&request, &cwd)?;
            commands::resolve::env(&prepared)
        }
        Commands::PackageId { request } => {
            let prepared = request::prepare(&request, &cwd)?;
            commands::resolve::print_package_id(&prepared)
        }
        Commands::Install { request, mirror } => {
            let prepared = request::prepare(&request, &cwd)?;
            commands::resolve::install(&prepared, &mirror)
        }
        Commands::Catalog { catalog, action } => {
            let catalog = request::load_catalog(catalog.as_deref(), &cwd)?;
            match action {
                CatalogAction::List => commands::catalog::list(&catalog),
                CatalogAction::Show { version } => commands::catalog::show(&catalog, &version),
            }
        }
        Commands::Normalize {
            root,
            toolchain_version,
            host_os,
        } => commands::normalize::run(&root, &toolchain_version, host_os),
        Commands::Arch => commands::info::arch(),
        Commands::Options {
            target,
            compiler_version,
        } => commands::info::options(target.as_ref(), compiler_version.as_deref()),
    }
}
