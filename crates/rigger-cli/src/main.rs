//! Rigger - pluggable installer
//!
//! Usage:
//!   rigger list extensions                        # Units a subsystem defines
//!   rigger install extensions Foo --instance wiki1
//!   rigger status extensions Foo --instance wiki1
//!   rigger revisions download Foo

mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rigger_core::config::ConfigStore;
use rigger_core::context::AppContext;
use rigger_core::error::InstallerError;
use rigger_core::installer::{Installer, install_many, uninstall_many};
use rigger_core::instance::Instance;

#[derive(Parser)]
#[command(name = "rigger")]
#[command(about = "Pluggable installer for extensions and tools", long_about = None)]
struct Cli {
    /// Path to rigger.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show task invocations and their output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the units a subsystem can install
    List {
        subsystem: String,

        /// Only show units installed in the instance
        #[arg(long, requires = "instance")]
        installed: bool,

        #[arg(long)]
        instance: Option<String>,

        /// Destination directory (defaults to <instances_dir>/<instance>)
        #[arg(long)]
        destination: Option<PathBuf>,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Install one or more units into an instance
    Install(LifecycleArgs),

    /// Uninstall one or more units from an instance
    #[command(alias = "rm")]
    Uninstall(LifecycleArgs),

    /// Show whether a unit is installed
    Status {
        subsystem: String,
        unit: String,

        #[arg(long)]
        instance: String,

        #[arg(long)]
        destination: Option<PathBuf>,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the revisions a unit can be installed at
    Revisions {
        subsystem: String,
        unit: String,

        /// Query the sources of this tag instead
        #[arg(long)]
        tag: Option<String>,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the tags offering a unit
    Tags {
        subsystem: String,
        unit: String,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the information a unit ships about itself
    Info { subsystem: String, unit: String },
}

#[derive(Args)]
struct LifecycleArgs {
    subsystem: String,

    /// Units to act on
    #[arg(required = true)]
    units: Vec<String>,

    #[arg(long)]
    instance: String,

    /// Destination directory (defaults to <instances_dir>/<instance>)
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Revision to install
    #[arg(long, short)]
    revision: Option<String>,

    /// Tag to install from
    #[arg(long, short)]
    tag: Option<String>,

    /// Install under a different name
    #[arg(long = "as", value_name = "ALIAS")]
    alias: Option<String>,

    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "rigger=debug,rigger_core=debug,info"
    } else {
        "rigger=info,rigger_core=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = match cli.config {
        Some(path) => {
            let data_dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            ConfigStore::from_paths(path, data_dir)
        }
        None => ConfigStore::from_default_location()?,
    };
    let ctx = AppContext::load(&store)?;

    run_cli(&ctx, cli.command)
}

fn run_cli(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::List {
            subsystem,
            installed,
            instance,
            destination,
            format,
        } => {
            let mut installer = ctx.installer(&subsystem);
            let units = if installed {
                // `requires = "instance"` guarantees the id is present.
                let id = instance.unwrap_or_default();
                installer.set_instance(build_instance(ctx, &id, destination, None, None, None));
                installer.list_installed()?
            } else {
                installer.list_units()?
            };
            output::print_names(&units, format)?;
        }
        Commands::Install(args) => run_lifecycle(ctx, args, Action::Install)?,
        Commands::Uninstall(args) => run_lifecycle(ctx, args, Action::Uninstall)?,
        Commands::Status {
            subsystem,
            unit,
            instance,
            destination,
            format,
        } => {
            let mut installer = ctx.installer(&subsystem);
            installer.set_instance(build_instance(ctx, &instance, destination, None, None, None));
            let status = installer.is_installed(&unit)?;
            output::print_status(&unit, status, format)?;
        }
        Commands::Revisions {
            subsystem,
            unit,
            tag,
            format,
        } => {
            let mut installer = ctx.installer(&subsystem);
            if let Some(tag) = tag {
                installer.set_instance(Instance::new("").with_tag(tag));
            }
            let revisions = installer
                .revisions()
                .ok_or_else(|| unsupported(installer.as_ref(), "revision listing"))?
                .list_revisions(&unit)?;
            if revisions.is_empty() {
                tracing::info!("No revisions available for {}", unit);
            }
            output::print_names(&revisions, format)?;
        }
        Commands::Tags {
            subsystem,
            unit,
            format,
        } => {
            let installer = ctx.installer(&subsystem);
            let tags = installer
                .tags()
                .ok_or_else(|| unsupported(installer.as_ref(), "tags"))?
                .list_tags(&unit)?;
            output::print_names(&tags, format)?;
        }
        Commands::Info { subsystem, unit } => {
            let installer = ctx.installer(&subsystem);
            let info = installer
                .task_runner()
                .ok_or_else(|| unsupported(installer.as_ref(), "info files"))?
                .info(&unit)?;
            println!("{info}");
        }
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Action {
    Install,
    Uninstall,
}

fn run_lifecycle(ctx: &AppContext, args: LifecycleArgs, action: Action) -> Result<()> {
    let mut installer = ctx.installer(&args.subsystem);
    installer.set_instance(build_instance(
        ctx,
        &args.instance,
        args.destination,
        args.revision,
        args.tag,
        args.alias,
    ));

    let failures = match action {
        Action::Install => {
            let entries = install_many(installer.as_ref(), &args.units);
            output::print_install_entries(&entries, args.format)?
        }
        Action::Uninstall => {
            let entries = uninstall_many(installer.as_ref(), &args.units);
            output::print_uninstall_entries(&entries, args.format)?
        }
    };

    if failures > 0 {
        anyhow::bail!("{} of {} unit(s) did not succeed", failures, args.units.len());
    }
    Ok(())
}

fn build_instance(
    ctx: &AppContext,
    id: &str,
    destination: Option<PathBuf>,
    revision: Option<String>,
    tag: Option<String>,
    alias: Option<String>,
) -> Instance {
    let mut instance = match destination {
        Some(dir) => Instance::new(id).with_destination(dir),
        None => ctx.instance(id),
    };
    instance.revision = revision;
    instance.tag = tag;
    instance.alias = alias;
    instance
}

fn unsupported(installer: &dyn Installer, operation: &str) -> InstallerError {
    InstallerError::unsupported(installer.system_name(), operation)
}
