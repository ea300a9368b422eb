use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use classfold::telemetry::{self, LogFormat};

mod commands;

/// Incremental class output mirroring and member flag rewriting
///
/// classfold keeps one merged output directory in step with the class output
/// of several upstream compilers. The host build tool reports which files
/// changed; classfold applies exactly those changes and nothing else.
///
/// QUICK START:
///
///   # Mirror a batch of changes reported by the build tool
///   classfold reconcile --changes changes.json
///
///   # See what a resolver does to a member's flags
///   classfold resolve --flags 0x21 --resolver desynchronizing
///
/// Settings are read from classfold.toml in the working directory.
#[derive(Parser)]
#[command(name = "classfold")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'classfold <command> --help' for more information on a specific command.")]
struct Cli {
    /// Config file (missing file means defaults)
    #[arg(long, global = true, env = "CLASSFOLD_CONFIG", default_value = classfold::config::CONFIG_FILE)]
    config: PathBuf,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a batch of file changes to the merged output directory
    ///
    /// Reads a JSON array of change observations, e.g.
    /// [{"file": "/p/build/classes/java/main/A.class", "change": "modified", "file_type": "file"}]
    /// Every observation is classified before anything is written.
    Reconcile(commands::ReconcileArgs),

    /// Apply a modifier resolver to a literal flag value
    Resolve(commands::ResolveArgs),

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    telemetry::init(LogFormat::from_env(), level);

    let config = classfold::config::ClassfoldConfig::load(&cli.config)?;
    match cli.command {
        Commands::Reconcile(ref args) => commands::reconcile(&config, args),
        Commands::Resolve(ref args) => commands::resolve(&config, args),
        Commands::Config => {
            commands::show_config(&config);
            Ok(())
        }
    }
}
