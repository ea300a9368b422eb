//! Subcommand implementations for the `classfold` binary.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use classfold::change::{ChangeClassifier, RawObservation};
use classfold::config::ClassfoldConfig;
use classfold::modifiers::{FixedFlags, FlagSet, ModifierResolver};
use classfold::reconcile::{OutputRoot, PassOutcome, Reconciler};

#[derive(Args)]
pub struct ReconcileArgs {
    /// JSON file with the change observations ("-" or omitted: stdin)
    #[arg(long)]
    changes: Option<PathBuf>,

    /// Output root (overrides the configured one)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Member flags, decimal or 0x-prefixed hex
    #[arg(long)]
    flags: FlagSet,

    /// Resolver to apply (default: the configured one)
    #[arg(long)]
    resolver: Option<ModifierResolver>,

    /// Resolve for a non-implemented member
    #[arg(long)]
    not_implemented: bool,
}

pub fn reconcile(config: &ClassfoldConfig, args: &ReconcileArgs) -> Result<()> {
    let observations = read_observations(args.changes.as_ref())?;

    let classifier = ChangeClassifier::new(config.watched_inputs());
    let records = classifier
        .classify(observations)
        .collect::<Result<Vec<_>, _>>()
        .context("could not classify change observations; nothing was written")?;

    let root = args
        .output
        .clone()
        .map_or_else(|| config.output.output_root(), OutputRoot::new);
    let reconciler = Reconciler::new(root).with_delete_failure_policy(config.output.delete_failures);

    let report = reconciler.reconcile(records).with_context(|| {
        format!(
            "reconciliation of {} failed",
            reconciler.root().path().display()
        )
    })?;

    println!("{report}");
    if let PassOutcome::AbortedOnDirectory { path } = &report.outcome {
        eprintln!(
            "warning: change set contains directory entry `{path}`; changes after it were not applied"
        );
    }
    if !report.delete_failures.is_empty() {
        for failure in &report.delete_failures {
            match std::error::Error::source(failure) {
                Some(cause) => eprintln!("error: {failure}: {cause}"),
                None => eprintln!("error: {failure}"),
            }
        }
        bail!(
            "{} file(s) could not be deleted from {}",
            report.delete_failures.len(),
            reconciler.root().path().display()
        );
    }
    Ok(())
}

pub fn resolve(config: &ClassfoldConfig, args: &ResolveArgs) -> Result<()> {
    let resolver = args.resolver.unwrap_or(config.transform.resolver);
    let Ok(flags) = resolver.transform(&FixedFlags(args.flags), !args.not_implemented);
    println!("{flags} {}", describe(flags));
    Ok(())
}

pub fn show_config(config: &ClassfoldConfig) {
    println!("output root:     {}", config.output.output_root().path().display());
    println!("delete failures: {}", config.output.delete_failures);
    if config.inputs.roots.is_empty() {
        println!("input roots:     (none)");
    } else {
        for root in &config.inputs.roots {
            println!("input root:      {}", root.display());
        }
    }
    println!("resolver:        {}", config.transform.resolver);
    match &config.transform.discovery {
        None => println!("discovery:       (not requested)"),
        Some(set) if set.is_empty() => println!("discovery:       (no locations)"),
        Some(set) => {
            for location in set.iter() {
                println!("discovery:       {}", location.display());
            }
        }
    }
}

fn read_observations(path: Option<&PathBuf>) -> Result<Vec<RawObservation>> {
    let reader: Box<dyn Read> = match path {
        Some(p) if p.as_os_str() != "-" => Box::new(BufReader::new(
            File::open(p).with_context(|| format!("could not open {}", p.display()))?,
        )),
        _ => Box::new(io::stdin().lock()),
    };
    serde_json::from_reader(reader).context("change observations are not a valid JSON array")
}

fn describe(flags: FlagSet) -> String {
    let mut names = flags.names().join(" ");
    let unnamed = flags.unnamed_bits();
    if !unnamed.is_empty() {
        if !names.is_empty() {
            names.push(' ');
        }
        names.push_str(&format!("+{unnamed}"));
    }
    if names.is_empty() {
        "(none)".to_owned()
    } else {
        format!("({names})")
    }
}
