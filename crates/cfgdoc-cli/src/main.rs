//! cfgdoc command-line tool
//!
//! Loads each path given on the command line (resolving `!include` tags) and
//! prints the result as YAML, either whole or as selected attributes.

mod cli;
mod logging;

use anyhow::{Context, Result};
use cfgdoc_core::{Node, Thing};
use cfgdoc_yaml::{dump_stdout, load_path_with};
use clap::Parser;
use tracing::info;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)?;

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.loader_options();
    let separate = cli.paths.len() > 1;

    for path in &cli.paths {
        info!("Loading {}", path.display());

        let document = load_path_with(path, &options)
            .with_context(|| format!("failed to load {}", path.display()))?;

        if separate {
            println!("---");
        }

        if cli.get.is_empty() {
            dump_stdout(&document)?;
        } else {
            let selected = select(&document, &cli.get)
                .with_context(|| format!("in {}", path.display()))?;
            dump_stdout(&selected)?;
        }
    }

    Ok(())
}

/// Collect the values at the given attribute paths, keyed by path
fn select(document: &Node, paths: &[String]) -> Result<Thing> {
    let mut selected = Thing::with_capacity(paths.len());
    for path in paths {
        let value = document.lookup(path)?;
        selected.insert(path.as_str(), value.clone());
    }
    Ok(selected)
}
