//! Log output setup
//!
//! Logs go to stderr so stdout carries nothing but YAML.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable holding a log filter, e.g. `cfgdoc_yaml=debug`
pub const LOG_ENV: &str = "CFGDOC_LOG";

/// Install the global subscriber
///
/// `CFGDOC_LOG` takes precedence over `RUST_LOG`; without either the level
/// follows the verbosity flags.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
