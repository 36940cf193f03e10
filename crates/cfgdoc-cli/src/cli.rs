//! Command-line argument definitions

use cfgdoc_yaml::{DirectoryOrder, LoaderOptions, DEFAULT_INCLUDE_TAG};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Load YAML configuration with `!include` support and print it back out
///
/// Each PATH may be a file or a directory; a directory is loaded as a list
/// with one document per entry.
#[derive(Parser, Debug)]
#[command(
    name = "cfgdoc",
    version,
    about,
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// YAML files or directories to load
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Resolve top-level includes against this directory
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Load directory entries in file-name order rather than filesystem order
    #[arg(long)]
    pub sorted: bool,

    /// Tag that triggers file inclusion
    #[arg(long, value_name = "TAG", default_value = DEFAULT_INCLUDE_TAG)]
    pub include_tag: String,

    /// Print only the value at a dotted attribute path (can be repeated)
    #[arg(short, long = "get", value_name = "ATTR")]
    pub get: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Loader configuration selected by the flags
    pub fn loader_options(&self) -> LoaderOptions {
        let order = if self.sorted {
            DirectoryOrder::Sorted
        } else {
            DirectoryOrder::Listing
        };

        let mut options = LoaderOptions::new()
            .with_include_tag(self.include_tag.as_str())
            .with_directory_order(order);
        if let Some(root) = &self.root {
            options = options.with_root(root);
        }
        options
    }
}
