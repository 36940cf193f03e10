//! YAML configuration loading with recursive includes
//!
//! This crate loads YAML documents into [`Node`] trees whose mappings are
//! insertion-ordered [`Thing`]s, and adds one tag:
//!
//! - `!include path` - replace the node with the document at `path`,
//!   resolved relative to the including file's directory. A directory is
//!   loaded as a list with one element per entry.
//!
//! Documents dump back out with their keys in source order.
//!
//! # Example
//!
//! ```ignore
//! use cfgdoc_yaml::{dump_stdout, load_path};
//!
//! let config = load_path("/etc/app/config.yaml")?;
//! let port = config.lookup("server.port")?;
//! dump_stdout(&config)?;
//! ```

mod dump;
mod error;
mod loader;
mod path;
mod resolver;

pub use dump::{dump, dump_stdout, dump_to_string};
pub use error::{YamlError, YamlResult};
pub use loader::{
    construct_thing, load, load_reader, DirectoryOrder, IncludeLoader, LoaderOptions,
    MappingConstructor, DEFAULT_INCLUDE_TAG,
};
pub use path::{load_path, load_path_with};
pub use resolver::{PathResolver, ResolvedInclude};

pub use cfgdoc_core::{Node, TaggedNode, Thing, ThingError, ThingResult, Value};
