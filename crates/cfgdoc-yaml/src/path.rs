//! Loading documents from filesystem paths
//!
//! A regular file is parsed as one document. A directory is loaded entry by
//! entry into a sequence, recursing into subdirectories as nested
//! sequences. Anything else is refused with [`YamlError::CantLoad`].

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use cfgdoc_core::Node;
use tracing::debug;

use crate::error::{YamlError, YamlResult};
use crate::loader::{DirectoryOrder, IncludeLoader, LoaderOptions};

/// Load a file or directory with default options
pub fn load_path(path: impl AsRef<Path>) -> YamlResult<Node> {
    load_path_with(path, &LoaderOptions::default())
}

/// Load a file or directory
///
/// Stat failures (missing path, permission denied) are returned unchanged as
/// [`YamlError::Io`]. A dangling symlink counts as neither file nor
/// directory and is reported as [`YamlError::CantLoad`].
pub fn load_path_with(path: impl AsRef<Path>, options: &LoaderOptions) -> YamlResult<Node> {
    let path = path.as_ref();

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound && is_dangling_symlink(path) => {
            return Err(cant_load(path));
        }
        Err(e) => return Err(e.into()),
    };

    let file_type = metadata.file_type();
    if file_type.is_file() {
        load_file(path, options)
    } else if file_type.is_dir() {
        load_dir(path, options)
    } else {
        Err(cant_load(path))
    }
}

fn load_file(path: &Path, options: &LoaderOptions) -> YamlResult<Node> {
    debug!("Loading YAML file: {:?}", path);

    let options = options.entering(path, fs::canonicalize(path)?)?;
    let file = File::open(path)?;
    IncludeLoader::for_file(path, options).load_reader(BufReader::new(file))
}

fn load_dir(path: &Path, options: &LoaderOptions) -> YamlResult<Node> {
    let mut names = fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()?;

    if options.directory_order() == DirectoryOrder::Sorted {
        names.sort();
    }

    debug!("Loading {} entries from directory {:?}", names.len(), path);

    let documents: YamlResult<Vec<Node>> = names
        .iter()
        .map(|name| load_path_with(path.join(name), options))
        .collect();
    Ok(Node::Sequence(documents?))
}

fn is_dangling_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false)
}

fn cant_load(path: &Path) -> YamlError {
    YamlError::CantLoad {
        path: path.to_path_buf(),
    }
}
