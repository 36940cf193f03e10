//! Block-style YAML output
//!
//! Loaded mappings ([`cfgdoc_core::Thing`]) serialize their entries in
//! insertion order, so a document dumped after loading lists its keys in the
//! order the source had them. Other map types keep their own `Serialize`
//! order (a `BTreeMap` comes out sorted).

use std::io::{self, Write};

use serde::Serialize;

use crate::error::{YamlError, YamlResult};

/// Write `value` as YAML to `writer`
pub fn dump<T, W>(value: &T, writer: W) -> YamlResult<()>
where
    T: ?Sized + Serialize,
    W: Write,
{
    serde_yaml::to_writer(writer, value).map_err(YamlError::Emit)
}

/// Render `value` as a YAML string
pub fn dump_to_string<T>(value: &T) -> YamlResult<String>
where
    T: ?Sized + Serialize,
{
    serde_yaml::to_string(value).map_err(YamlError::Emit)
}

/// Write `value` as YAML to standard output
pub fn dump_stdout<T>(value: &T) -> YamlResult<()>
where
    T: ?Sized + Serialize,
{
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    dump(value, &mut handle)?;
    handle.flush()?;
    Ok(())
}
