//! Document model for cfgdoc
//!
//! This crate provides the value types produced by the cfgdoc YAML loader:
//! [`Node`], a document tree node, and [`Thing`], the insertion-ordered
//! mapping that every YAML mapping is loaded into.
//!
//! A `Thing` can be read like a map (`thing.get("name")`, `thing["name"]`)
//! or through named attributes (`thing.attr("name")?`,
//! `thing.lookup("server.port")?`), and it serializes back out with its
//! entries in the order they were inserted.

mod error;
mod node;
mod thing;

pub use error::{ThingError, ThingResult};
pub use node::{Node, TaggedNode};
pub use thing::Thing;

// Re-export the scalar types nodes are built from
pub use serde_yaml::value::Tag;
pub use serde_yaml::{Mapping, Number, Value};
