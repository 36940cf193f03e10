//! Include-aware YAML loader
//!
//! Parsing is delegated to `serde_yaml`; the loader then constructs the
//! document tree with two rules of its own:
//! - every mapping is built by the configured [`MappingConstructor`]
//!   (a [`Thing`] by default) after merge keys are flattened
//! - every node tagged `!include path` is replaced by whatever
//!   [`load_path_with`] returns for that path
//!
//! The root used to resolve includes is fixed for the lifetime of a loader.
//! A nested include is loaded by a fresh loader rooted at the included
//! file's directory, so a failing include never disturbs the root of the
//! document that contained it.

use std::io::Read;
use std::path::{Path, PathBuf};

use cfgdoc_core::{Node, TaggedNode, Thing};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};
use tracing::{debug, trace};

use crate::error::{YamlError, YamlResult};
use crate::path::load_path_with;
use crate::resolver::PathResolver;

/// Default tag that triggers file inclusion
pub const DEFAULT_INCLUDE_TAG: &str = "!include";

/// Key whose value is merged into the enclosing mapping
///
/// `serde_yaml::Value` does not record whether a scalar was quoted, so a
/// quoted `"<<"` key is treated as a merge key too.
const MERGE_KEY: &str = "<<";

/// Builds a mapping node from its entries in document order
///
/// Entries may repeat a key when merge keys are involved; later entries win.
pub type MappingConstructor = fn(Vec<(Value, Node)>) -> Node;

/// Default mapping rule: an insertion-ordered [`Thing`]
pub fn construct_thing(pairs: Vec<(Value, Node)>) -> Node {
    Node::Mapping(pairs.into_iter().collect::<Thing>())
}

/// Order in which directory entries are loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryOrder {
    /// Whatever order the filesystem lists entries in; may differ between
    /// runs and machines
    #[default]
    Listing,
    /// Entries sorted by file name
    Sorted,
}

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    root: Option<PathBuf>,
    include_tag: String,
    mapping_constructor: MappingConstructor,
    directory_order: DirectoryOrder,
    /// Canonical paths of the files currently being loaded, outermost first
    include_chain: Vec<PathBuf>,
}

impl LoaderOptions {
    pub fn new() -> Self {
        Self {
            root: None,
            include_tag: DEFAULT_INCLUDE_TAG.to_string(),
            mapping_constructor: construct_thing,
            directory_order: DirectoryOrder::default(),
            include_chain: Vec::new(),
        }
    }

    /// Resolve top-level includes against `root` instead of the document's
    /// own directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Use a different tag for inclusion, with or without the leading `!`
    pub fn with_include_tag(mut self, tag: impl Into<String>) -> Self {
        self.include_tag = tag.into();
        self
    }

    /// Replace the container built for mapping nodes
    pub fn with_mapping_constructor(mut self, constructor: MappingConstructor) -> Self {
        self.mapping_constructor = constructor;
        self
    }

    pub fn with_directory_order(mut self, order: DirectoryOrder) -> Self {
        self.directory_order = order;
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn include_tag(&self) -> &str {
        &self.include_tag
    }

    pub fn mapping_constructor(&self) -> MappingConstructor {
        self.mapping_constructor
    }

    pub fn directory_order(&self) -> DirectoryOrder {
        self.directory_order
    }

    /// Options for loading an included path: same rules, no root override
    pub(crate) fn for_include(&self) -> Self {
        Self {
            root: None,
            ..self.clone()
        }
    }

    /// Options for loading the contents of `file`, failing if that file is
    /// already being loaded further up the chain
    pub(crate) fn entering(&self, file: &Path, canonical: PathBuf) -> YamlResult<Self> {
        if self.include_chain.contains(&canonical) {
            return Err(YamlError::CircularInclude {
                path: file.to_path_buf(),
            });
        }

        let mut options = self.clone();
        options.include_chain.push(canonical);
        Ok(options)
    }

    fn is_include(&self, tag: &Tag) -> bool {
        tag.to_string().trim_start_matches('!') == self.include_tag.trim_start_matches('!')
    }
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// YAML loader resolving include tags relative to a root directory
#[derive(Debug, Clone)]
pub struct IncludeLoader {
    resolver: PathResolver,
    options: LoaderOptions,
}

impl IncludeLoader {
    /// Loader for text with no known location, rooted at the working
    /// directory unless the options say otherwise
    pub fn new(options: LoaderOptions) -> Self {
        let resolver = options.root().map(PathResolver::new).unwrap_or_default();
        Self { resolver, options }
    }

    /// Loader for the contents of `path`, rooted at its directory unless
    /// the options say otherwise
    pub fn for_file(path: &Path, options: LoaderOptions) -> Self {
        let resolver = match options.root() {
            Some(root) => PathResolver::new(root),
            None => PathResolver::for_file(path),
        };
        Self { resolver, options }
    }

    /// Directory that include fragments are joined onto
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Parse and construct a document from text
    pub fn load_str(&self, text: &str) -> YamlResult<Node> {
        let value: Value = serde_yaml::from_str(text)?;
        self.construct(value)
    }

    /// Parse and construct a document from bytes
    pub fn load_slice(&self, bytes: &[u8]) -> YamlResult<Node> {
        let value: Value = serde_yaml::from_slice(bytes)?;
        self.construct(value)
    }

    /// Parse and construct a document from a reader
    pub fn load_reader<R: Read>(&self, reader: R) -> YamlResult<Node> {
        let value: Value = serde_yaml::from_reader(reader)?;
        self.construct(value)
    }

    /// Construct a document from an already parsed YAML value
    pub fn construct(&self, value: Value) -> YamlResult<Node> {
        match value {
            Value::Mapping(mapping) => self.construct_mapping(mapping),
            Value::Sequence(items) => {
                let items: YamlResult<Vec<Node>> =
                    items.into_iter().map(|v| self.construct(v)).collect();
                Ok(Node::Sequence(items?))
            }
            Value::Tagged(tagged) => self.construct_tagged(*tagged),
            scalar => Ok(Node::from(scalar)),
        }
    }

    fn construct_mapping(&self, mapping: Mapping) -> YamlResult<Node> {
        let mut merge = None;
        let mut pairs = Vec::with_capacity(mapping.len());

        for (key, value) in mapping {
            let value = self.construct(value)?;
            if key.as_str() == Some(MERGE_KEY) {
                merge = Some(value);
            } else {
                pairs.push((key, value));
            }
        }

        if let Some(source) = merge {
            pairs = flatten_merge(source, pairs)?;
        }

        trace!("Constructing mapping with {} entries", pairs.len());
        Ok((self.options.mapping_constructor)(pairs))
    }

    fn construct_tagged(&self, tagged: TaggedValue) -> YamlResult<Node> {
        let TaggedValue { tag, value } = tagged;

        if self.options.is_include(&tag) {
            return self.resolve_include(value);
        }

        trace!("Keeping tag '{}'", tag);
        Ok(Node::Tagged(Box::new(TaggedNode {
            tag,
            value: self.construct(value)?,
        })))
    }

    fn resolve_include(&self, value: Value) -> YamlResult<Node> {
        let fragment = match value {
            Value::String(s) => s,
            other => {
                return Err(YamlError::InvalidInclude {
                    tag: self.options.include_tag.clone(),
                    found: value_kind(&other).to_string(),
                })
            }
        };

        let include = self.resolver.resolve(&fragment);
        debug!(
            "Including {:?} from root {:?} (nested root {:?})",
            include.path,
            self.resolver.root(),
            include.root
        );

        load_path_with(&include.path, &self.options.for_include())
    }
}

impl Default for IncludeLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

/// Put merged entries ahead of the explicit ones
///
/// When merging a list of mappings, earlier mappings take precedence over
/// later ones; explicit entries take precedence over all of them.
fn flatten_merge(source: Node, explicit: Vec<(Value, Node)>) -> YamlResult<Vec<(Value, Node)>> {
    let sources = match source {
        Node::Mapping(thing) => vec![thing],
        Node::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Node::Mapping(thing) => Ok(thing),
                other => Err(YamlError::Merge {
                    found: node_kind(&other).to_string(),
                }),
            })
            .collect::<YamlResult<Vec<_>>>()?,
        other => {
            return Err(YamlError::Merge {
                found: node_kind(&other).to_string(),
            })
        }
    };

    let mut pairs: Vec<(Value, Node)> = sources.into_iter().rev().flatten().collect();
    pairs.extend(explicit);
    Ok(pairs)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn node_kind(node: &Node) -> &'static str {
    match node {
        Node::Null => "null",
        Node::Bool(_) => "a boolean",
        Node::Number(_) => "a number",
        Node::String(_) => "a string",
        Node::Sequence(_) => "a sequence",
        Node::Mapping(_) => "a mapping",
        Node::Tagged(_) => "a tagged value",
    }
}

/// Load a document from text, resolving includes against the working
/// directory
pub fn load(text: &str) -> YamlResult<Node> {
    IncludeLoader::default().load_str(text)
}

/// Load a document from a reader, resolving includes against the working
/// directory
pub fn load_reader<R: Read>(reader: R) -> YamlResult<Node> {
    IncludeLoader::default().load_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn rooted(dir: &Path) -> IncludeLoader {
        IncludeLoader::new(LoaderOptions::new().with_root(dir))
    }

    #[test]
    fn test_load_text() {
        let doc = load("---\nx:\n a: 2\n b: 2\n").unwrap();
        assert_eq!(doc["x"]["a"], 2);
        assert!(doc["x"].is_thing());
    }

    #[test]
    fn test_mapping_order_kept() {
        let doc = load("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<_> = doc
            .as_thing()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_error() {
        let result = load("key: [unclosed\n");
        assert!(matches!(result, Err(YamlError::Parse(_))));
    }

    #[test]
    fn test_default_root_is_current_dir() {
        assert_eq!(IncludeLoader::default().root(), Path::new("."));
    }

    #[test]
    fn test_root_override_wins() {
        let loader = IncludeLoader::for_file(
            Path::new("/srv/app/config.yaml"),
            LoaderOptions::new().with_root("/etc/app"),
        );
        assert_eq!(loader.root(), Path::new("/etc/app"));

        let loader = IncludeLoader::for_file(Path::new("/srv/app/config.yaml"), LoaderOptions::new());
        assert_eq!(loader.root(), Path::new("/srv/app"));
    }

    #[test]
    fn test_include_substitutes_value() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "b.yaml", "name: b\nitems: [1, 2]\n");

        let doc = rooted(dir.path()).load_str("field: !include b.yaml\n").unwrap();
        let expected = rooted(dir.path()).load_str("name: b\nitems: [1, 2]\n").unwrap();
        assert_eq!(doc["field"], expected);
        assert!(doc["field"].as_tagged().is_none());
    }

    #[test]
    fn test_include_in_sequence_and_root_position() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "one.yaml", "1\n");
        write_file(dir.path(), "list.yaml", "- !include one.yaml\n- two\n");

        let doc = rooted(dir.path()).load_str("!include list.yaml\n").unwrap();
        assert_eq!(doc[0], 1);
        assert_eq!(doc[1], "two");
    }

    #[test]
    fn test_numeric_include_payload_rejected() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "0x10", "hex: true\n");
        write_file(dir.path(), "16", "decimal: true\n");

        let result = rooted(dir.path()).load_str("x: !include 0x10\n");
        assert!(matches!(
            result,
            Err(YamlError::InvalidInclude { ref found, .. }) if found == "a number"
        ));

        let doc = rooted(dir.path()).load_str("x: !include '0x10'\n").unwrap();
        assert_eq!(doc["x"]["hex"], true);
    }

    #[test]
    fn test_include_payload_must_be_path() {
        let result = load("x: !include [a, b]\n");
        assert!(matches!(
            result,
            Err(YamlError::InvalidInclude { ref found, .. }) if found == "a sequence"
        ));
    }

    #[test]
    fn test_missing_include_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = rooted(dir.path()).load_str("x: !include missing.yaml\n");
        match result {
            Err(YamlError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_include_tag() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "part.yaml", "value: 7\n");

        let loader = IncludeLoader::new(
            LoaderOptions::new()
                .with_root(dir.path())
                .with_include_tag("import"),
        );
        let doc = loader
            .load_str("a: !import part.yaml\nb: !include part.yaml\n")
            .unwrap();
        assert_eq!(doc["a"]["value"], 7);
        assert_eq!(doc["b"].as_tagged().unwrap().tag, "include");
    }

    #[test]
    fn test_unknown_tag_kept() {
        let doc = load("secret: !vault db/password\n").unwrap();
        let tagged = doc["secret"].as_tagged().unwrap();
        assert_eq!(tagged.tag, "vault");
        assert_eq!(tagged.value, "db/password");
    }

    #[test]
    fn test_merge_key() {
        let doc = load(
            "base: &base\n  host: localhost\n  port: 80\nsite:\n  <<: *base\n  port: 8080\n",
        )
        .unwrap();
        assert_eq!(doc["site"]["host"], "localhost");
        assert_eq!(doc["site"]["port"], 8080);
        assert!(doc["site"].get("<<").is_none());
    }

    #[test]
    fn test_merge_list_earlier_wins() {
        let doc = load(
            "a: &a {x: 1}\nb: &b {x: 2, y: 2}\nc:\n  <<: [*a, *b]\n  z: 3\n",
        )
        .unwrap();
        assert_eq!(doc["c"]["x"], 1);
        assert_eq!(doc["c"]["y"], 2);
        assert_eq!(doc["c"]["z"], 3);
    }

    #[test]
    fn test_merge_from_include() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "base.yaml", "host: localhost\nport: 80\n");

        let doc = rooted(dir.path())
            .load_str("<<: !include base.yaml\nport: 443\n")
            .unwrap();
        assert_eq!(doc["host"], "localhost");
        assert_eq!(doc["port"], 443);
    }

    #[test]
    fn test_quoted_merge_key_merges_like_plain() {
        let doc = load("base: &base {host: localhost}\nsite:\n  \"<<\": *base\n  port: 1\n").unwrap();
        assert_eq!(doc["site"]["host"], "localhost");
        assert!(doc["site"].get("<<").is_none());

        let result = load("a:\n  '<<': text\n");
        assert!(matches!(result, Err(YamlError::Merge { .. })));
    }

    #[test]
    fn test_merge_rejects_scalar() {
        let result = load("a:\n  <<: 5\n  b: 1\n");
        assert!(matches!(result, Err(YamlError::Merge { .. })));
    }

    #[test]
    fn test_custom_mapping_constructor() {
        fn count_entries(pairs: Vec<(Value, Node)>) -> Node {
            Node::from(pairs.len())
        }

        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "inner.yaml", "a: 1\nb: 2\nc: 3\n");

        let loader = IncludeLoader::new(
            LoaderOptions::new()
                .with_root(dir.path())
                .with_mapping_constructor(count_entries),
        );
        let doc = loader
            .load_str("- {x: 1, y: 2}\n- !include inner.yaml\n")
            .unwrap();
        assert_eq!(doc[0], 2);
        assert_eq!(doc[1], 3);
    }
}
