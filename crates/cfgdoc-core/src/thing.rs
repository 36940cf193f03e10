//! Ordered attribute container
//!
//! A [`Thing`] is what every YAML mapping becomes once loaded. Entries keep
//! the order they had in the source document and can be read either by key
//! (`thing.get("name")`, `thing["name"]`) or as named attributes
//! (`thing.attr("name")?`, `thing.lookup("server.port")?`). Both views share
//! one backing store.

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::{Mapping, Value};

use crate::error::{ThingError, ThingResult};
use crate::node::Node;

/// Insertion-ordered mapping with keyed and attribute-style access
///
/// Keys are stored as raw YAML scalars (`serde_yaml::Value`), so integer and
/// boolean keys survive a load/dump cycle unchanged. Equality ignores entry
/// order, the same way two YAML mappings with the same entries are equal.
#[derive(Clone, Default, PartialEq)]
pub struct Thing {
    entries: IndexMap<Value, Node>,
}

impl Thing {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty container with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert an entry, returning the previous value for that key
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove an entry, shifting later entries down to keep their order
    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.entries.shift_remove(&Value::String(name.to_string()))
    }

    /// Look up a string key
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(&Value::String(name.to_string()))
    }

    /// Look up a string key for modification
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.entries.get_mut(&Value::String(name.to_string()))
    }

    /// Look up an arbitrary scalar key (integers, booleans, ...)
    pub fn get_key(&self, key: &Value) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Check whether a string key is present
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Read a named attribute
    pub fn attr(&self, name: &str) -> ThingResult<&Node> {
        self.get(name).ok_or_else(|| ThingError::NotFound {
            key: name.to_string(),
        })
    }

    /// Read a named attribute for modification
    pub fn attr_mut(&mut self, name: &str) -> ThingResult<&mut Node> {
        self.get_mut(name).ok_or_else(|| ThingError::NotFound {
            key: name.to_string(),
        })
    }

    /// Walk a dotted attribute path such as `included.data2.inner.data3`
    ///
    /// Numeric segments index into sequences, so `servers.0.host` reads the
    /// `host` of the first server.
    pub fn lookup(&self, path: &str) -> ThingResult<&Node> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut current = self.attr(first)?;
        let mut walked = first.to_string();

        for segment in segments {
            let next = match current {
                Node::Mapping(thing) => thing.get(segment),
                Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => return Err(ThingError::NotAMapping { key: walked }),
            };
            walked.push('.');
            walked.push_str(segment);
            current = next.ok_or_else(|| ThingError::NotFound {
                key: walked.clone(),
            })?;
        }

        Ok(current)
    }

    /// Deserialize the whole container into a typed structure
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> ThingResult<T> {
        Ok(serde_yaml::from_value(Value::Mapping(self.to_mapping()))?)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Node> {
        self.entries.iter()
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> indexmap::map::Keys<'_, Value, Node> {
        self.entries.keys()
    }

    /// Iterate values in insertion order
    pub fn values(&self) -> indexmap::map::Values<'_, Value, Node> {
        self.entries.values()
    }

    /// Convert into a plain `serde_yaml` mapping, keeping entry order
    pub fn to_mapping(&self) -> Mapping {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v)))
            .collect()
    }
}

impl fmt::Debug for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl Index<&str> for Thing {
    type Output = Node;

    fn index(&self, name: &str) -> &Node {
        match self.get(name) {
            Some(node) => node,
            None => panic!("no attribute '{}'", name),
        }
    }
}

impl<K: Into<Value>> FromIterator<(K, Node)> for Thing {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        let mut thing = Thing::new();
        thing.extend(iter);
        thing
    }
}

impl<K: Into<Value>> Extend<(K, Node)> for Thing {
    fn extend<I: IntoIterator<Item = (K, Node)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.entries.insert(key.into(), value);
        }
    }
}

impl IntoIterator for Thing {
    type Item = (Value, Node);
    type IntoIter = indexmap::map::IntoIter<Value, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Thing {
    type Item = (&'a Value, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, Value, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Mapping> for Thing {
    fn from(mapping: Mapping) -> Self {
        mapping
            .into_iter()
            .map(|(k, v)| (k, Node::from(v)))
            .collect()
    }
}

impl PartialEq<Mapping> for Thing {
    fn eq(&self, other: &Mapping) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).map_or(false, |v| value == v))
    }
}

/// Entries are written in insertion order; no key sorting is applied.
impl Serialize for Thing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn sample() -> Thing {
        let mut thing = Thing::new();
        thing.insert("zeta", 1);
        thing.insert("alpha", "two");
        thing.insert("mid", vec![Node::from(3), Node::from(4)]);
        thing
    }

    #[test]
    fn test_insertion_order_kept() {
        let thing = sample();
        let keys: Vec<_> = thing.keys().map(|k| k.as_str().unwrap()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut thing = sample();
        let old = thing.insert("zeta", 10);
        assert_eq!(old, Some(Node::from(1)));
        assert_eq!(thing.keys().next(), Some(&Value::from("zeta")));
        assert_eq!(thing["zeta"], 10);
    }

    #[test]
    fn test_remove_shifts() {
        let mut thing = sample();
        thing.remove("zeta");
        let keys: Vec<_> = thing.keys().map(|k| k.as_str().unwrap()).collect();
        assert_eq!(keys, vec!["alpha", "mid"]);
    }

    #[test]
    fn test_key_and_attr_agree() {
        let thing = sample();
        assert_eq!(thing.attr("alpha").unwrap(), &thing["alpha"]);
        assert_eq!(thing.get("alpha"), Some(&thing["alpha"]));
    }

    #[test]
    fn test_missing_attr() {
        let thing = sample();
        let err = thing.attr("nope").unwrap_err();
        assert!(matches!(err, ThingError::NotFound { ref key } if key == "nope"));
    }

    #[test]
    #[should_panic(expected = "no attribute 'nope'")]
    fn test_index_missing_panics() {
        let thing = sample();
        let _ = &thing["nope"];
    }

    #[test]
    fn test_lookup_nested() {
        let mut inner = Thing::new();
        inner.insert("port", 8080);
        let mut thing = Thing::new();
        thing.insert("server", inner);
        thing.insert("list", vec![Node::from("a"), Node::from("b")]);

        assert_eq!(*thing.lookup("server.port").unwrap(), 8080);
        assert_eq!(*thing.lookup("list.1").unwrap(), "b");
        assert!(matches!(
            thing.lookup("server.host"),
            Err(ThingError::NotFound { key }) if key == "server.host"
        ));
        assert!(matches!(
            thing.lookup("server.port.x"),
            Err(ThingError::NotAMapping { key }) if key == "server.port"
        ));
    }

    #[test]
    fn test_equal_to_plain_mapping() {
        let mut thing = Thing::new();
        thing.insert("a", 97);
        thing.insert("b", 98);

        let mut mapping = Mapping::new();
        mapping.insert(Value::from("b"), Value::from(98));
        mapping.insert(Value::from("a"), Value::from(97));

        assert_eq!(thing, mapping);

        mapping.insert(Value::from("c"), Value::from(99));
        assert_ne!(thing, mapping);
    }

    #[test]
    fn test_non_string_keys() {
        let mut thing = Thing::new();
        thing.insert(1, "one");
        thing.insert(true, "yes");
        assert_eq!(*thing.get_key(&Value::from(1)).unwrap(), "one");
        assert_eq!(*thing.get_key(&Value::from(true)).unwrap(), "yes");
    }

    #[test]
    fn test_serialize_in_insertion_order() {
        let mut thing = Thing::new();
        thing.insert("b", 2);
        thing.insert("a", 1);
        assert_eq!(serde_yaml::to_string(&thing).unwrap(), "b: 2\na: 1\n");
    }

    #[test]
    fn test_deserialize_into_struct() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Server {
            host: String,
            port: u16,
        }

        let mut thing = Thing::new();
        thing.insert("host", "localhost");
        thing.insert("port", 8080);

        let server: Server = thing.deserialize_into().unwrap();
        assert_eq!(
            server,
            Server {
                host: "localhost".to_string(),
                port: 8080
            }
        );
    }
}
