//! Document node type
//!
//! A loaded document is a tree of [`Node`]s. It mirrors `serde_yaml::Value`
//! except that mappings are [`Thing`]s, so they keep their source order and
//! expose attribute-style access.

use std::ops::Index;

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, Serializer};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Number, Value};

use crate::error::{ThingError, ThingResult};
use crate::thing::Thing;

static NULL: Node = Node::Null;

/// A node of a parsed document
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Thing),
    /// A node carrying a tag the loader does not interpret itself
    Tagged(Box<TaggedNode>),
}

/// A tagged node kept as-is, e.g. `!vault secret/db`
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedNode {
    pub tag: Tag,
    pub value: Node,
}

impl Node {
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Node::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_thing(&self) -> Option<&Thing> {
        match self {
            Node::Mapping(thing) => Some(thing),
            _ => None,
        }
    }

    pub fn as_thing_mut(&mut self) -> Option<&mut Thing> {
        match self {
            Node::Mapping(thing) => Some(thing),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<&TaggedNode> {
        match self {
            Node::Tagged(tagged) => Some(tagged),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_thing(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    /// Look up a string key if this node is a mapping
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.as_thing().and_then(|thing| thing.get(name))
    }

    /// Read a named attribute of a mapping node
    pub fn attr(&self, name: &str) -> ThingResult<&Node> {
        self.as_thing()
            .ok_or_else(|| ThingError::NotAMapping {
                key: name.to_string(),
            })?
            .attr(name)
    }

    /// Walk a dotted attribute path, see [`Thing::lookup`]
    pub fn lookup(&self, path: &str) -> ThingResult<&Node> {
        self.as_thing()
            .ok_or_else(|| ThingError::NotAMapping {
                key: path.to_string(),
            })?
            .lookup(path)
    }

    /// Deserialize this node into a typed structure
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> ThingResult<T> {
        Ok(serde_yaml::from_value(Value::from(self))?)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(mapping) => Node::Mapping(Thing::from(mapping)),
            Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                Node::Tagged(Box::new(TaggedNode {
                    tag,
                    value: Node::from(value),
                }))
            }
        }
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::Sequence(items) => Value::Sequence(items.iter().map(Value::from).collect()),
            Node::Mapping(thing) => Value::Mapping(thing.to_mapping()),
            Node::Tagged(tagged) => Value::Tagged(Box::new(TaggedValue {
                tag: tagged.tag.clone(),
                value: Value::from(&tagged.value),
            })),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::from(&node)
    }
}

macro_rules! from_number {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Node {
                fn from(n: $ty) -> Self {
                    Node::Number(Number::from(n))
                }
            }
        )*
    };
}

from_number! { i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64 }

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Thing> for Node {
    fn from(thing: Thing) -> Self {
        Node::Mapping(thing)
    }
}

impl Index<&str> for Node {
    type Output = Node;

    /// Missing keys and non-mapping nodes index to `Null`
    fn index(&self, name: &str) -> &Node {
        self.get(name).unwrap_or(&NULL)
    }
}

impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        self.as_sequence()
            .and_then(|items| items.get(index))
            .unwrap_or(&NULL)
    }
}

impl PartialEq<Value> for Node {
    fn eq(&self, other: &Value) -> bool {
        Value::from(self) == *other
    }
}

impl PartialEq<str> for Node {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl<'a> PartialEq<&'a str> for Node {
    fn eq(&self, other: &&'a str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<String> for Node {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == Some(other.as_str())
    }
}

impl PartialEq<bool> for Node {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

macro_rules! partialeq_numeric {
    ($([$($ty:ty)*], $conversion:ident, $base:ty)*) => {
        $($(
            impl PartialEq<$ty> for Node {
                fn eq(&self, other: &$ty) -> bool {
                    self.$conversion() == Some(*other as $base)
                }
            }
        )*)*
    };
}

partialeq_numeric! {
    [i8 i16 i32 i64 isize], as_i64, i64
    [u8 u16 u32 u64 usize], as_u64, u64
    [f32 f64], as_f64, f64
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Sequence(items) => items.serialize(serializer),
            Node::Mapping(thing) => thing.serialize(serializer),
            Node::Tagged(tagged) => TaggedValue {
                tag: tagged.tag.clone(),
                value: Value::from(&tagged.value),
            }
            .serialize(serializer),
        }
    }
}
