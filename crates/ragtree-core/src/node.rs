//! Document tree model.
//!
//! A [`Node`] is the acyclic value the chunking pipeline consumes. Mappings
//! keep their keys in source order, and that order is what makes chunking
//! deterministic.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::Result;

/// A node of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Node>),
    /// Ordered key/value pairs. Keys are unique.
    Mapping(Vec<(String, Node)>),
}

impl Node {
    /// Parse a JSON document, preserving key order.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Ok(Self::from(value))
    }

    /// Name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Compact JSON serialization. Structural sizes are measured on this form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The text of a string node.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::String(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_preserves_key_order() {
        let node = Node::from_json_str(r#"{"zeta": 1, "alpha": [true, null], "mid": "x"}"#).unwrap();
        match &node {
            Node::Mapping(entries) => {
                let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
            }
            other => panic!("expected mapping, got {}", other.kind()),
        }
        assert_eq!(node.to_json().unwrap(), r#"{"zeta":1,"alpha":[true,null],"mid":"x"}"#);
    }

    #[test]
    fn test_to_json_keeps_non_ascii() {
        let node = Node::from(json!({"k": "héllo"}));
        assert_eq!(node.to_json().unwrap(), r#"{"k":"héllo"}"#);
        assert_eq!(node.to_json().unwrap().chars().count(), 13);
    }

    #[test]
    fn test_kind_and_as_str() {
        assert_eq!(Node::from(json!({"n": 4.5})).kind(), "mapping");
        assert_eq!(Node::from(json!(4.5)).kind(), "number");
        assert_eq!(Node::from("Example").as_str(), Some("Example"));
        assert_eq!(Node::Null.as_str(), None);
    }

    #[test]
    fn test_deserialize_through_serde() {
        let node: Node = serde_json::from_str(r#"[1, "two", {"three": 3}]"#).unwrap();
        assert_eq!(
            node,
            Node::Sequence(vec![
                Node::Number(1.into()),
                Node::from("two"),
                Node::Mapping(vec![("three".to_string(), Node::Number(3.into()))]),
            ])
        );
    }
}
