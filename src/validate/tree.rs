//! Untyped document tree shared by the manifest and workflow checks.
//!
//! Both `package.json` and the workflow YAML are decoded into [`Node`] so the
//! checks can probe nested keys without committing to a typed schema. Every
//! accessor returns an `Option`; a missing key is never an error at this level.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(BTreeMap<String, Node>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
    Null,
}

/// Leaf value. Numbers keep their textual form.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(String),
    String(String),
}

impl Scalar {
    /// `false`, zero and the empty string are falsy, as in a JavaScript
    /// `if (value)` test on a `package.json` entry.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => n.parse::<f64>().map_or(true, |v| v != 0.0),
            Scalar::String(s) => !s.is_empty(),
        }
    }
}

impl Node {
    /// Parse YAML text. Only the first document of a multi-document stream
    /// is decoded; later documents are neither decoded nor validated.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        match serde_yaml::Deserializer::from_str(text).next() {
            Some(document) => Ok(Self::from(serde_yaml::Value::deserialize(document)?)),
            None => Ok(Node::Null),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(Self::from(value))
    }

    /// Look up a key in a mapping. Returns `None` for non-mappings.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Follow a sequence of mapping keys, e.g. `["jobs", "deploy-manifest"]`.
    pub fn get_path(&self, path: &[&str]) -> Option<&Node> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// True unless the node is null, an empty string, or an empty collection.
    pub fn is_non_empty(&self) -> bool {
        match self {
            Node::Mapping(map) => !map.is_empty(),
            Node::Sequence(items) => !items.is_empty(),
            Node::Scalar(Scalar::String(s)) => !s.is_empty(),
            Node::Scalar(_) => true,
            Node::Null => false,
        }
    }

    /// JavaScript truthiness: null and falsy scalars are false, any mapping
    /// or sequence (even empty) is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::Mapping(_) | Node::Sequence(_) => true,
            Node::Scalar(scalar) => scalar.is_truthy(),
            Node::Null => false,
        }
    }

    /// A key counts as present when it exists with a non-null value.
    pub fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some_and(|node| !node.is_null())
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n.to_string())),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => Node::Mapping(
                map.into_iter()
                    .filter_map(|(key, value)| yaml_key(key).map(|key| (key, Node::from(value))))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

/// Stringify a YAML mapping key so non-string keys such as `true: x` or
/// `3: x` can still be looked up by their textual spelling. Collection keys
/// are dropped.
///
/// serde_yaml follows YAML 1.2, so `on:` stays the string `"on"`; a YAML 1.1
/// parser would turn it into the boolean key `"true"` instead.
fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n.to_string())),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}
