//! Attribute values and forward references.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Points at an attribute of another resource whose value may not be known yet.
///
/// A reference owns nothing: it is a lookup key checked against the
/// composition graph at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    /// Id of the referenced resource.
    pub source_id: String,
    /// Attribute path on the referenced resource (dot-separated for nested maps).
    pub attribute: String,
}

impl Reference {
    /// Creates a reference to `attribute` on resource `source_id`.
    #[must_use]
    pub fn new(source_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            attribute: attribute.into(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.source_id, self.attribute)
    }
}

/// An attribute value: a literal or a reference, possibly nested in lists and maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// A string literal.
    String(String),
    /// An integer literal.
    Integer(i64),
    /// A boolean literal.
    Bool(bool),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A string-keyed mapping of values.
    Map(BTreeMap<String, Value>),
    /// A reference to another resource's attribute.
    Ref(Reference),
}

impl Value {
    /// Builds a list value from anything convertible into values.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a map value from key/value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns every reference embedded in this value, depth-first.
    #[must_use]
    pub fn references(&self) -> Vec<&Reference> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        match self {
            Self::Ref(r) => out.push(r),
            Self::List(items) => items.iter().for_each(|v| v.collect_references(out)),
            Self::Map(entries) => entries.values().for_each(|v| v.collect_references(out)),
            Self::String(_) | Self::Integer(_) | Self::Bool(_) => {}
        }
    }

    /// Returns `true` if no reference is embedded anywhere in this value.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.references().is_empty()
    }

    /// Looks up a dot-separated path inside nested maps.
    ///
    /// An empty path returns the value itself.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Self> {
        if path.is_empty() {
            return Some(self);
        }
        let (head, rest) = path.split_once('.').unwrap_or((path, ""));
        match self {
            Self::Map(entries) => entries.get(head)?.lookup(rest),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Reference> for Value {
    fn from(r: Reference) -> Self {
        Self::Ref(r)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_found_inside_lists_and_maps() {
        let value = Value::map([
            ("group", Value::from(Reference::new("g", "name"))),
            (
                "users",
                Value::list([Reference::new("u1", "name"), Reference::new("u2", "name")]),
            ),
            ("label", Value::from("plain")),
        ]);

        let refs: Vec<String> = value.references().iter().map(ToString::to_string).collect();
        assert_eq!(refs, vec!["g.name", "u1.name", "u2.name"]);
        assert!(!value.is_literal());
    }

    #[test]
    fn scalar_is_literal() {
        assert!(Value::from(42_i64).is_literal());
        assert!(Value::from(true).is_literal());
        assert!(Value::list(["a", "b"]).is_literal());
    }

    #[test]
    fn lookup_walks_nested_maps() {
        let value = Value::map([("tags", Value::map([("Team", "Devops")]))]);
        assert_eq!(value.lookup("tags.Team"), Some(&Value::from("Devops")));
        assert_eq!(value.lookup("tags.Missing"), None);
        assert_eq!(value.lookup(""), Some(&value));
    }

    #[test]
    fn lookup_does_not_descend_into_scalars() {
        let value = Value::from("x");
        assert_eq!(value.lookup("anything"), None);
    }

    #[test]
    fn value_serializes_with_variant_tag() {
        let json = serde_json::to_string(&Value::from(Reference::new("r", "arn"))).expect("json");
        assert_eq!(json, r#"{"ref":{"source_id":"r","attribute":"arn"}}"#);
    }
}
