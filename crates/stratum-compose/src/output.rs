//! Named output bindings and their resolution.
//!
//! A bound value is resolved against the resolved graph: a reference is
//! replaced by the literal the target declares for that attribute. When the
//! target declares none (an ARN, for example), the value is
//! [`ResolvedValue::Deferred`]: the backend computes it at apply time.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;
use stratum_common::error::{Result, StratumError};

use crate::descriptor::ResourceKind;
use crate::graph::CompositionGraph;
use crate::resolver::ResolvedGraph;
use crate::value::{Reference, Value};

/// A named, externally visible result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBinding {
    /// Unique output name.
    pub name: String,
    /// Literal or reference to expose.
    pub value: Value,
}

/// An attribute the backend only knows once the resource exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeferredValue {
    /// Kind of the owning resource.
    pub kind: ResourceKind,
    /// Id of the owning resource.
    pub id: String,
    /// Attribute path on the owning resource.
    pub attribute: String,
}

impl fmt::Display for DeferredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.kind, self.id, self.attribute)
    }
}

/// A fully resolved output value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    /// A string.
    String(String),
    /// An integer.
    Integer(i64),
    /// A boolean.
    Bool(bool),
    /// A list of resolved values.
    List(Vec<ResolvedValue>),
    /// A mapping of resolved values.
    Map(BTreeMap<String, ResolvedValue>),
    /// Computed by the backend.
    Deferred(DeferredValue),
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k} = {v}")?;
                }
                f.write_str("}")
            }
            Self::Deferred(d) => write!(f, "(known after apply: {d})"),
        }
    }
}

/// Collects output bindings and resolves them once.
#[derive(Debug, Default)]
pub struct OutputSet {
    bindings: Vec<OutputBinding>,
    names: HashSet<String>,
    finalized: Option<BTreeMap<String, ResolvedValue>>,
}

impl OutputSet {
    /// Creates an empty output set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::DuplicateOutputName`] if `name` is taken, or
    /// [`StratumError::Config`] if the set was already finalized.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        if self.finalized.is_some() {
            return Err(StratumError::Config {
                message: format!("cannot bind output \"{name}\" after finalize"),
            });
        }
        if !self.names.insert(name.clone()) {
            return Err(StratumError::DuplicateOutputName { name });
        }
        self.bindings.push(OutputBinding {
            name,
            value: value.into(),
        });
        Ok(())
    }

    /// Returns the bindings in bind order.
    #[must_use]
    pub fn bindings(&self) -> &[OutputBinding] {
        &self.bindings
    }

    /// Returns `true` once [`OutputSet::finalize`] has succeeded.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    /// Resolves every binding against `resolved`.
    ///
    /// The first successful call computes the mapping; later calls return
    /// it unchanged without looking at `resolved`.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::UnresolvedReference`] if a bound reference
    /// targets an undeclared resource. Nothing is cached on failure.
    pub fn finalize(&mut self, resolved: &ResolvedGraph<'_>) -> Result<&BTreeMap<String, ResolvedValue>> {
        if self.finalized.is_none() {
            tracing::info!(outputs = self.bindings.len(), "finalizing outputs");
            let graph = resolved.graph();
            let mut values = BTreeMap::new();
            for binding in &self.bindings {
                let value = resolve_value(&binding.value, graph, &binding.name)?;
                tracing::debug!(output = %binding.name, value = %value, "output resolved");
                let _ = values.insert(binding.name.clone(), value);
            }
            self.finalized = Some(values);
        }
        Ok(self.finalized.get_or_insert_with(BTreeMap::new))
    }
}

fn resolve_value(value: &Value, graph: &CompositionGraph, output: &str) -> Result<ResolvedValue> {
    Ok(match value {
        Value::String(s) => ResolvedValue::String(s.clone()),
        Value::Integer(n) => ResolvedValue::Integer(*n),
        Value::Bool(b) => ResolvedValue::Bool(*b),
        Value::List(items) => ResolvedValue::List(
            items
                .iter()
                .map(|v| resolve_value(v, graph, output))
                .collect::<Result<_>>()?,
        ),
        Value::Map(entries) => ResolvedValue::Map(
            entries
                .iter()
                .map(|(k, v)| Ok::<_, StratumError>((k.clone(), resolve_value(v, graph, output)?)))
                .collect::<Result<_>>()?,
        ),
        Value::Ref(reference) => resolve_reference(reference, graph, output)?,
    })
}

/// Follows a reference to the target's declared literal, if any.
///
/// Termination relies on the graph being acyclic, which holds for any
/// graph that produced a [`ResolvedGraph`].
fn resolve_reference(
    reference: &Reference,
    graph: &CompositionGraph,
    output: &str,
) -> Result<ResolvedValue> {
    let target = graph
        .get(&reference.source_id)
        .ok_or_else(|| StratumError::UnresolvedReference {
            output: output.to_string(),
            missing: reference.source_id.clone(),
            attribute: reference.attribute.clone(),
        })?;

    let deferred = || -> Result<ResolvedValue> {
        Ok(ResolvedValue::Deferred(DeferredValue {
            kind: target.kind,
            id: target.id.clone(),
            attribute: reference.attribute.clone(),
        }))
    };

    let (head, mut rest) = split_path(&reference.attribute);
    let mut current = target.attributes.get(head);
    loop {
        match current {
            None => return deferred(),
            Some(declared) if rest.is_empty() => return resolve_value(declared, graph, output),
            // The remaining path continues on whatever the embedded reference points at.
            Some(Value::Ref(inner)) => {
                let through =
                    Reference::new(inner.source_id.clone(), format!("{}.{rest}", inner.attribute));
                return resolve_reference(&through, graph, output);
            }
            Some(Value::Map(entries)) => {
                let (key, remaining) = split_path(rest);
                current = entries.get(key);
                rest = remaining;
            }
            Some(_) => return deferred(),
        }
    }
}

fn split_path(path: &str) -> (&str, &str) {
    path.split_once('.').unwrap_or((path, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ResourceDescriptor;

    fn role_graph() -> CompositionGraph {
        let mut graph = CompositionGraph::new();
        let _ = graph
            .declare(
                ResourceDescriptor::new(ResourceKind::IamRole, "r")
                    .with_attribute("name", "demo-role"),
            )
            .expect("declare r");
        graph
    }

    #[test]
    fn literal_output_passes_through() {
        let graph = role_graph();
        let resolved = graph.resolve().expect("resolve");
        let mut outputs = OutputSet::new();
        outputs.bind("count", 3_i64).expect("bind");

        let values = outputs.finalize(&resolved).expect("finalize");
        assert_eq!(values.get("count"), Some(&ResolvedValue::Integer(3)));
    }

    #[test]
    fn reference_to_declared_attribute_resolves_to_literal() {
        let graph = role_graph();
        let resolved = graph.resolve().expect("resolve");
        let mut outputs = OutputSet::new();
        outputs.bind("role-name", Reference::new("r", "name")).expect("bind");

        let values = outputs.finalize(&resolved).expect("finalize");
        assert_eq!(
            values.get("role-name"),
            Some(&ResolvedValue::String("demo-role".into()))
        );
    }

    #[test]
    fn reference_to_computed_attribute_is_deferred() {
        let graph = role_graph();
        let resolved = graph.resolve().expect("resolve");
        let mut outputs = OutputSet::new();
        outputs.bind("iam-role", Reference::new("r", "arn")).expect("bind");

        let values = outputs.finalize(&resolved).expect("finalize");
        let expected = ResolvedValue::Deferred(DeferredValue {
            kind: ResourceKind::IamRole,
            id: "r".into(),
            attribute: "arn".into(),
        });
        assert_eq!(values.get("iam-role"), Some(&expected));
        assert_eq!(
            expected.to_string(),
            "(known after apply: aws_iam_role.r.arn)"
        );
    }

    #[test]
    fn reference_chain_is_followed() {
        let mut graph = role_graph();
        let _ = graph
            .declare(
                ResourceDescriptor::new(ResourceKind::IamPolicyAttachment, "at")
                    .with_attribute("roles", Value::list([Reference::new("r", "name")])),
            )
            .expect("declare at");
        let resolved = graph.resolve().expect("resolve");
        let mut outputs = OutputSet::new();
        outputs.bind("roles", Reference::new("at", "roles")).expect("bind");

        let values = outputs.finalize(&resolved).expect("finalize");
        assert_eq!(
            values.get("roles").map(ToString::to_string).as_deref(),
            Some("[demo-role]")
        );
    }

    #[test]
    fn nested_path_is_followed_through_a_reference() {
        let mut graph = CompositionGraph::new();
        let _ = graph
            .declare(
                ResourceDescriptor::new(ResourceKind::IamUser, "y")
                    .with_attribute("tags", Value::map([("Team", "Devops")])),
            )
            .expect("declare y");
        let _ = graph
            .declare(
                ResourceDescriptor::new(ResourceKind::IamUser, "t")
                    .with_attribute("tags", Reference::new("y", "tags")),
            )
            .expect("declare t");
        let resolved = graph.resolve().expect("resolve");
        let mut outputs = OutputSet::new();
        outputs.bind("team", Reference::new("t", "tags.Team")).expect("bind");
        outputs.bind("owner", Reference::new("t", "tags.Owner")).expect("bind");

        let values = outputs.finalize(&resolved).expect("finalize");
        assert_eq!(values.get("team"), Some(&ResolvedValue::String("Devops".into())));
        assert_eq!(
            values.get("owner"),
            Some(&ResolvedValue::Deferred(DeferredValue {
                kind: ResourceKind::IamUser,
                id: "y".into(),
                attribute: "tags.Owner".into(),
            }))
        );
    }

    #[test]
    fn duplicate_output_name_is_rejected() {
        let mut outputs = OutputSet::new();
        outputs.bind("iam-group", "a").expect("bind");
        let err = outputs.bind("iam-group", "b").unwrap_err();
        assert!(matches!(err, StratumError::DuplicateOutputName { ref name } if name == "iam-group"));
        assert_eq!(outputs.bindings().len(), 1);
    }

    #[test]
    fn undeclared_target_is_unresolved() {
        let graph = role_graph();
        let resolved = graph.resolve().expect("resolve");
        let mut outputs = OutputSet::new();
        outputs.bind("ghost", Reference::new("nope", "arn")).expect("bind");

        let err = outputs.finalize(&resolved).unwrap_err();
        assert!(
            matches!(err, StratumError::UnresolvedReference { ref missing, .. } if missing == "nope"),
            "got: {err}"
        );
        assert!(!outputs.is_finalized());
    }

    #[test]
    fn finalize_is_idempotent() {
        let graph = role_graph();
        let resolved = graph.resolve().expect("resolve");
        let mut outputs = OutputSet::new();
        outputs.bind("iam-role", Reference::new("r", "arn")).expect("bind");

        let first = outputs.finalize(&resolved).expect("first").clone();
        let empty = CompositionGraph::new();
        let other = empty.resolve().expect("resolve empty");
        let second = outputs.finalize(&other).expect("second").clone();
        assert_eq!(first, second);
    }

    #[test]
    fn bind_after_finalize_is_rejected() {
        let graph = role_graph();
        let resolved = graph.resolve().expect("resolve");
        let mut outputs = OutputSet::new();
        let _ = outputs.finalize(&resolved).expect("finalize");
        assert!(outputs.bind("late", "x").is_err());
    }

    #[test]
    fn deferred_serializes_as_object() {
        let value = ResolvedValue::Deferred(DeferredValue {
            kind: ResourceKind::IamPolicy,
            id: "p".into(),
            attribute: "arn".into(),
        });
        let json = serde_json::to_value(&value).expect("json");
        assert_eq!(json["kind"], "iam_policy");
        assert_eq!(json["id"], "p");
    }
}
