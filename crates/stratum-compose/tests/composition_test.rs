//! Integration tests for composition graph resolution and output binding.

use std::collections::HashSet;

use stratum_common::error::StratumError;
use stratum_compose::descriptor::{ResourceDescriptor, ResourceKind};
use stratum_compose::graph::CompositionGraph;
use stratum_compose::output::{OutputSet, ResolvedValue};
use stratum_compose::value::Value;

fn identity_graph() -> CompositionGraph {
    let mut graph = CompositionGraph::new();
    let g = graph
        .declare(ResourceDescriptor::new(ResourceKind::IamGroup, "g").with_attribute("name", "ops"))
        .expect("declare g");
    let u = graph
        .declare(ResourceDescriptor::new(ResourceKind::IamUser, "u").with_attribute("name", "alice"))
        .expect("declare u");
    let r = graph
        .declare(ResourceDescriptor::new(ResourceKind::IamRole, "r").with_attribute("name", "ec2"))
        .expect("declare r");
    let p = graph
        .declare(ResourceDescriptor::new(ResourceKind::IamPolicy, "p").with_attribute("name", "vpn"))
        .expect("declare p");
    let _ = graph
        .declare(
            ResourceDescriptor::new(ResourceKind::IamGroupMembership, "m")
                .with_attribute("group", g.attribute("name"))
                .with_attribute("users", Value::list([u.attribute("name")])),
        )
        .expect("declare m");
    let _ = graph
        .declare(
            ResourceDescriptor::new(ResourceKind::IamPolicyAttachment, "at")
                .with_attribute("groups", Value::list([g.attribute("name")]))
                .with_attribute("roles", Value::list([r.attribute("name")]))
                .with_attribute("users", Value::list([u.attribute("name")]))
                .with_attribute("policy_arn", p.attribute("arn")),
        )
        .expect("declare at");
    graph
}

#[test]
fn identity_scenario_orders_leaves_first() {
    let graph = identity_graph();
    let resolved = graph.resolve().expect("should resolve");
    assert_eq!(resolved.ordered_ids(), vec!["g", "u", "r", "p", "m", "at"]);
    assert_eq!(resolved.dependencies_of("at"), vec!["g", "u", "r", "p"]);
}

#[test]
fn every_descriptor_appears_exactly_once() {
    let graph = identity_graph();
    let resolved = graph.resolve().expect("should resolve");
    let ids = resolved.ordered_ids();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), graph.len());
    assert_eq!(unique.len(), graph.len());
}

#[test]
fn referenced_resources_precede_referencers() {
    let graph = identity_graph();
    let resolved = graph.resolve().expect("should resolve");
    let ids = resolved.ordered_ids();
    let pos = |id: &str| ids.iter().position(|x| *x == id).expect(id);
    for descriptor in &graph {
        for (_, reference) in descriptor.references() {
            assert!(
                pos(&reference.source_id) < pos(&descriptor.id),
                "{} should precede {}",
                reference.source_id,
                descriptor.id
            );
        }
    }
}

#[test]
fn resolution_is_deterministic() {
    let graph = identity_graph();
    let first = graph.resolve().expect("first").ordered_ids();
    let second = graph.resolve().expect("second").ordered_ids();
    let rebuilt = identity_graph();
    let third = rebuilt.resolve().expect("third").ordered_ids();
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn forward_declared_policy_reference_resolves() {
    let mut graph = CompositionGraph::new();
    let _ = graph
        .declare(
            ResourceDescriptor::new(ResourceKind::IamPolicyAttachment, "at")
                .with_attribute("policy_arn", stratum_compose::value::Reference::new("p", "arn")),
        )
        .expect("declare at");
    let _ = graph
        .declare(ResourceDescriptor::new(ResourceKind::IamPolicy, "p"))
        .expect("declare p");

    let resolved = graph.resolve().expect("should resolve");
    assert_eq!(resolved.ordered_ids(), vec!["p", "at"]);
}

#[test]
fn missing_policy_is_a_dangling_reference() {
    let mut graph = CompositionGraph::new();
    let _ = graph
        .declare(
            ResourceDescriptor::new(ResourceKind::IamPolicyAttachment, "at")
                .with_attribute("policy_arn", stratum_compose::value::Reference::new("p", "arn")),
        )
        .expect("declare at");

    let err = graph.resolve().unwrap_err();
    assert!(
        matches!(err, StratumError::DanglingReference { ref missing, .. } if missing == "p"),
        "got: {err}"
    );
}

#[test]
fn outputs_resolve_against_identity_graph() {
    let graph = identity_graph();
    let resolved = graph.resolve().expect("should resolve");

    let mut outputs = OutputSet::new();
    outputs
        .bind("iam-group", stratum_compose::value::Reference::new("g", "name"))
        .expect("bind group");
    outputs
        .bind("iam-role", stratum_compose::value::Reference::new("r", "arn"))
        .expect("bind role");

    let values = outputs.finalize(&resolved).expect("finalize");
    assert_eq!(values.get("iam-group"), Some(&ResolvedValue::String("ops".into())));
    assert!(matches!(
        values.get("iam-role"),
        Some(ResolvedValue::Deferred(d)) if d.id == "r" && d.attribute == "arn"
    ));
}
