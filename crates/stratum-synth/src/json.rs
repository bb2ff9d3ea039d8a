//! Terraform-style JSON document emitter.
//!
//! References become `${<type>.<id>.<attribute>}` interpolations so the
//! backend can wire values it only learns at apply time. `resource` is an
//! array holding one `{ "<type>": { "<id>": { .. } } }` block per resource,
//! in resolved order.

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json, json};
use stratum_common::config::SynthConfig;
use stratum_common::constants;
use stratum_common::error::{Result, StratumError};
use stratum_compose::graph::CompositionGraph;
use stratum_compose::output::{DeferredValue, ResolvedValue};
use stratum_compose::resolver::ResolvedGraph;
use stratum_compose::value::{Reference, Value};

use crate::emitter::Emitter;

/// Emits a pretty-printed Terraform JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl JsonEmitter {
    /// Builds the document without serializing it.
    ///
    /// # Errors
    ///
    /// Returns an error if a reference targets a resource missing from the graph.
    pub fn document(
        &self,
        graph: &ResolvedGraph<'_>,
        outputs: &BTreeMap<String, ResolvedValue>,
        config: &SynthConfig,
    ) -> Result<Json> {
        let source = graph.graph();

        let mut resources: Vec<Json> = Vec::with_capacity(graph.len());
        for descriptor in graph.iter() {
            let mut body = Map::new();
            for (name, value) in &descriptor.attributes {
                let _ = body.insert(name.clone(), render_value(value, source)?);
            }
            let dependencies = graph.dependencies_of(&descriptor.id);
            tracing::debug!(
                id = %descriptor.id,
                kind = %descriptor.kind,
                dependencies = dependencies.len(),
                "emitting resource"
            );

            let mut block = Map::new();
            let _ = block.insert(descriptor.id.clone(), Json::Object(body));
            let mut typed = Map::new();
            let _ = typed.insert(descriptor.kind.type_name().to_string(), Json::Object(block));
            resources.push(Json::Object(typed));
        }

        let output_blocks: Map<String, Json> = outputs
            .iter()
            .map(|(name, value)| (name.clone(), json!({ "value": render_resolved(value) })))
            .collect();

        let provider = constants::PROVIDER_NAME;
        Ok(json!({
            "//": {
                "metadata": {
                    "generator": constants::APP_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                    "stack_name": config.stack_name,
                    "backend": "remote",
                }
            },
            "terraform": {
                "required_providers": {
                    provider: { "source": format!("hashicorp/{provider}") }
                },
                "backend": {
                    "remote": {
                        "hostname": config.backend.hostname,
                        "organization": config.backend.organization,
                        "workspaces": { "name": config.backend.workspace },
                    }
                }
            },
            "provider": {
                provider: [{ "region": config.region }]
            },
            "resource": resources,
            "output": output_blocks,
        }))
    }
}

impl Emitter for JsonEmitter {
    fn emit(
        &self,
        graph: &ResolvedGraph<'_>,
        outputs: &BTreeMap<String, ResolvedValue>,
        config: &SynthConfig,
    ) -> Result<String> {
        tracing::info!(resources = graph.len(), outputs = outputs.len(), "emitting JSON document");
        let document = self.document(graph, outputs, config)?;
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

fn interpolation(type_name: &str, id: &str, attribute: &str) -> Json {
    Json::String(format!("${{{type_name}.{id}.{attribute}}}"))
}

fn render_reference(reference: &Reference, graph: &CompositionGraph) -> Result<Json> {
    let target = graph
        .get(&reference.source_id)
        .ok_or_else(|| StratumError::NotFound {
            kind: "resource",
            id: reference.source_id.clone(),
        })?;
    Ok(interpolation(
        target.kind.type_name(),
        &target.id,
        &reference.attribute,
    ))
}

fn render_value(value: &Value, graph: &CompositionGraph) -> Result<Json> {
    Ok(match value {
        Value::String(s) => Json::String(s.clone()),
        Value::Integer(n) => Json::from(*n),
        Value::Bool(b) => Json::Bool(*b),
        Value::List(items) => Json::Array(
            items
                .iter()
                .map(|v| render_value(v, graph))
                .collect::<Result<_>>()?,
        ),
        Value::Map(entries) => {
            let mut object = Map::new();
            for (k, v) in entries {
                let _ = object.insert(k.clone(), render_value(v, graph)?);
            }
            Json::Object(object)
        }
        Value::Ref(reference) => render_reference(reference, graph)?,
    })
}

fn render_resolved(value: &ResolvedValue) -> Json {
    match value {
        ResolvedValue::String(s) => Json::String(s.clone()),
        ResolvedValue::Integer(n) => Json::from(*n),
        ResolvedValue::Bool(b) => Json::Bool(*b),
        ResolvedValue::List(items) => Json::Array(items.iter().map(render_resolved).collect()),
        ResolvedValue::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), render_resolved(v)))
                .collect(),
        ),
        ResolvedValue::Deferred(DeferredValue {
            kind,
            id,
            attribute,
        }) => interpolation(kind.type_name(), id, attribute),
    }
}
