//! A named stack: one composition graph plus its outputs.
//!
//! Replaces ambient app/stack registration with an explicit value that is
//! built, synthesized once, and discarded.

use std::collections::BTreeMap;

use stratum_common::error::Result;
use stratum_compose::descriptor::ResourceDescriptor;
use stratum_compose::graph::{CompositionGraph, ResourceHandle};
use stratum_compose::output::{OutputSet, ResolvedValue};
use stratum_compose::resolver::ResolvedGraph;
use stratum_compose::value::Value;

/// A declared stack of resources and outputs.
#[derive(Debug)]
pub struct Stack {
    name: String,
    graph: CompositionGraph,
    outputs: OutputSet,
}

/// The result of synthesizing a [`Stack`]: what an emitter consumes.
#[derive(Debug)]
pub struct Synthesis<'a> {
    /// Stack name.
    pub name: &'a str,
    /// Resources in dependency order.
    pub resolved: ResolvedGraph<'a>,
    /// Finalized outputs.
    pub outputs: &'a BTreeMap<String, ResolvedValue>,
}

impl Stack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: CompositionGraph::new(),
            outputs: OutputSet::new(),
        }
    }

    /// Returns the stack name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the composition graph.
    #[must_use]
    pub const fn graph(&self) -> &CompositionGraph {
        &self.graph
    }

    /// Declares a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource id is already declared.
    pub fn add(&mut self, descriptor: ResourceDescriptor) -> Result<ResourceHandle> {
        self.graph.declare(descriptor)
    }

    /// Binds a named output.
    ///
    /// # Errors
    ///
    /// Returns an error if the output name is already bound.
    pub fn output(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.outputs.bind(name, value)
    }

    /// Resolves the graph and finalizes the outputs.
    ///
    /// # Errors
    ///
    /// Returns the first composition error: a dangling reference, a cycle,
    /// or an output referencing an undeclared resource.
    pub fn synthesize(&mut self) -> Result<Synthesis<'_>> {
        tracing::info!(stack = %self.name, resources = self.graph.len(), "synthesizing stack");
        let resolved = self.graph.resolve()?;
        let outputs = self.outputs.finalize(&resolved)?;
        Ok(Synthesis {
            name: &self.name,
            resolved,
            outputs,
        })
    }
}
