//! The composition graph: every declared resource, in declaration order.
//!
//! Declaration never validates references. Targets may be declared later,
//! so dangling references and cycles are only detected by
//! [`resolve`](crate::resolver::resolve).

use std::collections::HashMap;

use stratum_common::error::{Result, StratumError};

use crate::descriptor::{ResourceDescriptor, ResourceKind};
use crate::resolver::{self, ResolvedGraph};
use crate::value::{Reference, Value};

/// Handle to a declared resource, used to wire references to its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    id: String,
    kind: ResourceKind,
}

impl ResourceHandle {
    /// Returns the resource id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resource kind.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns a reference to the eventual value of `name` on this resource.
    #[must_use]
    pub fn attribute(&self, name: impl Into<String>) -> Reference {
        Reference::new(self.id.clone(), name)
    }
}

/// Insertion-ordered collection of resource descriptors keyed by id.
#[derive(Debug, Default)]
pub struct CompositionGraph {
    descriptors: Vec<ResourceDescriptor>,
    index: HashMap<String, usize>,
}

impl CompositionGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a resource and returns a handle for wiring references to it.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::DuplicateId`] if the id is already declared.
    /// The graph is left unchanged in that case.
    pub fn declare(&mut self, descriptor: ResourceDescriptor) -> Result<ResourceHandle> {
        if self.index.contains_key(&descriptor.id) {
            return Err(StratumError::DuplicateId { id: descriptor.id });
        }
        tracing::debug!(id = %descriptor.id, kind = %descriptor.kind, "declaring resource");

        let handle = ResourceHandle {
            id: descriptor.id.clone(),
            kind: descriptor.kind,
        };
        let _ = self
            .index
            .insert(descriptor.id.clone(), self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(handle)
    }

    /// Sets an attribute on an already declared resource.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::NotFound`] if the handle does not belong to this graph.
    pub fn set_attribute(
        &mut self,
        handle: &ResourceHandle,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let descriptor = self
            .index
            .get(handle.id())
            .and_then(|&pos| self.descriptors.get_mut(pos))
            .filter(|d| d.kind == handle.kind())
            .ok_or_else(|| StratumError::NotFound {
                kind: "resource",
                id: handle.id().to_string(),
            })?;
        let _ = descriptor.attributes.insert(name.into(), value.into());
        Ok(())
    }

    /// Returns the descriptor with the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ResourceDescriptor> {
        self.position(id).and_then(|pos| self.at(pos))
    }

    /// Returns the descriptor declared at position `pos`.
    #[must_use]
    pub fn at(&self, pos: usize) -> Option<&ResourceDescriptor> {
        self.descriptors.get(pos)
    }

    /// Returns the declaration position of the given id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns the number of declared resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if nothing has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterates descriptors in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResourceDescriptor> {
        self.descriptors.iter()
    }

    /// Validates and orders the graph. See [`resolver::resolve`].
    ///
    /// # Errors
    ///
    /// Returns an error on a dangling reference or a reference cycle.
    pub fn resolve(&self) -> Result<ResolvedGraph<'_>> {
        resolver::resolve(self)
    }
}

impl<'a> IntoIterator for &'a CompositionGraph {
    type Item = &'a ResourceDescriptor;
    type IntoIter = std::slice::Iter<'a, ResourceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
