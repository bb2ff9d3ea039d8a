//! Dependency resolution using `petgraph`.
//!
//! Builds a directed graph from the references embedded in resource
//! attributes and produces a stable topological ordering: resources that
//! are not related by a reference keep their declaration order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use stratum_common::error::{Result, StratumError};

use crate::descriptor::ResourceDescriptor;
use crate::graph::CompositionGraph;

/// A validated composition graph with its dependency ordering.
///
/// Borrows the [`CompositionGraph`], which therefore cannot be changed
/// while the resolved view is alive.
#[derive(Debug)]
pub struct ResolvedGraph<'g> {
    source: &'g CompositionGraph,
    /// Node weights are declaration positions; node indices match them.
    deps: DiGraph<usize, ()>,
    order: Vec<usize>,
}

impl<'g> ResolvedGraph<'g> {
    /// Returns the underlying composition graph.
    #[must_use]
    pub const fn graph(&self) -> &'g CompositionGraph {
        self.source
    }

    /// Returns the number of resolved resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the graph held no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates descriptors in dependency order.
    pub fn iter(&self) -> impl Iterator<Item = &'g ResourceDescriptor> + '_ {
        let source = self.source;
        self.order.iter().filter_map(move |&pos| source.at(pos))
    }

    /// Returns resource ids in dependency order.
    #[must_use]
    pub fn ordered_ids(&self) -> Vec<&'g str> {
        self.iter().map(|d| d.id.as_str()).collect()
    }

    /// Returns the ids a resource references directly, in declaration order.
    #[must_use]
    pub fn dependencies_of(&self, id: &str) -> Vec<&'g str> {
        let Some(pos) = self.source.position(id) else {
            return Vec::new();
        };
        let mut deps: Vec<usize> = self
            .deps
            .neighbors_directed(NodeIndex::new(pos), Direction::Incoming)
            .map(NodeIndex::index)
            .collect();
        deps.sort_unstable();
        deps.into_iter().filter_map(|p| self.id_at(p)).collect()
    }

    /// Returns every `(dependency, dependent)` edge, ordered by dependent then dependency.
    #[must_use]
    pub fn edges(&self) -> Vec<(&'g str, &'g str)> {
        let mut pairs: Vec<(usize, usize)> = self
            .deps
            .edge_indices()
            .filter_map(|e| self.deps.edge_endpoints(e))
            .map(|(from, to)| (from.index(), to.index()))
            .collect();
        pairs.sort_unstable_by_key(|&(from, to)| (to, from));
        pairs
            .into_iter()
            .filter_map(|(from, to)| Some((self.id_at(from)?, self.id_at(to)?)))
            .collect()
    }

    fn id_at(&self, pos: usize) -> Option<&'g str> {
        self.source.at(pos).map(|d| d.id.as_str())
    }
}

/// Validates the graph and orders its resources so that every resource
/// comes after everything it references.
///
/// # Errors
///
/// - [`StratumError::DanglingReference`] if a reference names an undeclared id.
/// - [`StratumError::Cycle`] if references form a cycle; the reported cycle
///   starts at its earliest-declared resource and repeats it at the end.
pub fn resolve(graph: &CompositionGraph) -> Result<ResolvedGraph<'_>> {
    tracing::info!(resources = graph.len(), "resolving composition graph");
    let deps = build_dependency_graph(graph)?;

    let mut in_degree: Vec<usize> = deps
        .node_indices()
        .map(|n| deps.neighbors_directed(n, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(pos, _)| Reverse(pos))
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(Reverse(pos)) = ready.pop() {
        order.push(pos);
        for next in deps.neighbors_directed(NodeIndex::new(pos), Direction::Outgoing) {
            let degree = &mut in_degree[next.index()];
            *degree -= 1;
            if *degree == 0 {
                ready.push(Reverse(next.index()));
            }
        }
    }

    if order.len() < graph.len() {
        let cycle = find_cycle(&deps)
            .into_iter()
            .filter_map(|pos| graph.at(pos).map(|d| d.id.clone()))
            .collect();
        return Err(StratumError::Cycle { cycle });
    }

    tracing::info!(edges = deps.edge_count(), "composition graph resolved");
    Ok(ResolvedGraph {
        source: graph,
        deps,
        order,
    })
}

/// Builds the edge set `target -> referencer`, rejecting dangling references.
fn build_dependency_graph(graph: &CompositionGraph) -> Result<DiGraph<usize, ()>> {
    let mut deps = DiGraph::with_capacity(graph.len(), 0);
    for pos in 0..graph.len() {
        let _ = deps.add_node(pos);
    }

    for (pos, descriptor) in graph.iter().enumerate() {
        for (attribute, reference) in descriptor.references() {
            let target = graph.position(&reference.source_id).ok_or_else(|| {
                StratumError::DanglingReference {
                    resource: descriptor.id.clone(),
                    missing: reference.source_id.clone(),
                    attribute: attribute.to_string(),
                    target_attribute: reference.attribute.clone(),
                }
            })?;
            tracing::debug!(from = %reference.source_id, to = %descriptor.id, "reference edge");
            let _ = deps.update_edge(NodeIndex::new(target), NodeIndex::new(pos), ());
        }
    }
    Ok(deps)
}

/// Finds the cycle through the earliest-declared resource that lies on one.
///
/// Walks in reference direction (from a resource to what it references),
/// breadth-first so the reported cycle is the shortest through that start.
fn find_cycle(deps: &DiGraph<usize, ()>) -> Vec<usize> {
    let cyclic: Vec<Vec<NodeIndex>> = petgraph::algo::tarjan_scc(deps)
        .into_iter()
        .filter(|scc| scc.len() > 1 || scc.iter().any(|&n| deps.contains_edge(n, n)))
        .collect();
    let Some(start) = cyclic.iter().flatten().copied().min() else {
        return Vec::new();
    };
    let members: HashSet<NodeIndex> = cyclic
        .into_iter()
        .find(|scc| scc.contains(&start))
        .unwrap_or_default()
        .into_iter()
        .collect();

    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        let mut referenced: Vec<NodeIndex> = deps
            .neighbors_directed(node, Direction::Incoming)
            .filter(|n| members.contains(n))
            .collect();
        referenced.sort_unstable();

        for next in referenced {
            if next == start {
                let mut path = vec![node.index()];
                let mut cursor = node;
                while let Some(&prev) = parent.get(&cursor) {
                    path.push(prev.index());
                    cursor = prev;
                }
                path.reverse();
                path.push(start.index());
                return path;
            }
            if !parent.contains_key(&next) {
                let _ = parent.insert(next, node);
                queue.push_back(next);
            }
        }
    }
    Vec::new()
}
