//! # stratum-compose
//!
//! Declarative resource composition core.
//!
//! Handles:
//! - **Value**: Attribute values and forward [`Reference`](value::Reference)s.
//! - **Descriptor**: Typed resource declarations and the closed set of kinds.
//! - **Graph**: Declaration-ordered collection of resources.
//! - **Resolver**: Dependency ordering with dangling-reference and cycle checks.
//! - **Output**: Named output bindings resolved against the ordered graph.

pub mod descriptor;
pub mod graph;
pub mod output;
pub mod resolver;
pub mod value;
