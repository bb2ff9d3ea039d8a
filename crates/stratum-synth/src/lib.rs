//! # stratum-synth
//!
//! Turns a resolved stack into an artifact a provisioning backend can consume.
//!
//! - [`Emitter`](emitter::Emitter): The seam between the composition core and a backend.
//! - [`JsonEmitter`](json::JsonEmitter): Renders a Terraform-style JSON document.
//! - [`write_artifact`](artifact::write_artifact): Persists an emitted document.

pub mod artifact;
pub mod emitter;
pub mod json;
