//! The emitter seam.

use std::collections::BTreeMap;

use stratum_common::config::SynthConfig;
use stratum_common::error::Result;
use stratum_compose::output::ResolvedValue;
use stratum_compose::resolver::ResolvedGraph;

/// Produces a backend-specific artifact from a resolved graph and its outputs.
///
/// Implementations may rely on `graph` iterating resources in dependency
/// order. The configuration is passed through unvalidated.
pub trait Emitter {
    /// Renders the artifact as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be rendered.
    fn emit(
        &self,
        graph: &ResolvedGraph<'_>,
        outputs: &BTreeMap<String, ResolvedValue>,
        config: &SynthConfig,
    ) -> Result<String>;
}
