//! Unified error types for the Stratum workspace.
//!
//! The composition failures (duplicate ids and output names, dangling and
//! unresolved references, cycles) are terminal for a synthesis run.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum StratumError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required item was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing item.
        kind: &'static str,
        /// Identifier of the missing item.
        id: String,
    },

    /// A resource was declared with an id that is already taken.
    #[error("duplicate resource id: \"{id}\"")]
    DuplicateId {
        /// The colliding id.
        id: String,
    },

    /// An output was bound under a name that is already taken.
    #[error("duplicate output name: \"{name}\"")]
    DuplicateOutputName {
        /// The colliding output name.
        name: String,
    },

    /// A resource attribute references a resource that was never declared.
    #[error(
        "resource \"{resource}\" references undeclared resource \"{missing}\" \
         (attribute {attribute} -> {missing}.{target_attribute})"
    )]
    DanglingReference {
        /// Id of the resource holding the reference.
        resource: String,
        /// Id of the missing target.
        missing: String,
        /// Attribute of the referencing resource that holds the reference.
        attribute: String,
        /// Attribute path the reference points at on the missing target.
        target_attribute: String,
    },

    /// The reference edges form a cycle.
    #[error("reference cycle detected: {}", .cycle.join(" -> "))]
    Cycle {
        /// Ids on the cycle, the first id repeated at the end.
        cycle: Vec<String>,
    },

    /// An output references a resource that was never declared.
    #[error("output \"{output}\" references undeclared resource \"{missing}\" (attribute {attribute})")]
    UnresolvedReference {
        /// Name of the output binding.
        output: String,
        /// Id of the missing target.
        missing: String,
        /// Attribute path the reference points at.
        attribute: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StratumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_every_hop() {
        let err = StratumError::Cycle {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "reference cycle detected: a -> b -> a");
    }

    #[test]
    fn dangling_message_names_missing_id() {
        let err = StratumError::DanglingReference {
            resource: "m".into(),
            missing: "ghost".into(),
            attribute: "users".into(),
            target_attribute: "name".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"ghost\""), "got: {msg}");
        assert!(msg.contains("\"m\""), "got: {msg}");
        assert!(msg.contains("users -> ghost.name"), "got: {msg}");
    }
}
