//! Synthesis configuration model.
//!
//! Every value here is passed through to the provisioning backend untouched.
//! The only check performed is that the identifiers are not blank.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, StratumError};

/// Root configuration for a synthesis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Name of the stack; also the stem of the emitted artifact.
    pub stack_name: String,
    /// Cloud region for the provider block.
    pub region: String,
    /// Remote backend settings.
    pub backend: RemoteBackendConfig,
    /// Directory the artifact is written into.
    pub output_dir: PathBuf,
}

/// Remote state backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteBackendConfig {
    /// Backend hostname.
    pub hostname: String,
    /// Organization owning the workspace.
    pub organization: String,
    /// Named workspace.
    pub workspace: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            stack_name: constants::DEFAULT_STACK_NAME.to_string(),
            region: constants::DEFAULT_REGION.to_string(),
            backend: RemoteBackendConfig::default(),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Default for RemoteBackendConfig {
    fn default() -> Self {
        Self {
            hostname: constants::DEFAULT_BACKEND_HOSTNAME.to_string(),
            organization: constants::DEFAULT_ORGANIZATION.to_string(),
            workspace: constants::DEFAULT_WORKSPACE.to_string(),
        }
    }
}

impl SynthConfig {
    /// Loads a configuration from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or fails [`SynthConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "loading synthesis configuration");
        let content = std::fs::read_to_string(path).map_err(|e| StratumError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the pass-through identifiers are not blank.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::Config`] naming the first blank field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("stack_name", &self.stack_name),
            ("region", &self.region),
            ("backend.hostname", &self.backend.hostname),
            ("backend.organization", &self.backend.organization),
            ("backend.workspace", &self.backend.workspace),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(StratumError::Config {
                    message: format!("{field} must not be empty"),
                });
            }
        }
        Ok(())
    }

    /// Returns the path of the artifact inside the output directory.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}",
            self.stack_name,
            constants::ARTIFACT_EXTENSION
        ))
    }
}
