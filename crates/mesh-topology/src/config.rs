//! Serializable processing configurations.
//!
//! A [`PipelineConfig`] bundles the finalize and gradient limiting
//! parameters so a whole run can be described in a TOML or JSON file:
//!
//! ```toml
//! name = "coastal"
//!
//! [finalize]
//! sieve_area = 0.5
//! max_iterations = 50
//!
//! [limgrad]
//! dfdx = 0.2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MeshError, MeshResult};
use crate::finalize::{finalize_mesh, FinalizeParams, FinalizeReport};
use crate::limgrad::{limit_gradient, LimgradParams, LimgradReport};
use crate::Mesh;

/// Parameters for a finalize run, optionally followed by gradient limiting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub finalize: FinalizeParams,

    /// Gradient limiting is skipped when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limgrad: Option<LimgradParams>,
}

/// Result of [`PipelineConfig::run`].
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub finalize: FinalizeReport,
    pub limgrad: Option<LimgradReport>,
}

impl PipelineConfig {
    /// Empty config with a name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn finalize(mut self, params: FinalizeParams) -> Self {
        self.finalize = params;
        self
    }

    pub fn limgrad(mut self, params: LimgradParams) -> Self {
        self.limgrad = Some(params);
        self
    }

    pub fn from_toml(input: &str) -> MeshResult<Self> {
        toml::from_str(input).map_err(|e| MeshError::ConfigError {
            details: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> MeshResult<String> {
        toml::to_string_pretty(self).map_err(|e| MeshError::ConfigError {
            details: e.to_string(),
        })
    }

    pub fn from_json(input: &str) -> MeshResult<Self> {
        serde_json::from_str(input).map_err(|e| MeshError::ConfigError {
            details: e.to_string(),
        })
    }

    pub fn to_json(&self) -> MeshResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MeshError::ConfigError {
            details: e.to_string(),
        })
    }

    /// Load a config file; `.json` is parsed as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MeshError::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json(&text)
        } else {
            Self::from_toml(&text)
        };

        parsed.map_err(|e| match e {
            MeshError::ConfigError { details } => MeshError::ConfigError {
                details: format!("{}: {}", path.display(), details),
            },
            other => other,
        })
    }

    pub fn save_toml(&self, path: impl AsRef<Path>) -> MeshResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml()?).map_err(|e| MeshError::IoWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Finalize `mesh`, then limit its gradient if configured.
    ///
    /// Both steps run on a copy; the mesh is replaced only if both succeed.
    pub fn run(&self, mesh: &mut Mesh) -> MeshResult<PipelineReport> {
        info!(
            "Running pipeline {}",
            self.name.as_deref().unwrap_or("<unnamed>")
        );

        let mut work = mesh.clone();
        let finalize = finalize_mesh(&mut work, &self.finalize)?;
        let limgrad = match &self.limgrad {
            Some(params) => Some(limit_gradient(&mut work, params)?),
            None => None,
        };

        *mesh = work;
        Ok(PipelineReport { finalize, limgrad })
    }
}
