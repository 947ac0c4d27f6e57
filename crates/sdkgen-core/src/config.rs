//! Project configuration (`build.yml`)

use crate::error::{GenError, GenResult};
use crate::stub::substitute_path_tokens;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name of the project configuration, at the project root
pub const PROJECT_FILE: &str = "build.yml";

/// Root of `build.yml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_version", deserialize_with = "version_string")]
    pub version: String,

    /// Enabled backend ids, built in this order
    #[serde(default = "default_outputs")]
    pub outputs: Vec<String>,

    #[serde(default)]
    pub endpoints: Endpoints,

    /// Per-backend settings keyed by backend id
    #[serde(default)]
    pub config: BTreeMap<String, BackendConfig>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            version: default_version(),
            outputs: default_outputs(),
            endpoints: Endpoints::default(),
            config: BTreeMap::new(),
        }
    }
}

fn default_version() -> String {
    "0.0.0".to_string()
}

/// Accept `version: 1.0` (a YAML float) as well as quoted strings
fn version_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a version string, got {other:?}"
        ))),
    }
}

fn default_outputs() -> Vec<String> {
    vec!["js".to_string()]
}

/// API base URLs baked into the generated clients
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Endpoints {
    #[serde(default)]
    pub production: String,
    #[serde(default)]
    pub sandbox: String,
    #[serde(default)]
    pub local: String,
}

/// `build.config.<backend>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    /// Output directory template, relative to the project directory
    #[serde(rename = "outputPath", alias = "output_path", default)]
    pub output_path: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub internal_name: Option<String>,

    #[serde(default)]
    pub keyword: Option<String>,

    #[serde(default)]
    pub github: Option<String>,

    #[serde(default)]
    pub namespace: Option<String>,
}

impl BackendConfig {
    /// Named option or the backend's fallback
    pub fn option_or<'a>(&'a self, value: &'a Option<String>, fallback: &'a str) -> &'a str {
        value.as_deref().unwrap_or(fallback)
    }
}

impl ProjectConfig {
    /// Load `build.yml` from a project directory
    pub fn from_project_dir(project_dir: impl AsRef<Path>) -> GenResult<Self> {
        let path = project_dir.as_ref().join(PROJECT_FILE);
        if !path.is_file() {
            return Err(GenError::Configuration(format!(
                "project file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?;
        Self::from_str(&content)
    }

    /// Parse configuration from YAML text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> GenResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| GenError::Configuration(format!("invalid {PROJECT_FILE}: {e}")))
    }

    pub fn version(&self) -> &str {
        &self.build.version
    }

    /// Settings for one backend; empty settings when the block is absent
    pub fn backend(&self, id: &str) -> BackendConfig {
        self.build.config.get(id).cloned().unwrap_or_default()
    }

    /// Resolve a backend's output root, applying `[version]` and
    /// `[backend]` tokens
    pub fn output_dir(&self, project_dir: &Path, id: &str) -> GenResult<PathBuf> {
        let template = self.backend(id).output_path.ok_or_else(|| {
            GenError::Configuration(format!("build.config.{id}.outputPath is not set"))
        })?;
        let resolved = substitute_path_tokens(
            &template,
            &[("version", self.version()), ("backend", id)],
        );
        Ok(project_dir.join(resolved))
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
