//! Scaffold configuration from YAML

use crate::error::ScaffoldError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings that shape the generated pipeline and how it runs
///
/// Every field has a default, so an empty document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// GitHub organisation that owns the new repository
    pub github_org: String,

    /// Git URL of the template to clone
    pub template_repo: String,

    /// App name hard-coded in the template's `fly.toml`
    pub template_app: String,

    /// Primary region hard-coded in the template's `fly.toml`
    pub template_region: String,

    /// Fly.io organisation the app is created in
    pub fly_org: String,

    /// Credential name holding the GitHub token
    pub github_token_env: String,

    /// Credential name holding the Fly.io token
    pub fly_token_env: String,

    /// Directory the project is cloned into
    pub workspace: PathBuf,

    /// Per-step timeout in seconds (no timeout when unset)
    pub step_timeout_secs: Option<u64>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            github_org: "myrevolution-as".to_string(),
            template_repo: "https://github.com/kiliman/remix-vite-template.git".to_string(),
            template_app: "remix-vite-template".to_string(),
            template_region: "iad".to_string(),
            fly_org: "shopoffice".to_string(),
            github_token_env: "GITHUB_TOKEN".to_string(),
            fly_token_env: "FLY_API_TOKEN".to_string(),
            workspace: PathBuf::from("."),
            step_timeout_secs: None,
        }
    }
}

impl ScaffoldConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScaffoldError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScaffoldError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ScaffoldError> {
        // An empty document deserializes to unit, not a map
        let config: ScaffoldConfig = if yaml.trim().is_empty() {
            ScaffoldConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ScaffoldError> {
        let required = [
            ("github_org", &self.github_org),
            ("template_repo", &self.template_repo),
            ("template_app", &self.template_app),
            ("template_region", &self.template_region),
            ("fly_org", &self.fly_org),
            ("github_token_env", &self.github_token_env),
            ("fly_token_env", &self.fly_token_env),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ScaffoldError::InvalidArgument(format!(
                    "config field '{}' must not be empty",
                    field
                )));
            }
        }

        if self.step_timeout_secs == Some(0) {
            return Err(ScaffoldError::InvalidArgument(
                "step_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Credential names the generated pipeline refers to
    pub fn credential_names(&self) -> Vec<&str> {
        vec![self.github_token_env.as_str(), self.fly_token_env.as_str()]
    }
}
