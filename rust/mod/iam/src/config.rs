//! Catalog configuration.
//!
//! Reads an optional TOML file:
//!
//! ```toml
//! namespace = "acme"
//!
//! [[resource_types]]
//! id = "document"
//! label = "Document"
//! urn_pattern = "urn:{ns}:documents::document/{id}"
//!
//! [[action_categories]]
//! name = "Documents"
//! description = "Read and manage documents"
//! actions = [
//!   { action = "documents:GetDocument", label = "Get document" },
//! ]
//! ```
//!
//! Omitted lists fall back to the built-in catalogs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IamError;
use crate::model::{ActionCategory, ResourceType};

/// Catalog configuration loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamConfig {
    /// URN namespace, the `<ns>` in `urn:<ns>:documents::document/42`.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Resource types in registration order. `{ns}` in a pattern is
    /// replaced with `namespace`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<ResourceType>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_categories: Option<Vec<ActionCategory>>,
}

fn default_namespace() -> String {
    "docadmin".to_string()
}

impl Default for IamConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            resource_types: None,
            action_categories: None,
        }
    }
}

impl IamConfig {
    /// Load config from disk, or return the default if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, IamError> {
        if !path.exists() {
            info!("no catalog config at {}, using built-in catalogs", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| IamError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, IamError> {
        let config: IamConfig =
            toml::from_str(content).map_err(|e| IamError::Config(e.to_string()))?;
        if config.namespace.is_empty() || config.namespace.contains(':') {
            return Err(IamError::Config(format!(
                "namespace must be non-empty and contain no ':' (got {:?})",
                config.namespace
            )));
        }
        Ok(config)
    }
}
