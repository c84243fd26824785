use serde::{Deserialize, Serialize};

use super::Statement;

/// A named, versioned, ordered collection of statements.
///
/// The statement list is only ever replaced as a whole; there is no
/// per-statement patching at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Display name shown in the console.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-form version label. Not interpreted.
    pub version: String,

    #[serde(default)]
    pub statements: Vec<Statement>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

/// Input for creating a new policy.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePolicy {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

/// Input for changing a policy's descriptive fields. `None` leaves a field alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePolicyDetails {
    #[serde(default)]
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub version: Option<String>,
}

pub fn default_version() -> String {
    "1".to_string()
}

impl CreatePolicy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: default_version(),
            statements: Vec::new(),
        }
    }

    pub fn with_statements(mut self, statements: Vec<Statement>) -> Self {
        self.statements = statements;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_policy_defaults() {
        let input: CreatePolicy = serde_json::from_str(r#"{"name": "readers"}"#).unwrap();
        assert_eq!(input.version, "1");
        assert!(input.statements.is_empty());
        assert!(input.description.is_none());
    }
}
