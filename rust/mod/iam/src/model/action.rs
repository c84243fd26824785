use serde::{Deserialize, Serialize};

/// A permission identifier offered by the console, e.g. `documents:GetDocument`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// `service:Verb`, `service:*` or bare `*`.
    pub action: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl ActionDefinition {
    pub fn new(action: &str, label: &str, description: &str) -> Self {
        Self {
            action: action.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }

    /// True for `*` and `service:*`.
    pub fn is_wildcard(&self) -> bool {
        self.action == "*" || self.action.ends_with(":*")
    }
}

/// A named group of actions, displayed as one section of the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub actions: Vec<ActionDefinition>,
}
