use serde::{Deserialize, Serialize};

/// Placeholder substituted with a concrete identifier (or `*`).
pub const ID_PLACEHOLDER: &str = "{id}";

/// An addressable kind of resource and its URN template.
///
/// Example:
///   id = "document"
///   label = "Document"
///   urn_pattern = "urn:acme:documents::document/{id}"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: String,
    pub label: String,
    /// Template containing exactly one `{id}` placeholder.
    pub urn_pattern: String,
}

impl ResourceType {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        urn_pattern: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            urn_pattern: urn_pattern.into(),
        }
    }
}

/// A URN broken back down into its resource type and identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef<'a> {
    pub resource_type: &'a ResourceType,
    /// Trailing path segment of the URN; `*` means every resource of the type.
    pub identifier: &'a str,
}

impl ResourceRef<'_> {
    pub fn is_wildcard(&self) -> bool {
        self.identifier == "*"
    }
}
