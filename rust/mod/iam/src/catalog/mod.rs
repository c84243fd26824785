//! Static reference data: resource types and actions.
//!
//! Built once from [`IamConfig`] at startup and shared by reference.

mod actions;
mod resources;

pub use actions::ActionCatalog;
pub use resources::{PatternOverlap, ResourceRegistry};

use crate::config::IamConfig;
use crate::error::IamError;
use crate::model::{ActionCategory, ActionDefinition, ResourceType};

/// The two immutable catalogs the editor and display layer consult.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub resources: ResourceRegistry,
    pub actions: ActionCatalog,
}

impl Catalogs {
    pub fn from_config(config: &IamConfig) -> Result<Self, IamError> {
        let resource_types = match &config.resource_types {
            Some(types) => types
                .iter()
                .map(|t| ResourceType {
                    urn_pattern: t.urn_pattern.replace("{ns}", &config.namespace),
                    ..t.clone()
                })
                .collect(),
            None => default_resource_types(&config.namespace),
        };
        let categories = config
            .action_categories
            .clone()
            .unwrap_or_else(default_action_categories);

        Ok(Self {
            resources: ResourceRegistry::new(resource_types)?,
            actions: ActionCatalog::new(categories),
        })
    }
}

/// Built-in resource types for namespace `ns`.
pub fn default_resource_types(ns: &str) -> Vec<ResourceType> {
    [
        ("organization", "Organization", "organizations"),
        ("project", "Project", "projects"),
        ("document", "Document", "documents"),
        ("version", "Version", "documents"),
        ("bucket", "Bucket", "storage"),
        ("user", "User", "iam"),
        ("group", "Group", "iam"),
    ]
    .into_iter()
    .map(|(id, label, service)| {
        ResourceType::new(id, label, format!("urn:{ns}:{service}::{id}/{{id}}"))
    })
    .collect()
}

/// Built-in action taxonomy.
pub fn default_action_categories() -> Vec<ActionCategory> {
    fn category(name: &str, description: &str, actions: &[(&str, &str, &str)]) -> ActionCategory {
        ActionCategory {
            name: name.to_string(),
            description: description.to_string(),
            actions: actions
                .iter()
                .map(|(a, l, d)| ActionDefinition::new(a, l, d))
                .collect(),
        }
    }

    vec![
        category("Documents", "Read and manage documents", &[
            ("documents:ListDocuments", "List documents", "List documents in a project"),
            ("documents:GetDocument", "Get document", "Read document metadata and content"),
            ("documents:CreateDocument", "Create document", "Create a new document"),
            ("documents:UpdateDocument", "Update document", "Change document metadata"),
            ("documents:DeleteDocument", "Delete document", "Delete a document and its versions"),
        ]),
        category("Versions", "Document version history", &[
            ("documents:ListVersions", "List versions", "List the versions of a document"),
            ("documents:GetVersion", "Get version", "Read a specific version"),
            ("documents:CreateVersion", "Upload version", "Upload a new version"),
            ("documents:DownloadVersion", "Download version", "Download version content"),
            ("documents:DeleteVersion", "Delete version", "Delete a single version"),
        ]),
        category("Organizations", "Organization administration", &[
            ("organizations:ListOrganizations", "List organizations", "List organizations"),
            ("organizations:GetOrganization", "Get organization", "Read organization details"),
            ("organizations:CreateOrganization", "Create organization", "Create an organization"),
            ("organizations:UpdateOrganization", "Update organization", "Change organization details"),
            ("organizations:DeleteOrganization", "Delete organization", "Delete an organization"),
        ]),
        category("Projects", "Project administration", &[
            ("projects:ListProjects", "List projects", "List projects in an organization"),
            ("projects:GetProject", "Get project", "Read project details"),
            ("projects:CreateProject", "Create project", "Create a project"),
            ("projects:UpdateProject", "Update project", "Change project details"),
            ("projects:DeleteProject", "Delete project", "Delete a project"),
        ]),
        category("Storage", "Storage buckets", &[
            ("storage:ListBuckets", "List buckets", "List storage buckets"),
            ("storage:GetBucket", "Get bucket", "Read bucket configuration"),
            ("storage:CreateBucket", "Create bucket", "Create a bucket"),
            ("storage:UpdateBucket", "Update bucket", "Change bucket configuration"),
            ("storage:DeleteBucket", "Delete bucket", "Delete an empty bucket"),
        ]),
        category("Identity & Access", "Users, groups and policies", &[
            ("iam:ListUsers", "List users", "List users"),
            ("iam:GetUser", "Get user", "Read a user profile"),
            ("iam:CreateUser", "Create user", "Create a user"),
            ("iam:UpdateUser", "Update user", "Change a user profile"),
            ("iam:DeleteUser", "Delete user", "Delete a user"),
            ("iam:ListGroups", "List groups", "List groups"),
            ("iam:GetGroup", "Get group", "Read group details and members"),
            ("iam:CreateGroup", "Create group", "Create a group"),
            ("iam:UpdateGroup", "Update group", "Change group details and members"),
            ("iam:DeleteGroup", "Delete group", "Delete a group"),
            ("iam:ListPolicies", "List policies", "List policies"),
            ("iam:GetPolicy", "Get policy", "Read a policy and its statements"),
            ("iam:CreatePolicy", "Create policy", "Create a policy"),
            ("iam:UpdatePolicy", "Update policy", "Replace a policy's statements"),
            ("iam:DeletePolicy", "Delete policy", "Delete a policy"),
            ("iam:AttachPolicy", "Attach policy", "Attach a policy to a user or group"),
            ("iam:DetachPolicy", "Detach policy", "Detach a policy from a user or group"),
        ]),
        category("Wildcards", "Match many actions at once", &[
            ("*", "All actions", "Every action in every service"),
            ("documents:*", "All document actions", "Every documents action"),
            ("organizations:*", "All organization actions", "Every organizations action"),
            ("projects:*", "All project actions", "Every projects action"),
            ("storage:*", "All storage actions", "Every storage action"),
            ("iam:*", "All IAM actions", "Every iam action"),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let types = default_resource_types("acme");
        assert_eq!(types.len(), 7);
        assert_eq!(types[2].urn_pattern, "urn:acme:documents::document/{id}");
        assert_eq!(types[5].urn_pattern, "urn:acme:iam::user/{id}");
    }

    #[test]
    fn test_from_config_substitutes_namespace() {
        let config = IamConfig {
            namespace: "acme".into(),
            resource_types: Some(vec![ResourceType::new(
                "report",
                "Report",
                "urn:{ns}:bi::report/{id}",
            )]),
            action_categories: None,
        };
        let catalogs = Catalogs::from_config(&config).unwrap();
        assert_eq!(
            catalogs.resources.resolve("report", "*").unwrap(),
            "urn:acme:bi::report/*"
        );
        assert_eq!(catalogs.actions.label_of("iam:AttachPolicy"), "Attach policy");
    }
}
