use docadmin_core::{ListParams, ListResult, new_id, now_rfc3339};
use tracing::info;

use crate::error::IamError;
use crate::model::{CreatePolicy, Policy, Statement, UpdatePolicyDetails};
use crate::service::IamService;
use crate::validate::validate_list;

impl IamService {
    /// Create a policy with its initial (possibly empty) statement list.
    pub fn create_policy(&self, input: CreatePolicy) -> Result<Policy, IamError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(IamError::Validation("policy name cannot be empty".into()));
        }
        validate_list(&input.statements)?;

        let now = now_rfc3339();
        let policy = Policy {
            id: new_id(),
            name: name.to_string(),
            description: input.description,
            version: input.version,
            statements: input.statements,
            created_at: now.clone(),
            updated_at: now,
        };
        self.store.insert_policy(&policy)?;

        info!(policy_id = %policy.id, name = %policy.name, "policy created");
        Ok(policy)
    }

    pub fn get_policy(&self, id: &str) -> Result<Policy, IamError> {
        self.store.get_policy(id)
    }

    /// List policies by name with pagination.
    pub fn list_policies(&self, params: &ListParams) -> Result<ListResult<Policy>, IamError> {
        let mut policies = self.store.list_policies()?;
        policies.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(params.page(policies))
    }

    /// Replace a policy's whole statement list. Nothing is written unless
    /// the new list validates.
    pub fn save_statements(
        &self,
        id: &str,
        statements: Vec<Statement>,
    ) -> Result<Policy, IamError> {
        validate_list(&statements)?;

        let mut policy = self.store.get_policy(id)?;
        policy.statements = statements;
        policy.updated_at = now_rfc3339();
        self.store.update_policy(&policy)?;

        info!(policy_id = %id, statements = policy.statements.len(), "policy statements saved");
        Ok(policy)
    }

    /// Change name, description or version. Statements are untouched.
    pub fn update_details(
        &self,
        id: &str,
        input: UpdatePolicyDetails,
    ) -> Result<Policy, IamError> {
        let mut policy = self.store.get_policy(id)?;

        if let Some(name) = input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(IamError::Validation("policy name cannot be empty".into()));
            }
            policy.name = name.to_string();
        }
        if let Some(description) = input.description {
            policy.description = description;
        }
        if let Some(version) = input.version {
            policy.version = version;
        }
        policy.updated_at = now_rfc3339();
        self.store.update_policy(&policy)?;
        Ok(policy)
    }

    /// Delete a policy and every attachment it has.
    pub fn delete_policy(&self, id: &str) -> Result<(), IamError> {
        self.store.delete_policy(id)?;
        info!(policy_id = %id, "policy deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Conditions, Effect};
    use crate::store::MemoryStore;
    use crate::validate::StatementField;
    use std::sync::Arc;

    fn test_service() -> Arc<IamService> {
        IamService::new(Arc::new(MemoryStore::new()))
    }

    fn allow_all() -> Statement {
        Statement::new(Effect::Allow).with_actions(["*"]).with_resources(["*"])
    }

    #[test]
    fn test_policy_crud() {
        let svc = test_service();

        let p = svc
            .create_policy(CreatePolicy::new("  Readers ").with_statements(vec![allow_all()]))
            .unwrap();
        assert_eq!(p.name, "Readers");
        assert_eq!(p.version, "1");
        assert_eq!(svc.get_policy(&p.id).unwrap(), p);

        let updated = svc
            .update_details(&p.id, UpdatePolicyDetails {
                description: Some(Some("read-only".into())),
                version: Some("2026-10".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("read-only"));
        assert_eq!(updated.version, "2026-10");
        assert_eq!(updated.statements, vec![allow_all()]);

        svc.delete_policy(&p.id).unwrap();
        assert_eq!(svc.get_policy(&p.id), Err(IamError::PolicyNotFound(p.id.clone())));
    }

    #[test]
    fn test_create_rejects_empty_name_and_invalid_statements() {
        let svc = test_service();
        assert!(matches!(
            svc.create_policy(CreatePolicy::new("   ")),
            Err(IamError::Validation(_))
        ));

        let bad = Statement::new(Effect::Deny).with_actions(["*"]);
        match svc.create_policy(CreatePolicy::new("x").with_statements(vec![allow_all(), bad])) {
            Err(IamError::Statement(e)) => {
                assert_eq!(e.statement_index, 1);
                assert_eq!(e.field, StatementField::Resources);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(svc.list_policies(&ListParams::default()).unwrap().total, 0);
    }

    #[test]
    fn test_empty_statement_list_is_a_valid_policy() {
        let svc = test_service();
        let p = svc.create_policy(CreatePolicy::new("empty")).unwrap();
        assert!(p.statements.is_empty());
    }

    #[test]
    fn test_save_replaces_whole_list_atomically() {
        let svc = test_service();
        let with_conditions = allow_all()
            .with_conditions(Conditions::from_json(r#"{"Bool":{"mfa":true}}"#).unwrap());
        let p = svc
            .create_policy(CreatePolicy::new("p").with_statements(vec![with_conditions.clone()]))
            .unwrap();

        // Invalid list: nothing changes.
        let err = svc
            .save_statements(&p.id, vec![Statement::new(Effect::Allow)])
            .unwrap_err();
        assert!(matches!(err, IamError::Statement(_)));
        assert_eq!(svc.get_policy(&p.id).unwrap().statements, vec![with_conditions.clone()]);

        let deny = Statement::new(Effect::Deny)
            .with_actions(["documents:DeleteDocument"])
            .with_resources(["*"]);
        let saved = svc
            .save_statements(&p.id, vec![deny.clone(), with_conditions.clone()])
            .unwrap();
        assert_eq!(saved.statements, vec![deny, with_conditions]);
        assert_eq!(svc.get_policy(&p.id).unwrap(), saved);
    }

    #[test]
    fn test_list_is_sorted_by_name_and_paged() {
        let svc = test_service();
        for name in ["charlie", "alpha", "bravo"] {
            svc.create_policy(CreatePolicy::new(name)).unwrap();
        }
        let page = svc
            .list_policies(&ListParams { limit: 2, offset: 0 })
            .unwrap();
        assert_eq!(page.total, 3);
        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "bravo"]);
    }
}
