use std::collections::HashSet;

use docadmin_core::{new_id, now_rfc3339};
use tracing::{info, warn};

use crate::error::IamError;
use crate::model::{AttachedPolicy, Policy, PolicyAttachment, PrincipalUrn};
use crate::service::IamService;

impl IamService {
    /// Attach a policy to a user or group.
    ///
    /// The store rejects a second attachment of the same pair with
    /// `AlreadyAttached`; this is never retried.
    pub fn attach(&self, policy_id: &str, principal_urn: &str) -> Result<PolicyAttachment, IamError> {
        let principal = PrincipalUrn::parse(principal_urn)?;

        let attachment = PolicyAttachment {
            id: new_id(),
            policy_id: policy_id.to_string(),
            principal_urn: principal.to_string(),
            attached_on: now_rfc3339(),
        };

        match self.store.insert_attachment(&attachment) {
            Ok(()) => {
                info!(
                    policy_id,
                    principal = %attachment.principal_urn,
                    attachment_id = %attachment.id,
                    "policy attached"
                );
                Ok(attachment)
            }
            Err(e @ IamError::AlreadyAttached { .. }) => {
                warn!(policy_id, principal = %attachment.principal_urn, "duplicate attach rejected");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Detach by attachment id.
    pub fn detach(&self, policy_id: &str, attachment_id: &str) -> Result<(), IamError> {
        self.store.delete_attachment(policy_id, attachment_id)?;
        info!(policy_id, attachment_id, "policy detached");
        Ok(())
    }

    /// Attachments of one policy, oldest first.
    pub fn attachments_for_policy(&self, policy_id: &str) -> Result<Vec<PolicyAttachment>, IamError> {
        self.store.get_policy(policy_id)?;
        self.store.attachments_for_policy(policy_id)
    }

    /// Policies attached to a principal, each with the attachment linking it.
    pub fn policies_for_principal(&self, principal_urn: &str) -> Result<Vec<AttachedPolicy>, IamError> {
        let principal = PrincipalUrn::parse(principal_urn)?.to_string();
        self.store
            .attachments_for_principal(&principal)?
            .into_iter()
            .map(|attachment| {
                let policy = self.store.get_policy(&attachment.policy_id)?;
                Ok(AttachedPolicy { attachment, policy })
            })
            .collect()
    }

    /// Policies that could still be attached to the principal, by name.
    pub fn attachable_policies(&self, principal_urn: &str) -> Result<Vec<Policy>, IamError> {
        let principal = PrincipalUrn::parse(principal_urn)?.to_string();
        let attached: HashSet<String> = self
            .store
            .attachments_for_principal(&principal)?
            .into_iter()
            .map(|a| a.policy_id)
            .collect();

        let mut candidates: Vec<Policy> = self
            .store
            .list_policies()?
            .into_iter()
            .filter(|p| !attached.contains(&p.id))
            .collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreatePolicy;
    use crate::store::{MemoryStore, SqliteStore};
    use std::sync::Arc;

    fn services() -> Vec<Arc<IamService>> {
        vec![
            IamService::new(Arc::new(MemoryStore::new())),
            IamService::new(Arc::new(SqliteStore::open_in_memory().unwrap())),
        ]
    }

    const U1: &str = "urn:x:iam::user/u1";

    #[test]
    fn scenario_e_attach_detach_reattach() {
        for svc in services() {
            let p1 = svc.create_policy(CreatePolicy::new("P1")).unwrap();

            let a = svc.attach(&p1.id, U1).unwrap();
            assert_eq!(a.principal_urn, U1);
            svc.detach(&p1.id, &a.id).unwrap();

            assert!(svc.attachments_for_policy(&p1.id).unwrap().is_empty());
            assert!(svc.policies_for_principal(U1).unwrap().is_empty());

            let again = svc.attach(&p1.id, U1).unwrap();
            assert_ne!(again.id, a.id);
            assert_eq!(svc.attachments_for_policy(&p1.id).unwrap(), vec![again]);
        }
    }

    #[test]
    fn test_second_attach_of_same_pair_fails() {
        for svc in services() {
            let p = svc.create_policy(CreatePolicy::new("P")).unwrap();
            svc.attach(&p.id, U1).unwrap();

            let err = svc.attach(&p.id, U1).unwrap_err();
            assert_eq!(err, IamError::AlreadyAttached {
                policy_id: p.id.clone(),
                principal_urn: U1.to_string(),
            });
            assert_eq!(svc.attachments_for_policy(&p.id).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_attach_validates_principal_and_policy() {
        for svc in services() {
            let p = svc.create_policy(CreatePolicy::new("P")).unwrap();
            assert!(matches!(
                svc.attach(&p.id, "urn:x:documents::document/1"),
                Err(IamError::InvalidPrincipal(_))
            ));
            assert_eq!(
                svc.attach("missing", U1),
                Err(IamError::PolicyNotFound("missing".into()))
            );
        }
    }

    #[test]
    fn test_detach_unknown_or_foreign_attachment() {
        for svc in services() {
            let p1 = svc.create_policy(CreatePolicy::new("P1")).unwrap();
            let p2 = svc.create_policy(CreatePolicy::new("P2")).unwrap();
            let a = svc.attach(&p1.id, U1).unwrap();

            assert!(matches!(
                svc.detach(&p1.id, "nope"),
                Err(IamError::AttachmentNotFound { .. })
            ));
            // An attachment id only detaches from its own policy.
            assert!(matches!(
                svc.detach(&p2.id, &a.id),
                Err(IamError::AttachmentNotFound { .. })
            ));
            assert_eq!(svc.attachments_for_policy(&p1.id).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_read_paths_agree() {
        for svc in services() {
            let p1 = svc.create_policy(CreatePolicy::new("P1")).unwrap();
            let p2 = svc.create_policy(CreatePolicy::new("P2")).unwrap();
            let g = "urn:x:iam::group/eng";

            svc.attach(&p1.id, U1).unwrap();
            svc.attach(&p1.id, g).unwrap();
            svc.attach(&p2.id, g).unwrap();

            let by_policy: Vec<PolicyAttachment> = [&p1, &p2]
                .iter()
                .flat_map(|p| svc.attachments_for_policy(&p.id).unwrap())
                .collect();
            let by_principal: Vec<PolicyAttachment> = [U1, g]
                .iter()
                .flat_map(|u| svc.policies_for_principal(u).unwrap())
                .map(|ap| ap.attachment)
                .collect();

            let mut a: Vec<String> = by_policy.iter().map(|x| x.id.clone()).collect();
            let mut b: Vec<String> = by_principal.iter().map(|x| x.id.clone()).collect();
            a.sort();
            b.sort();
            assert_eq!(a.len(), 3);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_attachable_excludes_attached_policies() {
        for svc in services() {
            let p1 = svc.create_policy(CreatePolicy::new("b-policy")).unwrap();
            let p2 = svc.create_policy(CreatePolicy::new("a-policy")).unwrap();
            let p3 = svc.create_policy(CreatePolicy::new("c-policy")).unwrap();
            svc.attach(&p1.id, U1).unwrap();

            let ids: Vec<String> = svc
                .attachable_policies(U1)
                .unwrap()
                .into_iter()
                .map(|p| p.id)
                .collect();
            assert_eq!(ids, vec![p2.id.clone(), p3.id.clone()]);

            let for_other: Vec<String> = svc
                .attachable_policies("urn:x:iam::user/u2")
                .unwrap()
                .into_iter()
                .map(|p| p.id)
                .collect();
            assert_eq!(for_other, vec![p2.id, p1.id, p3.id]);
        }
    }

    #[test]
    fn test_deleting_policy_removes_its_attachments() {
        for svc in services() {
            let p = svc.create_policy(CreatePolicy::new("P")).unwrap();
            svc.attach(&p.id, U1).unwrap();
            svc.delete_policy(&p.id).unwrap();
            assert!(svc.policies_for_principal(U1).unwrap().is_empty());
        }
    }
}
