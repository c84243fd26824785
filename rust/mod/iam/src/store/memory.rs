use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::IamError;
use crate::model::{Policy, PolicyAttachment};
use crate::store::IamStore;

/// In-process store. Every mutation runs under one write lock, which makes
/// the attachment uniqueness check and the insert a single critical section.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    policies: Vec<Policy>,
    attachments: Vec<PolicyAttachment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, IamError> {
        self.state
            .read()
            .map_err(|e| IamError::Storage(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, IamError> {
        self.state
            .write()
            .map_err(|e| IamError::Storage(e.to_string()))
    }
}

impl State {
    fn policy_index(&self, id: &str) -> Result<usize, IamError> {
        self.policies
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| IamError::PolicyNotFound(id.to_string()))
    }
}

impl IamStore for MemoryStore {
    fn insert_policy(&self, policy: &Policy) -> Result<(), IamError> {
        let mut state = self.write()?;
        if state.policies.iter().any(|p| p.id == policy.id) {
            return Err(IamError::Storage(format!("duplicate policy id {}", policy.id)));
        }
        state.policies.push(policy.clone());
        Ok(())
    }

    fn get_policy(&self, id: &str) -> Result<Policy, IamError> {
        let state = self.read()?;
        let idx = state.policy_index(id)?;
        Ok(state.policies[idx].clone())
    }

    fn list_policies(&self) -> Result<Vec<Policy>, IamError> {
        Ok(self.read()?.policies.clone())
    }

    fn update_policy(&self, policy: &Policy) -> Result<(), IamError> {
        let mut state = self.write()?;
        let idx = state.policy_index(&policy.id)?;
        state.policies[idx] = policy.clone();
        Ok(())
    }

    fn delete_policy(&self, id: &str) -> Result<(), IamError> {
        let mut state = self.write()?;
        let idx = state.policy_index(id)?;
        state.policies.remove(idx);
        state.attachments.retain(|a| a.policy_id != id);
        Ok(())
    }

    fn insert_attachment(&self, attachment: &PolicyAttachment) -> Result<(), IamError> {
        let mut state = self.write()?;
        state.policy_index(&attachment.policy_id)?;
        let exists = state.attachments.iter().any(|a| {
            a.policy_id == attachment.policy_id && a.principal_urn == attachment.principal_urn
        });
        if exists {
            return Err(IamError::AlreadyAttached {
                policy_id: attachment.policy_id.clone(),
                principal_urn: attachment.principal_urn.clone(),
            });
        }
        state.attachments.push(attachment.clone());
        Ok(())
    }

    fn delete_attachment(&self, policy_id: &str, attachment_id: &str) -> Result<(), IamError> {
        let mut state = self.write()?;
        let idx = state
            .attachments
            .iter()
            .position(|a| a.id == attachment_id && a.policy_id == policy_id)
            .ok_or_else(|| IamError::AttachmentNotFound {
                policy_id: policy_id.to_string(),
                attachment_id: attachment_id.to_string(),
            })?;
        state.attachments.remove(idx);
        Ok(())
    }

    fn attachments_for_policy(&self, policy_id: &str) -> Result<Vec<PolicyAttachment>, IamError> {
        let state = self.read()?;
        Ok(state
            .attachments
            .iter()
            .filter(|a| a.policy_id == policy_id)
            .cloned()
            .collect())
    }

    fn attachments_for_principal(
        &self,
        principal_urn: &str,
    ) -> Result<Vec<PolicyAttachment>, IamError> {
        let state = self.read()?;
        Ok(state
            .attachments
            .iter()
            .filter(|a| a.principal_urn == principal_urn)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;

    fn policy(id: &str) -> Policy {
        Policy {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            version: "1".into(),
            statements: Vec::new(),
            created_at: "2026-01-01T00:00:00+00:00".into(),
            updated_at: "2026-01-01T00:00:00+00:00".into(),
        }
    }

    fn attachment(id: &str, policy_id: &str, urn: &str) -> PolicyAttachment {
        PolicyAttachment {
            id: id.to_string(),
            policy_id: policy_id.to_string(),
            principal_urn: urn.to_string(),
            attached_on: "2026-01-01T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn test_concurrent_attach_of_same_pair_inserts_once() {
        let store = Arc::new(MemoryStore::new());
        store.insert_policy(&policy("p1")).unwrap();

        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let store = store.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    store.insert_attachment(&attachment(&format!("a{i}"), "p1", "urn:x:iam::user/u1"))
                })
            })
            .collect();

        let ok = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(ok, 1);
        assert_eq!(store.attachments_for_policy("p1").unwrap().len(), 1);
    }
}
