//! Both stores must behave identically behind IamStore.

use std::sync::Arc;

use docadmin_iam::IamError;
use docadmin_iam::model::{Effect, Policy, PolicyAttachment, Statement};
use docadmin_iam::store::{IamStore, MemoryStore, SqliteStore};

fn stores() -> Vec<(&'static str, Arc<dyn IamStore>, Option<tempfile::TempDir>)> {
    let dir = tempfile::tempdir().unwrap();
    let memory: Arc<dyn IamStore> = Arc::new(MemoryStore::new());
    let sqlite: Arc<dyn IamStore> =
        Arc::new(SqliteStore::open(&dir.path().join("iam.sqlite")).unwrap());
    vec![("memory", memory, None), ("sqlite", sqlite, Some(dir))]
}

fn policy(id: &str, name: &str) -> Policy {
    Policy {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        version: "1".into(),
        statements: vec![
            Statement::new(Effect::Allow)
                .with_actions(["documents:GetDocument"])
                .with_resources(["urn:acme:documents::document/*"]),
        ],
        created_at: "2026-10-01T00:00:00+00:00".into(),
        updated_at: "2026-10-01T00:00:00+00:00".into(),
    }
}

fn attachment(id: &str, policy_id: &str, urn: &str) -> PolicyAttachment {
    PolicyAttachment {
        id: id.to_string(),
        policy_id: policy_id.to_string(),
        principal_urn: urn.to_string(),
        attached_on: "2026-10-01T00:00:00+00:00".into(),
    }
}

#[test]
fn test_policy_round_trip_and_ordering() {
    for (name, store, _dir) in stores() {
        store.insert_policy(&policy("p2", "second")).unwrap();
        store.insert_policy(&policy("p1", "first")).unwrap();

        let ids: Vec<String> = store.list_policies().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p2", "p1"], "{name}: insertion order");

        let mut p = store.get_policy("p1").unwrap();
        p.statements.push(Statement::new(Effect::Deny).with_actions(["*"]).with_resources(["*"]));
        store.update_policy(&p).unwrap();
        assert_eq!(store.get_policy("p1").unwrap(), p, "{name}");

        assert_eq!(
            store.update_policy(&policy("nope", "x")),
            Err(IamError::PolicyNotFound("nope".into())),
            "{name}"
        );
        assert_eq!(
            store.get_policy("nope"),
            Err(IamError::PolicyNotFound("nope".into())),
            "{name}"
        );
    }
}

#[test]
fn test_attachment_uniqueness_per_pair() {
    for (name, store, _dir) in stores() {
        store.insert_policy(&policy("p1", "a")).unwrap();
        store.insert_policy(&policy("p2", "b")).unwrap();
        let u1 = "urn:acme:iam::user/u1";

        store.insert_attachment(&attachment("a1", "p1", u1)).unwrap();
        // Same principal, other policy: fine.
        store.insert_attachment(&attachment("a2", "p2", u1)).unwrap();
        // Same policy, other principal: fine.
        store.insert_attachment(&attachment("a3", "p1", "urn:acme:iam::group/g1")).unwrap();

        assert!(
            matches!(
                store.insert_attachment(&attachment("a4", "p1", u1)),
                Err(IamError::AlreadyAttached { .. })
            ),
            "{name}"
        );
        assert_eq!(store.attachments_for_policy("p1").unwrap().len(), 2, "{name}");
        assert_eq!(store.attachments_for_principal(u1).unwrap().len(), 2, "{name}");
    }
}

#[test]
fn test_delete_policy_cascades_to_attachments() {
    for (name, store, _dir) in stores() {
        store.insert_policy(&policy("p1", "a")).unwrap();
        store.insert_attachment(&attachment("a1", "p1", "urn:acme:iam::user/u1")).unwrap();

        store.delete_policy("p1").unwrap();
        assert!(
            store.attachments_for_principal("urn:acme:iam::user/u1").unwrap().is_empty(),
            "{name}"
        );
        assert_eq!(
            store.delete_policy("p1"),
            Err(IamError::PolicyNotFound("p1".into())),
            "{name}"
        );
    }
}

#[test]
fn test_detach_then_reattach_same_pair() {
    for (name, store, _dir) in stores() {
        store.insert_policy(&policy("p1", "a")).unwrap();
        let u1 = "urn:acme:iam::user/u1";
        store.insert_attachment(&attachment("a1", "p1", u1)).unwrap();
        store.delete_attachment("p1", "a1").unwrap();
        store.insert_attachment(&attachment("a2", "p1", u1)).unwrap();

        let ids: Vec<String> = store
            .attachments_for_policy("p1")
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["a2"], "{name}");
    }
}
