//! Backing stores for policies and policy attachments.
//!
//! The (policy, principal) uniqueness of attachments is enforced here, in
//! one atomic step, not by callers checking first. Two concurrent attaches
//! of the same pair can never both succeed.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::IamError;
use crate::model::{Policy, PolicyAttachment};

/// Persistence for policies and the policy ↔ principal relation.
///
/// Listings return records in insertion order.
pub trait IamStore: Send + Sync {
    fn insert_policy(&self, policy: &Policy) -> Result<(), IamError>;

    /// Fails with `PolicyNotFound`.
    fn get_policy(&self, id: &str) -> Result<Policy, IamError>;

    fn list_policies(&self) -> Result<Vec<Policy>, IamError>;

    /// Replace the stored record wholesale. Fails with `PolicyNotFound`.
    fn update_policy(&self, policy: &Policy) -> Result<(), IamError>;

    /// Delete a policy together with all of its attachments.
    fn delete_policy(&self, id: &str) -> Result<(), IamError>;

    /// Insert an attachment. Fails with `AlreadyAttached` if the policy is
    /// already attached to the same principal, `PolicyNotFound` if the
    /// policy does not exist. Check and insert are one atomic step.
    fn insert_attachment(&self, attachment: &PolicyAttachment) -> Result<(), IamError>;

    /// Fails with `AttachmentNotFound` unless `attachment_id` belongs to `policy_id`.
    fn delete_attachment(&self, policy_id: &str, attachment_id: &str) -> Result<(), IamError>;

    fn attachments_for_policy(&self, policy_id: &str) -> Result<Vec<PolicyAttachment>, IamError>;

    fn attachments_for_principal(
        &self,
        principal_urn: &str,
    ) -> Result<Vec<PolicyAttachment>, IamError>;
}
