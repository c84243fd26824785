use serde::{Deserialize, Serialize};

use super::Policy;

/// A link between one policy and one principal.
///
/// At most one attachment exists per (policy, principal) pair. The
/// attachment id is assigned by the store and is the only handle used for
/// detaching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAttachment {
    /// Store-assigned identifier (UUIDv4, no dashes).
    pub id: String,

    pub policy_id: String,

    /// `urn:<ns>:iam::user/<id>` or `urn:<ns>:iam::group/<id>`.
    pub principal_urn: String,

    /// RFC 3339 timestamp when the attachment was made.
    pub attached_on: String,
}

/// A policy as seen from a principal's page: the policy plus the
/// attachment that links it, so the page can offer detach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedPolicy {
    pub attachment: PolicyAttachment,
    pub policy: Policy,
}
