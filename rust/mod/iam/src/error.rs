use thiserror::Error;

use docadmin_core::ServiceError;

use crate::editor::RawError;
use crate::validate::ValidationError;

/// IAM module error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IamError {
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("invalid URN pattern for resource type '{type_id}': {reason}")]
    InvalidUrnPattern { type_id: String, reason: String },

    #[error("invalid principal URN: {0}")]
    InvalidPrincipal(String),

    #[error("policy not found: {0}")]
    PolicyNotFound(String),

    #[error("policy {policy_id} is already attached to {principal_urn}")]
    AlreadyAttached {
        policy_id: String,
        principal_urn: String,
    },

    #[error("attachment {attachment_id} not found on policy {policy_id}")]
    AttachmentNotFound {
        policy_id: String,
        attachment_id: String,
    },

    #[error(transparent)]
    Statement(#[from] ValidationError),

    #[error(transparent)]
    Raw(#[from] RawError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("config: {0}")]
    Config(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<IamError> for ServiceError {
    fn from(e: IamError) -> Self {
        let msg = e.to_string();
        match e {
            IamError::PolicyNotFound(_) | IamError::AttachmentNotFound { .. } => {
                ServiceError::NotFound(msg)
            }
            IamError::AlreadyAttached { .. } => ServiceError::Conflict(msg),
            IamError::UnknownResourceType(_)
            | IamError::InvalidUrnPattern { .. }
            | IamError::InvalidPrincipal(_)
            | IamError::Statement(_)
            | IamError::Raw(_)
            | IamError::Validation(_)
            | IamError::Config(_) => ServiceError::Validation(msg),
            IamError::Storage(_) => ServiceError::Storage(msg),
            IamError::Internal(_) => ServiceError::Internal(msg),
        }
    }
}
