use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Callers match on these,
// never on the human-readable message string.

/// Stable error code constants.
///
/// The admin console matches on `code` from `{"code": "ALREADY_EXISTS", "message": "..."}`
/// to decide between a retry prompt and a correction prompt.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified error type shared by every docadmin module.
///
/// Module errors (e.g. the IAM policy errors) collapse into one of these
/// variants at the module boundary. No variant is fatal: each one is a
/// rejected operation with a described reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Record or relation already exists.
    #[error("{0}")]
    Conflict(String),

    /// Input is malformed or semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// Backing store failure.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// Whether repeating the same call unchanged could succeed.
    ///
    /// Conflicts and validation failures are logic errors; only storage
    /// hiccups are worth a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_mapping() {
        assert_eq!(ServiceError::NotFound("x".into()).error_code(), "NOT_FOUND");
        assert_eq!(ServiceError::Conflict("x".into()).error_code(), "ALREADY_EXISTS");
        assert_eq!(ServiceError::Validation("x".into()).error_code(), "VALIDATION_FAILED");
        assert_eq!(ServiceError::Storage("x".into()).error_code(), "STORAGE_ERROR");
        assert_eq!(ServiceError::Internal("x".into()).error_code(), "INTERNAL");
    }

    #[test]
    fn conflicts_are_not_retryable() {
        assert!(!ServiceError::Conflict("dup".into()).is_retryable());
        assert!(!ServiceError::Validation("bad".into()).is_retryable());
        assert!(ServiceError::Storage("locked".into()).is_retryable());
    }

    #[test]
    fn error_display_is_just_message() {
        assert_eq!(ServiceError::NotFound("policy p1".into()).to_string(), "policy p1");
        assert_eq!(ServiceError::Conflict("dup key".into()).to_string(), "dup key");
    }
}
