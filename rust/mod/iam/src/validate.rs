//! Statement validation.
//!
//! The same checks run for statements edited in the visual view and for
//! statements freshly parsed from raw text, so nothing here assumes the
//! input came from trusted code.
//!
//! Effect validity is carried by [`Effect`](crate::model::Effect): raw text
//! with any other effect never becomes a [`Statement`] (the raw codec
//! rejects it as a shape error). What is left to check is, in field order,
//! actions then resources.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::model::Statement;

/// Statement field a validation or shape error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementField {
    Sid,
    Effect,
    Actions,
    Resources,
    Conditions,
}

impl StatementField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementField::Sid => "sid",
            StatementField::Effect => "effect",
            StatementField::Actions => "actions",
            StatementField::Resources => "resources",
            StatementField::Conditions => "conditions",
        }
    }
}

impl fmt::Display for StatementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A well-formed statement that breaks a semantic rule.
///
/// `statement_index` is zero-based; `Display` renders it 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("statement {}: {}: {}", .statement_index + 1, .field, .message)]
pub struct ValidationError {
    pub statement_index: usize,
    pub field: StatementField,
    pub message: String,
}

impl ValidationError {
    fn new(statement_index: usize, field: StatementField, message: &str) -> Self {
        Self {
            statement_index,
            field,
            message: message.to_string(),
        }
    }
}

/// Validate a single statement. The error carries index 0.
pub fn validate_statement(statement: &Statement) -> Result<(), ValidationError> {
    check(0, statement)
}

/// Validate a statement list, reporting the first violation in statement
/// order. An empty list is valid.
pub fn validate_list(statements: &[Statement]) -> Result<(), ValidationError> {
    statements
        .iter()
        .enumerate()
        .try_for_each(|(i, s)| check(i, s))
}

fn check(index: usize, statement: &Statement) -> Result<(), ValidationError> {
    if statement.actions.is_empty() {
        return Err(ValidationError::new(
            index,
            StatementField::Actions,
            "at least one action is required",
        ));
    }
    if statement.resources.is_empty() {
        return Err(ValidationError::new(
            index,
            StatementField::Resources,
            "at least one resource is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Effect;
    use proptest::prelude::*;

    fn stmt(actions: &[&str], resources: &[&str]) -> Statement {
        Statement::new(Effect::Allow)
            .with_actions(actions.iter().copied())
            .with_resources(resources.iter().copied())
    }

    #[test]
    fn scenario_a_document_read_is_valid() {
        let s = stmt(&["documents:GetDocument"], &["urn:x:documents::document/42"]);
        assert_eq!(validate_statement(&s), Ok(()));
    }

    #[test]
    fn scenario_b_empty_actions_fails_on_actions() {
        let s = stmt(&[], &["*"]);
        let err = validate_statement(&s).unwrap_err();
        assert_eq!(err.field, StatementField::Actions);
        assert_eq!(err.statement_index, 0);
    }

    #[test]
    fn test_actions_checked_before_resources() {
        let err = validate_statement(&stmt(&[], &[])).unwrap_err();
        assert_eq!(err.field, StatementField::Actions);

        let err = validate_statement(&stmt(&["*"], &[])).unwrap_err();
        assert_eq!(err.field, StatementField::Resources);
    }

    #[test]
    fn test_list_reports_first_bad_statement() {
        let list = vec![
            stmt(&["*"], &["*"]),
            stmt(&["*"], &[]),
            stmt(&[], &["*"]),
        ];
        let err = validate_list(&list).unwrap_err();
        assert_eq!(err.statement_index, 1);
        assert_eq!(err.field, StatementField::Resources);
        assert_eq!(err.to_string(), "statement 2: resources: at least one resource is required");
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert_eq!(validate_list(&[]), Ok(()));
    }

    #[test]
    fn test_duplicates_are_permitted() {
        assert!(validate_statement(&stmt(&["*", "*"], &["*", "*"])).is_ok());
    }

    proptest! {
        #[test]
        fn valid_iff_actions_and_resources_non_empty(
            deny in any::<bool>(),
            actions in proptest::collection::vec("[a-z]{1,8}:[A-Z][a-z]{0,8}", 0..4),
            resources in proptest::collection::vec("urn:x:[a-z]{1,6}::[a-z]{1,6}/[0-9a-z*]{1,4}", 0..4),
        ) {
            let effect = if deny { Effect::Deny } else { Effect::Allow };
            let s = Statement::new(effect)
                .with_actions(actions.clone())
                .with_resources(resources.clone());
            let expected = !actions.is_empty() && !resources.is_empty();
            prop_assert_eq!(validate_statement(&s).is_ok(), expected);
        }
    }
}
