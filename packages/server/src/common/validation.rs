//! Field-keyed validation errors.
//!
//! Both request validation and database constraint violations are reported
//! to clients as a list of `{ field, message }` pairs.

use serde::Serialize;

/// A single validation failure for one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a unique-constraint violation to the API field it guards.
///
/// Constraint names follow `<table>_<column>_key`; the column is reported in
/// camelCase to match request field names. Returns `None` for any other error.
pub fn unique_violation(err: &sqlx::Error) -> Option<FieldError> {
    let db_err = match err {
        sqlx::Error::Database(db_err) => db_err,
        _ => return None,
    };

    if db_err.code().as_deref() != Some(UNIQUE_VIOLATION) {
        return None;
    }

    let field = db_err
        .constraint()
        .map(constraint_field)
        .unwrap_or_else(|| "unknown".to_string());

    Some(FieldError::new(field.clone(), format!("{} must be unique", field)))
}

/// `users_phone_number_key` -> `phoneNumber`
fn constraint_field(constraint: &str) -> String {
    let trimmed = constraint.strip_suffix("_key").unwrap_or(constraint);
    let column = match trimmed.split_once('_') {
        Some((_table, column)) => column,
        None => trimmed,
    };
    to_camel_case(column)
}

pub(crate) fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for c in snake.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
