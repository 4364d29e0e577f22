//! Mapping of feature errors onto GraphQL errors.
//!
//! Every error carries an `extensions.code`; validation errors also list each
//! violated field under `extensions.details`.

use async_graphql::{Error, ErrorExtensions};
use domain::{DomainError, ValidationFailure};
use expense_feature::ExpenseFeatureError;
use tracing::error;
use user_feature::UserFeatureError;

pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CONFLICT: &str = "CONFLICT";
pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

fn coded(message: String, code: &'static str) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", code))
}

fn validation(failure: &ValidationFailure) -> Error {
    let details: Vec<String> = failure.violations().iter().map(ToString::to_string).collect();
    Error::new("Validation failed").extend_with(|_, e| {
        e.set("code", VALIDATION_FAILED);
        e.set("details", details);
    })
}

/// Store failures are logged and hidden from the client
fn unexpected(err: &DomainError) -> Error {
    error!(error = %err, "Unexpected failure while handling request");
    coded("Internal server error".to_string(), INTERNAL_SERVER_ERROR)
}

pub fn user_error(err: UserFeatureError) -> Error {
    match &err {
        UserFeatureError::NotFound(_) => coded(err.to_string(), NOT_FOUND),
        UserFeatureError::EmailExists(_) => coded(err.to_string(), CONFLICT),
        UserFeatureError::Validation(failure) => validation(failure),
        UserFeatureError::Domain(inner) => unexpected(inner),
    }
}

pub fn expense_error(err: ExpenseFeatureError) -> Error {
    match &err {
        ExpenseFeatureError::NotFound(_) | ExpenseFeatureError::UserNotFound(_) => {
            coded(err.to_string(), NOT_FOUND)
        }
        ExpenseFeatureError::Validation(failure) => validation(failure),
        ExpenseFeatureError::Domain(inner) => unexpected(inner),
    }
}
