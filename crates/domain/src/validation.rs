//! Field validation shared by the feature crates.
//!
//! Inputs derive [`validator::Validate`]; the resulting errors are flattened
//! into a [`ValidationFailure`] that lists every violated field.

use std::borrow::Cow;
use std::fmt;

use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};
use validator::{ValidationError, ValidationErrors};

/// Maximum number of fractional digits accepted for an amount
pub const AMOUNT_MAX_SCALE: u32 = 2;

/// Maximum length of an expense description, in characters
pub const DESCRIPTION_MAX_LENGTH: u64 = 500;

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field constraint an input violated, ordered by field name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_violations(.violations))]
pub struct ValidationFailure {
    violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationFailure {
    pub fn new(mut violations: Vec<FieldViolation>) -> Self {
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        Self { violations }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(field, message)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Names of the violated fields, in order
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let violations = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                let field = field.to_string();
                field_errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    FieldViolation::new(field.clone(), message)
                })
            })
            .collect();

        Self::new(violations)
    }
}

/// Amounts must be strictly positive with at most two decimal places
pub fn valid_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(ValidationError::new("positive")
            .with_message(Cow::Borrowed("must be greater than 0")));
    }
    if amount.normalize().scale() > AMOUNT_MAX_SCALE {
        return Err(ValidationError::new("scale")
            .with_message(Cow::Borrowed("must have at most 2 decimal places")));
    }
    Ok(())
}

/// Text must contain something other than whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank")
            .with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

/// Dates may be today or earlier, in UTC
pub fn not_in_future(date: &Date) -> Result<(), ValidationError> {
    if *date > OffsetDateTime::now_utc().date() {
        return Err(ValidationError::new("past_or_present")
            .with_message(Cow::Borrowed("must not be in the future")));
    }
    Ok(())
}
