//! Validation utilities.

use crate::{FieldError, MallError, MallResult};
use rust_decimal::Decimal;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `MallError` on failure.
    fn validate_request(&self) -> Result<(), MallError> {
        self.validate().map_err(validation_errors_to_mall_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `MallError`.
#[must_use]
pub fn validation_errors_to_mall_error(errors: ValidationErrors) -> MallError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    // HashMap iteration order would otherwise leak into messages
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    let message = field_errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    MallError::Validation(message)
}

/// Fails with a validation error when `value` is empty after trimming.
pub fn require_not_blank(field: &str, value: &str) -> MallResult<()> {
    if rules::not_blank(value).is_err() {
        return Err(MallError::validation(format!("{}: must not be blank", field)));
    }
    Ok(())
}

/// Fails with a validation error unless `value` is strictly positive.
pub fn require_positive(field: &str, value: Decimal) -> MallResult<()> {
    if value <= Decimal::ZERO {
        return Err(MallError::validation(format!(
            "{}: must be greater than 0",
            field
        )));
    }
    Ok(())
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}
