use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

pub const NAME_MAX_LENGTH: usize = 100;
pub const DEPARTMENT_MAX_LENGTH: usize = 50;

/// A single violated constraint on one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "salary")]
    pub field: String,
    #[schema(example = "must be greater than 0")]
    pub message: String,
}

/// Every field violation found in one payload, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields().any(|f| f == field)
    }

    /// Ok when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

/// Unwraps a required field, recording `field required` when absent.
pub(crate) fn required<T>(field: &str, value: Option<T>, errors: &mut ValidationErrors) -> Option<T> {
    if value.is_none() {
        errors.push(field, "field required");
    }
    value
}

/// Length is measured in characters, not bytes.
pub(crate) fn check_length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    errors: &mut ValidationErrors,
) {
    let length = value.chars().count();
    if length < min {
        errors.push(field, format!("must be at least {} character(s) long", min));
    } else if length > max {
        errors.push(field, format!("must be at most {} characters long (got {})", max, length));
    }
}

pub(crate) fn check_salary(field: &str, value: f64, errors: &mut ValidationErrors) {
    if !value.is_finite() {
        errors.push(field, "must be a finite number");
    } else if value <= 0.0 {
        errors.push(field, "must be greater than 0");
    }
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
/// Accepts only the zero-padded `YYYY-MM-DD` form; chrono alone would take `2023-1-5`.
pub(crate) fn parse_date(field: &str, value: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    let parsed = if is_iso_date_shape(value) {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else {
        None
    };
    if parsed.is_none() {
        errors.push(field, format!("'{}' is not a valid date, expected YYYY-MM-DD", value));
    }
    parsed
}

fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
