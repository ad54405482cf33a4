use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
};
use thiserror::Error;

use super::{impl_into_response, AppError};
use crate::db::StoreError;
use crate::models::ValidationErrors;

/// Errors raised by the employee endpoints
#[derive(Error, Debug)]
pub enum EmployeeError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("Employee ID '{employee_id}' already exists")]
    DuplicateId { employee_id: String },

    #[error("Employee '{employee_id}' not found")]
    NotFound { employee_id: String },

    #[error("Store operation failed: {0}")]
    Store(#[source] StoreError),
}

impl AppError for EmployeeError {
    fn status_code(&self) -> StatusCode {
        match self {
            EmployeeError::Validation(_)
            | EmployeeError::MalformedRequest { .. }
            | EmployeeError::NoFieldsToUpdate
            | EmployeeError::DuplicateId { .. } => StatusCode::BAD_REQUEST,
            EmployeeError::NotFound { .. } => StatusCode::NOT_FOUND,
            EmployeeError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            EmployeeError::Validation(_) => "Validation failed".to_string(),
            EmployeeError::MalformedRequest { message } => message.clone(),
            EmployeeError::NoFieldsToUpdate => "No fields to update".to_string(),
            EmployeeError::DuplicateId { .. } => "Employee ID already exists".to_string(),
            EmployeeError::NotFound { .. } => "Employee not found".to_string(),
            EmployeeError::Store(_) => "An internal error occurred".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EmployeeError::Validation(_) => "EMPLOYEE_VALIDATION_FAILED",
            EmployeeError::MalformedRequest { .. } => "EMPLOYEE_MALFORMED_REQUEST",
            EmployeeError::NoFieldsToUpdate => "EMPLOYEE_NO_FIELDS_TO_UPDATE",
            EmployeeError::DuplicateId { .. } => "EMPLOYEE_DUPLICATE_ID",
            EmployeeError::NotFound { .. } => "EMPLOYEE_NOT_FOUND",
            EmployeeError::Store(_) => "EMPLOYEE_STORE_ERROR",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            EmployeeError::Validation(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        }
    }
}

impl_into_response!(EmployeeError);

impl From<StoreError> for EmployeeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { employee_id } => EmployeeError::DuplicateId { employee_id },
            other => EmployeeError::Store(other),
        }
    }
}

impl From<ValidationErrors> for EmployeeError {
    fn from(errors: ValidationErrors) -> Self {
        EmployeeError::Validation(errors)
    }
}

impl From<JsonRejection> for EmployeeError {
    fn from(rejection: JsonRejection) -> Self {
        EmployeeError::MalformedRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for EmployeeError {
    fn from(rejection: QueryRejection) -> Self {
        EmployeeError::MalformedRequest {
            message: rejection.body_text(),
        }
    }
}

/// Utility functions for common error creation patterns
impl EmployeeError {
    pub fn not_found<S: Into<String>>(employee_id: S) -> Self {
        Self::NotFound { employee_id: employee_id.into() }
    }

    pub fn duplicate_id<S: Into<String>>(employee_id: S) -> Self {
        Self::DuplicateId { employee_id: employee_id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    async fn body_json(error: EmployeeError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.push("salary", "must be greater than 0");

        let (status, body) = body_json(EmployeeError::Validation(errors)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "EMPLOYEE_VALIDATION_FAILED");
        assert_eq!(body["status"], 400);
        assert_eq!(body["details"][0]["field"], "salary");
    }

    #[tokio::test]
    async fn test_duplicate_id_is_a_bad_request() {
        let (status, body) = body_json(EmployeeError::duplicate_id("E1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Employee ID already exists");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_store_errors_hide_internals() {
        let error = EmployeeError::from(StoreError::Unavailable("connection refused".to_string()));
        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[test]
    fn test_store_duplicate_maps_to_duplicate_id() {
        let error = EmployeeError::from(StoreError::DuplicateKey { employee_id: "E9".to_string() });
        assert!(matches!(error, EmployeeError::DuplicateId { ref employee_id } if employee_id == "E9"));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let error = EmployeeError::not_found("E404");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.error_code(), "EMPLOYEE_NOT_FOUND");
    }
}
