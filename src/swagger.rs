use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use axum::Router;
use std::sync::Arc;

use crate::{
    models::{
        CreateEmployee, DepartmentSalary, Employee, FieldError, HealthResponse, MessageResponse,
        UpdateEmployee, ValidationErrors,
    },
    AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Service endpoints
        crate::root,
        crate::health_check,
        // Employee endpoints
        crate::routes::employees::create_employee,
        crate::routes::employees::get_employee,
        crate::routes::employees::update_employee,
        crate::routes::employees::delete_employee,
        crate::routes::employees::list_employees,
        crate::routes::employees::average_salary_by_department,
        crate::routes::employees::search_employees_by_skill,
    ),
    components(
        schemas(
            Employee, CreateEmployee, UpdateEmployee, DepartmentSalary,
            MessageResponse, HealthResponse, FieldError, ValidationErrors
        )
    ),
    tags(
        (name = "employees", description = "Employee management endpoints"),
        (name = "service", description = "Liveness and store connectivity"),
    ),
    info(
        title = "Employee Management API",
        version = "1.0.0",
        description = "CRUD and reporting endpoints for employee records"
    )
)]
pub struct ApiDoc;

pub fn create_swagger_router() -> Router<Arc<AppState>> {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
