use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    errors::EmployeeError,
    models::{
        CreateEmployee, DepartmentSalary, Employee, EmployeeListQuery, MessageResponse,
        SkillSearchQuery, UpdateEmployee,
    },
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/avg-salary", get(average_salary_by_department))
        .route("/employees/search", get(search_employees_by_skill))
        .route(
            "/employees/{employee_id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

#[utoipa::path(
    post,
    path = "/employees",
    tag = "employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid payload or employee ID already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateEmployee>, JsonRejection>,
) -> Result<Json<Employee>, EmployeeError> {
    let Json(payload) = payload?;
    let employee = payload.validate()?;

    // fast path for the common case; the unique key on the store closes the race
    if state.store.find(&employee.employee_id).await?.is_some() {
        warn!("Rejected duplicate employee ID {}", employee.employee_id);
        return Err(EmployeeError::duplicate_id(employee.employee_id));
    }

    let created = state.store.insert(employee).await?;
    info!("Created employee {}", created.employee_id);

    Ok(Json(created))
}

#[utoipa::path(
    get,
    path = "/employees/{employee_id}",
    tag = "employees",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee details", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
) -> Result<Json<Employee>, EmployeeError> {
    let employee = state
        .store
        .find(&employee_id)
        .await?
        .ok_or_else(|| EmployeeError::not_found(&employee_id))?;

    Ok(Json(employee))
}

#[utoipa::path(
    put,
    path = "/employees/{employee_id}",
    tag = "employees",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Updated employee", body = Employee),
        (status = 400, description = "Invalid payload or no fields to update"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
    payload: Result<Json<UpdateEmployee>, JsonRejection>,
) -> Result<Json<Employee>, EmployeeError> {
    let Json(payload) = payload?;
    let patch = payload.validate()?;
    if patch.is_empty() {
        return Err(EmployeeError::NoFieldsToUpdate);
    }

    let updated = state
        .store
        .update(&employee_id, &patch)
        .await?
        .ok_or_else(|| EmployeeError::not_found(&employee_id))?;
    info!("Updated employee {}", employee_id);

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/employees/{employee_id}",
    tag = "employees",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee deleted", body = MessageResponse),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
) -> Result<Json<MessageResponse>, EmployeeError> {
    if !state.store.delete(&employee_id).await? {
        return Err(EmployeeError::not_found(employee_id));
    }
    info!("Deleted employee {}", employee_id);

    Ok(Json(MessageResponse::new("Employee deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/employees",
    tag = "employees",
    params(EmployeeListQuery),
    responses(
        (status = 200, description = "Employees, newest joiners first when filtered by department", body = Vec<Employee>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EmployeeListQuery>, QueryRejection>,
) -> Result<Json<Vec<Employee>>, EmployeeError> {
    let Query(query) = query?;
    let employees = state.store.list(query.department_filter()).await?;
    debug!("Listed {} employees (department: {:?})", employees.len(), query.department_filter());

    Ok(Json(employees))
}

#[utoipa::path(
    get,
    path = "/employees/avg-salary",
    tag = "employees",
    responses(
        (status = 200, description = "Average salary per department, rounded to 2 decimals", body = Vec<DepartmentSalary>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn average_salary_by_department(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DepartmentSalary>>, EmployeeError> {
    let averages = state.store.average_salary_by_department().await?;
    Ok(Json(averages))
}

#[utoipa::path(
    get,
    path = "/employees/search",
    tag = "employees",
    params(SkillSearchQuery),
    responses(
        (status = 200, description = "Employees having exactly this skill", body = Vec<Employee>),
        (status = 400, description = "Missing skill parameter"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn search_employees_by_skill(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SkillSearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Employee>>, EmployeeError> {
    let Query(query) = query?;
    let employees = state.store.find_by_skill(&query.skill).await?;
    debug!("Found {} employees with skill {}", employees.len(), query.skill);

    Ok(Json(employees))
}
