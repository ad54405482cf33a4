use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DepartmentSalary, Employee, EmployeePatch};

/// Failures reported by an [`EmployeeStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("employee '{employee_id}' already exists")]
    DuplicateKey { employee_id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Backend(other.into()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for employee records.
///
/// Every method is a single round trip against the backing store; none of
/// them retry. Implementations must reject a second record with an existing
/// `employee_id` with [`StoreError::DuplicateKey`].
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn insert(&self, employee: Employee) -> StoreResult<Employee>;

    async fn find(&self, employee_id: &str) -> StoreResult<Option<Employee>>;

    /// Applies `patch` and returns the updated record, or `None` when nothing matched.
    async fn update(&self, employee_id: &str, patch: &EmployeePatch) -> StoreResult<Option<Employee>>;

    /// Returns whether a record was removed.
    async fn delete(&self, employee_id: &str) -> StoreResult<bool>;

    /// All employees ordered by id, or one department ordered by joining date, newest first.
    async fn list(&self, department: Option<&str>) -> StoreResult<Vec<Employee>>;

    /// One entry per department present, sorted by department name.
    async fn average_salary_by_department(&self) -> StoreResult<Vec<DepartmentSalary>>;

    /// Employees whose skills contain exactly `skill`, ordered by id.
    async fn find_by_skill(&self, skill: &str) -> StoreResult<Vec<Employee>>;

    async fn ping(&self) -> StoreResult<()>;
}
