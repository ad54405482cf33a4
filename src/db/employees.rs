use async_trait::async_trait;

use super::{Database, EmployeeStore, StoreError, StoreResult};
use crate::models::{DepartmentSalary, Employee, EmployeePatch};

impl Database {
    pub async fn create_employee(&self, employee: &Employee) -> StoreResult<Employee> {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (employee_id, name, department, salary, joining_date, skills)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING employee_id, name, department, salary, joining_date, skills
            "#,
        )
        .bind(&employee.employee_id)
        .bind(&employee.name)
        .bind(&employee.department)
        .bind(employee.salary)
        .bind(employee.joining_date)
        .bind(&employee.skills)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateKey {
                    employee_id: employee.employee_id.clone(),
                }
            }
            other => other.into(),
        })
    }

    pub async fn get_employee(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT employee_id, name, department, salary, joining_date, skills
             FROM employees WHERE employee_id = $1",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Absent patch fields bind as NULL and COALESCE keeps the stored value,
    /// so the whole patch lands in one atomic statement.
    pub async fn update_employee(
        &self,
        employee_id: &str,
        patch: &EmployeePatch,
    ) -> StoreResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                name = COALESCE($2, name),
                department = COALESCE($3, department),
                salary = COALESCE($4, salary),
                joining_date = COALESCE($5, joining_date),
                skills = COALESCE($6, skills),
                updated_at = NOW()
            WHERE employee_id = $1
            RETURNING employee_id, name, department, salary, joining_date, skills
            "#,
        )
        .bind(employee_id)
        .bind(&patch.name)
        .bind(&patch.department)
        .bind(patch.salary)
        .bind(patch.joining_date)
        .bind(&patch.skills)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn delete_employee(&self, employee_id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_employees(&self, department: Option<&str>) -> StoreResult<Vec<Employee>> {
        let employees = match department {
            Some(department) => {
                sqlx::query_as::<_, Employee>(
                    "SELECT employee_id, name, department, salary, joining_date, skills
                     FROM employees WHERE department = $1
                     ORDER BY joining_date DESC, employee_id",
                )
                .bind(department)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Employee>(
                    "SELECT employee_id, name, department, salary, joining_date, skills
                     FROM employees ORDER BY employee_id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(employees)
    }

    /// Averages over `numeric`; a float8 sum overflows for salaries near the type's limit.
    pub async fn get_average_salaries(&self) -> StoreResult<Vec<DepartmentSalary>> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            "SELECT department, AVG(salary::numeric)::float8 AS avg_salary
             FROM employees GROUP BY department ORDER BY department",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(department, mean)| DepartmentSalary::from_mean(department, mean))
            .collect())
    }

    /// Array containment matches whole elements only and can use the GIN index on `skills`.
    pub async fn find_employees_by_skill(&self, skill: &str) -> StoreResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT employee_id, name, department, salary, joining_date, skills
             FROM employees WHERE skills @> ARRAY[$1]::TEXT[]
             ORDER BY employee_id",
        )
        .bind(skill)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for Database {
    async fn insert(&self, employee: Employee) -> StoreResult<Employee> {
        self.create_employee(&employee).await
    }

    async fn find(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        self.get_employee(employee_id).await
    }

    async fn update(&self, employee_id: &str, patch: &EmployeePatch) -> StoreResult<Option<Employee>> {
        self.update_employee(employee_id, patch).await
    }

    async fn delete(&self, employee_id: &str) -> StoreResult<bool> {
        self.delete_employee(employee_id).await
    }

    async fn list(&self, department: Option<&str>) -> StoreResult<Vec<Employee>> {
        self.list_employees(department).await
    }

    async fn average_salary_by_department(&self) -> StoreResult<Vec<DepartmentSalary>> {
        self.get_average_salaries().await
    }

    async fn find_by_skill(&self, skill: &str) -> StoreResult<Vec<Employee>> {
        self.find_employees_by_skill(skill).await
    }

    async fn ping(&self) -> StoreResult<()> {
        Database::ping(self).await
    }
}
