use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::validation::{
    check_length, check_salary, parse_date, required, ValidationErrors, DEPARTMENT_MAX_LENGTH,
    NAME_MAX_LENGTH,
};

/// A stored employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[schema(example = json!({
    "employee_id": "E123",
    "name": "John Doe",
    "department": "Engineering",
    "salary": 75000.0,
    "joining_date": "2023-01-15",
    "skills": ["Python", "MongoDB", "APIs"]
}))]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub salary: f64,
    pub joining_date: NaiveDate,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Create payload as received on the wire.
///
/// Every field is optional here so that a missing field is reported next to
/// the other violations instead of failing deserialization outright.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "E123")]
    pub employee_id: Option<String>,
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    #[schema(example = 75000.0)]
    pub salary: Option<f64>,
    #[schema(example = "2023-01-15", format = Date)]
    pub joining_date: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl CreateEmployee {
    pub fn validate(self) -> Result<Employee, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let employee_id = required("employee_id", self.employee_id, &mut errors);
        if let Some(id) = &employee_id {
            if id.trim().is_empty() {
                errors.push("employee_id", "must not be empty");
            }
        }

        let name = required("name", self.name, &mut errors);
        if let Some(name) = &name {
            check_length("name", name, 1, NAME_MAX_LENGTH, &mut errors);
        }

        let department = required("department", self.department, &mut errors);
        if let Some(department) = &department {
            check_length("department", department, 1, DEPARTMENT_MAX_LENGTH, &mut errors);
        }

        let salary = required("salary", self.salary, &mut errors);
        if let Some(salary) = salary {
            check_salary("salary", salary, &mut errors);
        }

        let joining_date = required("joining_date", self.joining_date, &mut errors)
            .and_then(|raw| parse_date("joining_date", &raw, &mut errors));

        errors.into_result()?;

        match (employee_id, name, department, salary, joining_date) {
            (Some(employee_id), Some(name), Some(department), Some(salary), Some(joining_date)) => {
                Ok(Employee {
                    employee_id,
                    name,
                    department,
                    salary,
                    joining_date,
                    skills: self.skills.unwrap_or_default(),
                })
            }
            // every None above has already been recorded as an error
            _ => Err(ValidationErrors::new()),
        }
    }
}

/// Partial update payload. `null` and absent are both "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    #[schema(example = "2023-01-15", format = Date)]
    pub joining_date: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl UpdateEmployee {
    pub fn validate(self) -> Result<EmployeePatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = &self.name {
            check_length("name", name, 1, NAME_MAX_LENGTH, &mut errors);
        }
        if let Some(department) = &self.department {
            check_length("department", department, 1, DEPARTMENT_MAX_LENGTH, &mut errors);
        }
        if let Some(salary) = self.salary {
            check_salary("salary", salary, &mut errors);
        }
        let joining_date = self
            .joining_date
            .as_deref()
            .and_then(|raw| parse_date("joining_date", raw, &mut errors));

        errors.into_result()?;

        Ok(EmployeePatch {
            name: self.name,
            department: self.department,
            salary: self.salary,
            joining_date,
            skills: self.skills,
        })
    }
}

/// A validated partial update. Present fields replace the stored value wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub joining_date: Option<NaiveDate>,
    pub skills: Option<Vec<String>>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.department.is_none()
            && self.salary.is_none()
            && self.joining_date.is_none()
            && self.skills.is_none()
    }

    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.clone();
        }
        if let Some(department) = &self.department {
            employee.department = department.clone();
        }
        if let Some(salary) = self.salary {
            employee.salary = salary;
        }
        if let Some(joining_date) = self.joining_date {
            employee.joining_date = joining_date;
        }
        if let Some(skills) = &self.skills {
            employee.skills = skills.clone();
        }
    }
}

/// Mean salary of one department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DepartmentSalary {
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 80000.0)]
    pub avg_salary: f64,
}

impl DepartmentSalary {
    /// Builds an entry from a raw group mean, rounded to cents.
    pub fn from_mean<S: Into<String>>(department: S, mean: f64) -> Self {
        Self {
            department: department.into(),
            avg_salary: round_to_cents(mean),
        }
    }
}

/// Rounds half away from zero to two decimal places. Values too large to
/// scale have no fractional cents and are returned as is.
pub fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EmployeeListQuery {
    /// Only return employees of this department, newest joiners first
    pub department: Option<String>,
}

impl EmployeeListQuery {
    /// An empty `?department=` means no filter.
    pub fn department_filter(&self) -> Option<&str> {
        self.department.as_deref().filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SkillSearchQuery {
    /// Exact, case-sensitive skill name
    pub skill: String,
}
