//! In-process [`EmployeeStore`] used by router and handler tests.
//!
//! Ordering and matching rules mirror the PostgreSQL queries in
//! `db::employees` so the same assertions hold against either backend.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{EmployeeStore, StoreError, StoreResult};
use crate::models::{DepartmentSalary, Employee, EmployeePatch};

#[derive(Default)]
pub struct MemoryStore {
    employees: RwLock<BTreeMap<String, Employee>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every operation fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.read().map(|employees| employees.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, Employee>>> {
        self.check_online()?;
        self.employees
            .read()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("memory store lock poisoned")))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, Employee>>> {
        self.check_online()?;
        self.employees
            .write()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("memory store lock poisoned")))
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn insert(&self, employee: Employee) -> StoreResult<Employee> {
        let mut employees = self.write()?;
        if employees.contains_key(&employee.employee_id) {
            return Err(StoreError::DuplicateKey {
                employee_id: employee.employee_id,
            });
        }
        employees.insert(employee.employee_id.clone(), employee.clone());
        Ok(employee)
    }

    async fn find(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        Ok(self.read()?.get(employee_id).cloned())
    }

    async fn update(&self, employee_id: &str, patch: &EmployeePatch) -> StoreResult<Option<Employee>> {
        let mut employees = self.write()?;
        let updated = employees.get_mut(employee_id).map(|employee| {
            patch.apply_to(employee);
            employee.clone()
        });
        Ok(updated)
    }

    async fn delete(&self, employee_id: &str) -> StoreResult<bool> {
        Ok(self.write()?.remove(employee_id).is_some())
    }

    async fn list(&self, department: Option<&str>) -> StoreResult<Vec<Employee>> {
        let employees = self.read()?;
        let listed = match department {
            Some(department) => {
                let mut matching: Vec<Employee> = employees
                    .values()
                    .filter(|e| e.department == department)
                    .cloned()
                    .collect();
                // stable sort keeps the id order among equal dates
                matching.sort_by(|a, b| b.joining_date.cmp(&a.joining_date));
                matching
            }
            None => employees.values().cloned().collect(),
        };
        Ok(listed)
    }

    async fn average_salary_by_department(&self) -> StoreResult<Vec<DepartmentSalary>> {
        let employees = self.read()?;
        // running mean, so salaries near f64::MAX never sum to inf
        let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for employee in employees.values() {
            let (mean, count) = groups.entry(employee.department.as_str()).or_insert((0.0, 0));
            *count += 1;
            *mean += (employee.salary - *mean) / *count as f64;
        }
        let averages = groups
            .into_iter()
            .map(|(department, (mean, _))| DepartmentSalary::from_mean(department, mean))
            .collect();
        Ok(averages)
    }

    async fn find_by_skill(&self, skill: &str) -> StoreResult<Vec<Employee>> {
        Ok(self
            .read()?
            .values()
            .filter(|e| e.skills.iter().any(|s| s == skill))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn employee(id: &str, department: &str, salary: f64, joined: (i32, u32, u32), skills: &[&str]) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: format!("Employee {}", id),
            department: department.to_string(),
            salary,
            joining_date: NaiveDate::from_ymd_opt(joined.0, joined.1, joined.2).unwrap(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        store.insert(employee("E1", "HR", 1.0, (2023, 1, 1), &[])).await.unwrap();
        let err = store
            .insert(employee("E1", "Engineering", 2.0, (2023, 1, 1), &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { employee_id } if employee_id == "E1"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_department_listing_is_newest_first() {
        let store = MemoryStore::new();
        store.insert(employee("E1", "Eng", 1.0, (2021, 5, 1), &[])).await.unwrap();
        store.insert(employee("E2", "Eng", 1.0, (2023, 5, 1), &[])).await.unwrap();
        store.insert(employee("E3", "HR", 1.0, (2024, 5, 1), &[])).await.unwrap();
        store.insert(employee("E4", "Eng", 1.0, (2022, 5, 1), &[])).await.unwrap();

        let ids: Vec<String> = store
            .list(Some("Eng"))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.employee_id)
            .collect();
        assert_eq!(ids, vec!["E2", "E4", "E1"]);
        assert_eq!(store.list(None).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_average_salary_groups() {
        let store = MemoryStore::new();
        store.insert(employee("E1", "Eng", 75000.0, (2023, 1, 15), &[])).await.unwrap();
        store.insert(employee("E2", "Eng", 85000.0, (2023, 3, 10), &[])).await.unwrap();
        store.insert(employee("E3", "HR", 60000.0, (2023, 2, 1), &[])).await.unwrap();

        let averages = store.average_salary_by_department().await.unwrap();
        assert_eq!(
            averages,
            vec![
                DepartmentSalary::from_mean("Eng", 80000.0),
                DepartmentSalary::from_mean("HR", 60000.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_average_of_huge_salaries_stays_finite() {
        let huge = f64::MAX / 1.5;
        let store = MemoryStore::new();
        store.insert(employee("E1", "Big", huge, (2023, 1, 1), &[])).await.unwrap();
        store.insert(employee("E2", "Big", huge, (2023, 1, 2), &[])).await.unwrap();

        let averages = store.average_salary_by_department().await.unwrap();
        assert_eq!(averages.len(), 1);
        assert!(averages[0].avg_salary.is_finite());
        assert_eq!(averages[0].avg_salary, huge);
    }

    #[tokio::test]
    async fn test_skill_match_is_exact() {
        let store = MemoryStore::new();
        store.insert(employee("E1", "Eng", 1.0, (2023, 1, 1), &["Python"])).await.unwrap();
        store.insert(employee("E2", "Eng", 1.0, (2023, 1, 1), &["Pythonic"])).await.unwrap();
        store.insert(employee("E3", "Eng", 1.0, (2023, 1, 1), &["python"])).await.unwrap();

        let found = store.find_by_skill("Python").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].employee_id, "E1");
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(store.find("E1").await, Err(StoreError::Unavailable(_))));

        store.set_offline(false);
        assert!(store.ping().await.is_ok());
    }
}
