#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::NaiveDate;
    use roster::db::{EmployeeStore, StoreError};
    use roster::models::{DepartmentSalary, Employee, EmployeePatch};
    use roster::test_utils::{employee_json, sample_employees, seed, send, TestContext};
    use serde_json::json;

    fn employee(id: &str, department: &str, salary: f64, joined: &str, skills: &[&str]) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: format!("Employee {}", id),
            department: department.to_string(),
            salary,
            joining_date: NaiveDate::parse_from_str(joined, "%Y-%m-%d").unwrap(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    #[ignore = "Requires Docker for the PostgreSQL test container"]
    async fn test_insert_and_find_round_trip() {
        let ctx = TestContext::new().await;
        let original = employee("E123", "Engineering", 75000.0, "2023-01-15", &["Python", "APIs"]);

        let stored = ctx.db.insert(original.clone()).await.unwrap();
        assert_eq!(stored, original);

        let found = ctx.db.find("E123").await.unwrap();
        assert_eq!(found, Some(original));
        assert_eq!(ctx.db.find("E999").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "Requires Docker for the PostgreSQL test container"]
    async fn test_unique_constraint_reports_duplicate_key() {
        let ctx = TestContext::new().await;
        ctx.db.insert(employee("E1", "HR", 1000.0, "2023-01-01", &[])).await.unwrap();

        let err = ctx
            .db
            .insert(employee("E1", "Sales", 2000.0, "2024-01-01", &[]))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateKey { ref employee_id } if employee_id == "E1"));
    }

    #[tokio::test]
    #[ignore = "Requires Docker for the PostgreSQL test container"]
    async fn test_concurrent_creates_with_same_id() {
        let ctx = TestContext::new().await;
        let payload = employee_json("RACE", "Engineering", 1000.0, "2023-01-01", &[]);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let app = ctx.app.clone();
            let payload = payload.clone();
            handles.push(tokio::spawn(async move {
                send(&app, Method::POST, "/employees", Some(payload)).await.0
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                StatusCode::OK => accepted += 1,
                status => assert_eq!(status, StatusCode::BAD_REQUEST),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(ctx.db.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[ignore = "Requires Docker for the PostgreSQL test container"]
    async fn test_patch_updates_only_given_fields() {
        let ctx = TestContext::new().await;
        ctx.db
            .insert(employee("E1", "Engineering", 75000.0, "2023-01-15", &["Python"]))
            .await
            .unwrap();

        let patch = EmployeePatch {
            salary: Some(80000.0),
            skills: Some(vec!["Rust".to_string(), "Go".to_string()]),
            ..Default::default()
        };
        let updated = ctx.db.update("E1", &patch).await.unwrap().unwrap();

        assert_eq!(updated.salary, 80000.0);
        assert_eq!(updated.skills, vec!["Rust", "Go"]);
        assert_eq!(updated.name, "Employee E1");
        assert_eq!(updated.department, "Engineering");

        assert!(ctx.db.update("NOPE", &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "Requires Docker for the PostgreSQL test container"]
    async fn test_queries_against_postgres() {
        let ctx = TestContext::new().await;
        seed(&ctx.app, &sample_employees()).await;
        seed(&ctx.app, &[employee_json("E126", "Engineering", 90000.0, "2022-12-01", &["Pythonic"])]).await;

        let engineering = ctx.db.list(Some("Engineering")).await.unwrap();
        let ids: Vec<&str> = engineering.iter().map(|e| e.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["E125", "E123", "E126"]);

        let averages = ctx.db.average_salary_by_department().await.unwrap();
        assert_eq!(
            averages,
            vec![
                DepartmentSalary::from_mean("Engineering", 83333.333333),
                DepartmentSalary::from_mean("HR", 60000.0),
            ]
        );
        assert_eq!(averages[0].avg_salary, 83333.33);

        let python = ctx.db.find_by_skill("Python").await.unwrap();
        let ids: Vec<&str> = python.iter().map(|e| e.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["E123", "E125"]);
    }

    #[tokio::test]
    #[ignore = "Requires Docker for the PostgreSQL test container"]
    async fn test_delete_and_health_over_http() {
        let ctx = TestContext::new().await;
        seed(&ctx.app, &sample_employees()).await;

        let (status, body) = send(&ctx.app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "database": "connected"}));

        let (status, _) = send(&ctx.app, Method::DELETE, "/employees/E124", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&ctx.app, Method::GET, "/employees/E124", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!ctx.db.delete("E124").await.unwrap());

        let health = ctx.db.get_pool_health();
        assert!(!health.is_closed);

        ctx.db.close().await;
        let (_, body) = send(&ctx.app, Method::GET, "/health", None).await;
        assert_eq!(body["status"], "unhealthy");
    }
}
