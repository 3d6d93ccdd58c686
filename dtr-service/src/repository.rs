//! Attendance data access.
//!
//! The hosted data store is an external collaborator; these traits are the
//! query surface the generation pipeline needs from it. In-memory
//! implementations back the tests and development setups.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use error::FetchError;

use crate::models::{Employee, Punch};

/// Punch queries for one employee.
#[async_trait]
pub trait PunchRepository: Send + Sync {
    /// All punches for an employee with dates in `[start, end]`, in store order.
    async fn find_by_employee_and_range(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Punch>>;
}

/// Employee identity queries.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Find an employee by id.
    async fn find_by_id(&self, employee_id: &str) -> Result<Option<Employee>>;

    /// All employees of a department, in store order.
    async fn find_by_department(&self, department: &str) -> Result<Vec<Employee>>;
}

/// In-memory punch store for testing and development.
pub struct InMemoryPunchRepository {
    punches: std::sync::RwLock<Vec<Punch>>,
}

impl InMemoryPunchRepository {
    pub fn new() -> Self {
        Self {
            punches: std::sync::RwLock::new(Vec::new()),
        }
    }

    /// Add a punch to the store.
    pub fn add(&self, punch: Punch) {
        self.punches.write().unwrap().push(punch);
    }
}

impl Default for InMemoryPunchRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PunchRepository for InMemoryPunchRepository {
    async fn find_by_employee_and_range(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Punch>> {
        let punches = self.punches.read().unwrap();
        Ok(punches
            .iter()
            .filter(|p| p.employee_id == employee_id && p.date >= start && p.date <= end)
            .cloned()
            .collect())
    }
}

/// In-memory employee store for testing and development.
pub struct InMemoryEmployeeRepository {
    employees: std::sync::RwLock<Vec<Employee>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self {
            employees: std::sync::RwLock::new(Vec::new()),
        }
    }

    /// Add an employee to the store. Duplicate ids are rejected.
    pub fn add(&self, employee: Employee) -> Result<()> {
        let mut employees = self.employees.write().unwrap();
        if employees.iter().any(|e| e.employee_id == employee.employee_id) {
            return Err(FetchError::DuplicateEntry(employee.employee_id).into());
        }
        employees.push(employee);
        Ok(())
    }
}

impl Default for InMemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_id(&self, employee_id: &str) -> Result<Option<Employee>> {
        let employees = self.employees.read().unwrap();
        Ok(employees
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned())
    }

    async fn find_by_department(&self, department: &str) -> Result<Vec<Employee>> {
        let employees = self.employees.read().unwrap();
        Ok(employees
            .iter()
            .filter(|e| e.department == department)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: &str, department: &str) -> Employee {
        Employee {
            employee_id: id.to_string(),
            first_name: "Test".to_string(),
            middle_name: None,
            last_name: id.to_string(),
            department: department.to_string(),
        }
    }

    #[tokio::test]
    async fn test_punch_range_query() {
        let repo = InMemoryPunchRepository::new();
        for day in [1, 10, 20] {
            repo.add(Punch::new(
                "EMP001",
                NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            ));
        }
        repo.add(Punch::new(
            "EMP002",
            NaiveDate::from_ymd_opt(2025, 10, 10).unwrap(),
        ));

        let found = repo
            .find_by_employee_and_range(
                "EMP001",
                NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.employee_id == "EMP001"));
    }

    #[tokio::test]
    async fn test_employee_lookup_by_id_and_department() {
        let repo = InMemoryEmployeeRepository::new();
        repo.add(employee("EMP001", "Accounting")).unwrap();
        repo.add(employee("EMP002", "Accounting")).unwrap();
        repo.add(employee("EMP003", "Engineering")).unwrap();

        let found = repo.find_by_id("EMP002").await.unwrap();
        assert_eq!(found.unwrap().employee_id, "EMP002");
        assert!(repo.find_by_id("EMP999").await.unwrap().is_none());

        let accounting = repo.find_by_department("Accounting").await.unwrap();
        assert_eq!(accounting.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_employee_rejected() {
        let repo = InMemoryEmployeeRepository::new();
        repo.add(employee("EMP001", "Accounting")).unwrap();
        let result = repo.add(employee("EMP001", "Engineering"));
        assert!(result.is_err());
    }
}
