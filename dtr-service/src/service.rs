//! DTR generation service
//!
//! Business logic for Daily Time Record generation: resolve the cutoff
//! period, fetch identity and punches from the repositories, and assemble
//! the document. Bulk operations iterate employees sequentially and record
//! a per-employee outcome instead of aborting the run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use error::ErrorResponse;

use crate::models::{DtrDocument, DtrTotals};
use crate::period::{CutoffPeriod, PeriodError};
use crate::records::build_daily_records;
use crate::repository::{EmployeeRepository, PunchRepository};

/// Service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid cutoff period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        let code = match err {
            ServiceError::InvalidPeriod(_) => "PERIOD_PARSE_FAILED",
            ServiceError::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            ServiceError::Fetch(_) => "FETCH_FAILED",
        };
        Self::new(code, err.to_string())
    }
}

impl From<ServiceError> for error::AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidPeriod(e) => error::AppError::Parse(e.to_string()),
            ServiceError::EmployeeNotFound(id) => {
                error::AppError::NotFound(format!("Employee {}", id))
            }
            ServiceError::Fetch(message) => {
                error::AppError::Fetch(error::FetchError::QueryFailed(message))
            }
        }
    }
}

/// Outcome of one employee's generation in a bulk run.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResult {
    pub employee_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DtrDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl GenerationResult {
    fn completed(employee_id: String, document: DtrDocument) -> Self {
        Self {
            employee_id,
            success: true,
            document: Some(document),
            error: None,
        }
    }

    fn failed(employee_id: String, error: ErrorResponse) -> Self {
        Self {
            employee_id,
            success: false,
            document: None,
            error: Some(error),
        }
    }
}

/// DTR generation over punch and employee repositories.
pub struct DtrService {
    punches: Arc<dyn PunchRepository>,
    employees: Arc<dyn EmployeeRepository>,
}

impl DtrService {
    pub fn new(punches: Arc<dyn PunchRepository>, employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { punches, employees }
    }

    /// Generate the DTR document for one employee and cutoff period.
    pub async fn generate(
        &self,
        employee_id: &str,
        cutoff_label: &str,
    ) -> Result<DtrDocument, ServiceError> {
        let period = CutoffPeriod::parse(cutoff_label)?;

        let employee = self
            .employees
            .find_by_id(employee_id)
            .await
            .map_err(|e| ServiceError::Fetch(e.to_string()))?
            .ok_or_else(|| ServiceError::EmployeeNotFound(employee_id.to_string()))?;

        let (month_start, month_end) = period.month_range()?;
        let punches = self
            .punches
            .find_by_employee_and_range(employee_id, month_start, month_end)
            .await
            .map_err(|e| ServiceError::Fetch(e.to_string()))?;

        let daily_records = build_daily_records(&punches, &period);
        let totals = DtrTotals::from_records(&daily_records);
        info!(
            "Generated DTR for {} over {} ({} punches)",
            employee_id,
            cutoff_label,
            punches.len()
        );

        Ok(DtrDocument {
            employee_name: employee.full_name(),
            employee_id: employee.employee_id,
            department: employee.department,
            cutoff_label: period.label(),
            month_name: period.month_name().to_string(),
            year: period.year,
            daily_records,
            totals,
        })
    }

    /// Generate DTRs for an explicit id list, continuing past failures.
    ///
    /// Returns one result per input id, in input order.
    pub async fn generate_for_employees(
        &self,
        employee_ids: &[String],
        cutoff_label: &str,
    ) -> Vec<GenerationResult> {
        let mut results = Vec::with_capacity(employee_ids.len());
        for employee_id in employee_ids {
            match self.generate(employee_id, cutoff_label).await {
                Ok(document) => {
                    results.push(GenerationResult::completed(employee_id.clone(), document));
                }
                Err(err) => {
                    warn!("DTR generation failed for {}: {}", employee_id, err);
                    results.push(GenerationResult::failed(
                        employee_id.clone(),
                        ErrorResponse::from(&err),
                    ));
                }
            }
        }
        results
    }

    /// Generate DTRs for a whole department.
    ///
    /// Resolving the roster is all-or-nothing; per-employee generation then
    /// follows the id-list path.
    pub async fn generate_for_department(
        &self,
        department: &str,
        cutoff_label: &str,
    ) -> Result<Vec<GenerationResult>, ServiceError> {
        let employees = self
            .employees
            .find_by_department(department)
            .await
            .map_err(|e| ServiceError::Fetch(e.to_string()))?;
        let ids: Vec<String> = employees.into_iter().map(|e| e.employee_id).collect();
        info!("Generating {} DTRs for department {}", ids.len(), department);
        Ok(self.generate_for_employees(&ids, cutoff_label).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, Punch};
    use crate::repository::{InMemoryEmployeeRepository, InMemoryPunchRepository};
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use error::FetchError;

    fn employee(id: &str, department: &str) -> Employee {
        Employee {
            employee_id: id.to_string(),
            first_name: "Juan".to_string(),
            middle_name: Some("Luna".to_string()),
            last_name: "Dela Cruz".to_string(),
            department: department.to_string(),
        }
    }

    fn seeded_service() -> DtrService {
        let punches = InMemoryPunchRepository::new();
        punches.add(
            Punch::new("EMP001", NaiveDate::from_ymd_opt(2025, 10, 2).unwrap())
                .with_times("8:05", "17:10")
                .with_undertime(0),
        );

        let employees = InMemoryEmployeeRepository::new();
        employees.add(employee("EMP001", "Accounting")).unwrap();
        employees.add(employee("EMP002", "Accounting")).unwrap();

        DtrService::new(Arc::new(punches), Arc::new(employees))
    }

    struct FailingPunchRepository;

    #[async_trait]
    impl crate::repository::PunchRepository for FailingPunchRepository {
        async fn find_by_employee_and_range(
            &self,
            _employee_id: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<Punch>> {
            Err(FetchError::QueryFailed("connection reset".to_string()).into())
        }
    }

    #[tokio::test]
    async fn test_generate_single_punch_period() {
        let service = seeded_service();
        let document = service.generate("EMP001", "Oct 1 - 15, 2025").await.unwrap();

        assert_eq!(document.employee_id, "EMP001");
        assert_eq!(document.employee_name, "Juan L. Dela Cruz");
        assert_eq!(document.department, "Accounting");
        assert_eq!(document.month_name, "October");
        assert_eq!(document.year, 2025);
        assert_eq!(document.daily_records.len(), 15);

        let day_two = &document.daily_records[1];
        assert_eq!(day_two.am_arrival.as_deref(), Some("8:05 AM"));
        assert_eq!(day_two.pm_departure.as_deref(), Some("5:10 PM"));
        for record in document
            .daily_records
            .iter()
            .filter(|r| r.day != 2)
        {
            assert!(record.am_arrival.is_none());
            assert!(record.pm_departure.is_none());
        }
        assert_eq!(document.totals.total_undertime(), "0:00");
    }

    #[tokio::test]
    async fn test_generate_unknown_employee() {
        let service = seeded_service();
        let result = service.generate("EMP999", "Oct 1 - 15, 2025").await;
        assert!(matches!(result, Err(ServiceError::EmployeeNotFound(_))));
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_period() {
        let service = seeded_service();
        let result = service.generate("EMP001", "October 1 to 15").await;
        assert!(matches!(result, Err(ServiceError::InvalidPeriod(_))));
    }

    #[tokio::test]
    async fn test_generate_surfaces_fetch_failure() {
        let employees = InMemoryEmployeeRepository::new();
        employees.add(employee("EMP001", "Accounting")).unwrap();
        let service = DtrService::new(Arc::new(FailingPunchRepository), Arc::new(employees));

        let result = service.generate("EMP001", "Oct 1 - 15, 2025").await;
        assert!(matches!(result, Err(ServiceError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_bulk_continues_past_failures() {
        let service = seeded_service();
        let ids = vec![
            "EMP001".to_string(),
            "EMP999".to_string(),
            "EMP002".to_string(),
        ];
        let results = service.generate_for_employees(&ids, "Oct 1 - 15, 2025").await;

        assert_eq!(results.len(), 3);
        assert_eq!(
            results.iter().map(|r| r.employee_id.as_str()).collect::<Vec<_>>(),
            ["EMP001", "EMP999", "EMP002"]
        );
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[2].success);
        assert_eq!(
            results[1].error.as_ref().unwrap().code,
            "EMPLOYEE_NOT_FOUND"
        );
        assert!(results[1].document.is_none());
    }

    #[tokio::test]
    async fn test_department_generation() {
        let service = seeded_service();
        let results = service
            .generate_for_department("Accounting", "Oct 1 - 15, 2025")
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
    }

    #[tokio::test]
    async fn test_department_generation_empty_roster() {
        let service = seeded_service();
        let results = service
            .generate_for_department("Engineering", "Oct 1 - 15, 2025")
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_result_wire_shape() {
        let service = seeded_service();
        let ids = vec!["EMP999".to_string()];
        let results = service.generate_for_employees(&ids, "Oct 1 - 15, 2025").await;

        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["employee_id"], "EMP999");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "EMPLOYEE_NOT_FOUND");
        assert!(json.get("document").is_none());
    }
}
