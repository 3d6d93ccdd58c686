//! DTR Service
//!
//! This crate generates Daily Time Records: it resolves cutoff-period
//! labels, buckets raw attendance punches into AM/PM arrival and departure
//! slots per day, and totals undertime for the period. Rendering of the
//! resulting documents lives in the pdf-service crate.

pub mod models;
pub mod period;
pub mod records;
pub mod repository;
pub mod service;

pub use models::{DailyRecord, DtrDocument, DtrTotals, Employee, Punch};
pub use period::{CutoffPeriod, PeriodError};
pub use records::{build_daily_records, format_time};
pub use repository::{
    EmployeeRepository, InMemoryEmployeeRepository, InMemoryPunchRepository, PunchRepository,
};
pub use service::{DtrService, GenerationResult, ServiceError};
