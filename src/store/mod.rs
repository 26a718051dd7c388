//! Storage collaborators of the attendance service.
//!
//! - `ClockStore`: the one-record-per-day attendance table
//! - `EmployeeDirectory`: read-only identity lookup

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreResult;
use crate::model::attendance::AttendanceRecord;

pub mod directory;
#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use directory::{CachedDirectory, EmployeeDirectory, MySqlEmployeeDirectory};
pub use mysql::MySqlClockStore;

/// Durable attendance records keyed by (employee_id, date).
#[async_trait]
pub trait ClockStore: Send + Sync {
    async fn find_one(&self, employee_id: u64, date: NaiveDate)
    -> StoreResult<Option<AttendanceRecord>>;

    /// Creates the day's record. A taken key fails with `StoreError::Duplicate`.
    async fn insert(&self, record: &AttendanceRecord) -> StoreResult<()>;

    /// Persists the clock-out fields of `record`.
    ///
    /// Only an open record is written; returns `false` when the stored row was
    /// already closed (or is gone), in which case nothing changes.
    async fn save(&self, record: &AttendanceRecord) -> StoreResult<bool>;

    /// Newest day first.
    async fn list_all(&self) -> StoreResult<Vec<AttendanceRecord>>;

    /// Oldest day first.
    async fn list_for_employee(&self, employee_id: u64) -> StoreResult<Vec<AttendanceRecord>>;
}
