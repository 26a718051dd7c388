//! In-memory collaborators for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{StoreError, StoreResult};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::EmployeeSnapshot;

use super::{ClockStore, EmployeeDirectory};

#[derive(Default)]
pub struct InMemoryClockStore {
    records: DashMap<(u64, NaiveDate), AttendanceRecord>,
    failing: AtomicBool,
}

impl InMemoryClockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a row in place as-is, bypassing the uniqueness check.
    pub fn seed(&self, record: AttendanceRecord) {
        self.records.insert((record.employee_id, record.date), record);
    }

    pub fn get(&self, employee_id: u64, date: NaiveDate) -> Option<AttendanceRecord> {
        self.records.get(&(employee_id, date)).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Makes every following call fail like a lost database connection.
    pub fn fail_with_database_errors(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ClockStore for InMemoryClockStore {
    async fn find_one(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        self.check()?;
        Ok(self.get(employee_id, date))
    }

    async fn insert(&self, record: &AttendanceRecord) -> StoreResult<()> {
        self.check()?;
        match self.records.entry((record.employee_id, record.date)) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn save(&self, record: &AttendanceRecord) -> StoreResult<bool> {
        self.check()?;
        match self.records.get_mut(&(record.employee_id, record.date)) {
            Some(mut stored) if !stored.is_closed() => {
                stored.logout_at = record.logout_at;
                stored.hours_worked = record.hours_worked;
                stored.status = record.status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_all(&self) -> StoreResult<Vec<AttendanceRecord>> {
        self.check()?;
        let mut records: Vec<_> = self.records.iter().map(|e| e.value().clone()).collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(a.employee_id.cmp(&b.employee_id)));
        Ok(records)
    }

    async fn list_for_employee(&self, employee_id: u64) -> StoreResult<Vec<AttendanceRecord>> {
        self.check()?;
        let mut records: Vec<_> = self
            .records
            .iter()
            .filter(|e| e.key().0 == employee_id)
            .map(|e| e.value().clone())
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    employees: DashMap<u64, EmployeeSnapshot>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, employee_id: u64, name: &str, email: &str) -> Self {
        self.add(employee_id, name, email);
        self
    }

    pub fn add(&self, employee_id: u64, name: &str, email: &str) {
        self.employees.insert(
            employee_id,
            EmployeeSnapshot {
                name: name.to_string(),
                email: email.to_string(),
            },
        );
    }

    pub fn rename(&self, employee_id: u64, name: &str) {
        if let Some(mut employee) = self.employees.get_mut(&employee_id) {
            employee.name = name.to_string();
        }
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryDirectory {
    async fn find_by_id(&self, employee_id: u64) -> StoreResult<Option<EmployeeSnapshot>> {
        Ok(self.employees.get(&employee_id).map(|e| e.clone()))
    }
}
