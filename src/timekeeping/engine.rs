use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{AttendanceError, StoreError};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::store::{ClockStore, EmployeeDirectory};

use super::{AttendanceZone, ClockSkewPolicy, TimePolicy};

pub const PRESENT_MIN_HOURS: f64 = 7.5;
pub const HALF_DAY_MIN_HOURS: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub enum MarkInOutcome {
    Created(AttendanceRecord),
    AlreadyMarked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkOutOutcome {
    Completed {
        record: AttendanceRecord,
        worked: WorkedTime,
    },
    AlreadyMarked,
}

/// Elapsed time between login and logout, with its classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkedTime {
    pub minutes: i64,
    pub status: AttendanceStatus,
}

impl WorkedTime {
    pub fn hours(&self) -> f64 {
        self.minutes as f64 / 60.0
    }

    /// Two-decimal hours, as stored and reported.
    pub fn rounded_hours(&self) -> f64 {
        round_hours(self.hours())
    }
}

/// Whole minutes from `login` to `logout`, floored.
pub fn minutes_worked(login: DateTime<Utc>, logout: DateTime<Utc>) -> i64 {
    (logout - login).num_seconds().div_euclid(60)
}

/// Thresholds apply to unrounded hours.
pub fn classify(hours: f64) -> AttendanceStatus {
    if hours >= PRESENT_MIN_HOURS {
        AttendanceStatus::Present
    } else if hours >= HALF_DAY_MIN_HOURS {
        AttendanceStatus::HalfDay
    } else {
        AttendanceStatus::Absent
    }
}

pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// `login_at` if present, otherwise `date` + legacy `login_time` in `zone`.
pub fn login_instant(record: &AttendanceRecord, zone: &AttendanceZone) -> Option<DateTime<Utc>> {
    record.login_at.or_else(|| {
        record
            .login_time
            .as_deref()
            .and_then(|time| zone.reconstruct(record.date, time))
    })
}

/// Measures and classifies a day. A refused negative duration comes back as
/// `Err(minutes)`.
pub fn account(
    login: DateTime<Utc>,
    logout: DateTime<Utc>,
    clock_skew: ClockSkewPolicy,
) -> Result<WorkedTime, i64> {
    let minutes = minutes_worked(login, logout);
    if logout < login && clock_skew == ClockSkewPolicy::Reject {
        return Err(minutes);
    }

    Ok(WorkedTime {
        minutes,
        status: classify(minutes as f64 / 60.0),
    })
}

/// Applies mark-in / mark-out to the single record of an employee's day.
pub struct TimeAccountingEngine {
    store: Arc<dyn ClockStore>,
    policy: TimePolicy,
}

impl TimeAccountingEngine {
    pub fn new(store: Arc<dyn ClockStore>, policy: TimePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &TimePolicy {
        &self.policy
    }

    pub async fn mark_in(
        &self,
        employee_id: u64,
        now: DateTime<Utc>,
        directory: &dyn EmployeeDirectory,
    ) -> Result<MarkInOutcome, AttendanceError> {
        let date = self.policy.zone.day_of(now);

        if self.store.find_one(employee_id, date).await?.is_some() {
            return Ok(MarkInOutcome::AlreadyMarked);
        }

        let employee = directory
            .find_by_id(employee_id)
            .await?
            .ok_or(AttendanceError::EmployeeNotFound(employee_id))?;

        let record = AttendanceRecord::open(employee_id, employee, date, now);

        // The existence check above is not atomic with the insert; the store's
        // key decides a race.
        match self.store.insert(&record).await {
            Ok(()) => Ok(MarkInOutcome::Created(record)),
            Err(StoreError::Duplicate) => Ok(MarkInOutcome::AlreadyMarked),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn mark_out(
        &self,
        employee_id: u64,
        now: DateTime<Utc>,
    ) -> Result<MarkOutOutcome, AttendanceError> {
        let date = self.policy.zone.day_of(now);

        let mut record = self
            .store
            .find_one(employee_id, date)
            .await?
            .ok_or(AttendanceError::NoRecordFound { employee_id, date })?;

        if record.is_closed() {
            return Ok(MarkOutOutcome::AlreadyMarked);
        }

        let login = login_instant(&record, &self.policy.zone)
            .ok_or(AttendanceError::InvalidStoredLogin { employee_id, date })?;

        let worked = account(login, now, self.policy.clock_skew)
            .map_err(|minutes| AttendanceError::ClockSkewRejected { employee_id, minutes })?;

        record.close(now, worked.rounded_hours(), worked.status);

        if !self.store.save(&record).await? {
            return Ok(MarkOutOutcome::AlreadyMarked);
        }

        Ok(MarkOutOutcome::Completed { record, worked })
    }

    pub async fn list_all(&self) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn list_mine(&self, employee_id: u64) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        Ok(self.store.list_for_employee(employee_id).await?)
    }
}
