use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::error::AttendanceError;
use crate::model::attendance::AttendanceRecord;
use crate::store::{ClockStore, EmployeeDirectory};
use crate::timekeeping::{
    AttendanceZone, Clock, MarkInOutcome, MarkOutOutcome, TimeAccountingEngine, TimePolicy,
};

/// Entry point for the attendance endpoints: reads the wall clock, hands the
/// instant to the engine and logs what happened.
pub struct AttendanceService {
    engine: TimeAccountingEngine,
    directory: Arc<dyn EmployeeDirectory>,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub fn new(
        store: Arc<dyn ClockStore>,
        directory: Arc<dyn EmployeeDirectory>,
        clock: Arc<dyn Clock>,
        policy: TimePolicy,
    ) -> Self {
        Self {
            engine: TimeAccountingEngine::new(store, policy),
            directory,
            clock,
        }
    }

    pub fn zone(&self) -> &AttendanceZone {
        &self.engine.policy().zone
    }

    #[instrument(name = "attendance_mark_in", skip(self))]
    pub async fn mark_in(&self, employee_id: u64) -> Result<MarkInOutcome, AttendanceError> {
        let now = self.clock.now();
        let outcome = self
            .engine
            .mark_in(employee_id, now, self.directory.as_ref())
            .await
            .inspect_err(log_failure)?;

        match &outcome {
            MarkInOutcome::Created(record) => {
                info!(date = %record.date, login_at = %now, "Marked in")
            }
            MarkInOutcome::AlreadyMarked => info!("Already marked in"),
        }

        Ok(outcome)
    }

    #[instrument(name = "attendance_mark_out", skip(self))]
    pub async fn mark_out(&self, employee_id: u64) -> Result<MarkOutOutcome, AttendanceError> {
        let now = self.clock.now();
        let outcome = self
            .engine
            .mark_out(employee_id, now)
            .await
            .inspect_err(log_failure)?;

        match &outcome {
            MarkOutOutcome::Completed { record, worked } => info!(
                date = %record.date,
                minutes = worked.minutes,
                status = %worked.status,
                "Marked out"
            ),
            MarkOutOutcome::AlreadyMarked => info!("Already marked out"),
        }

        Ok(outcome)
    }

    pub async fn list_mine(&self, employee_id: u64) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        self.engine.list_mine(employee_id).await.inspect_err(log_failure)
    }

    pub async fn list_all(&self) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        self.engine.list_all().await.inspect_err(log_failure)
    }
}

fn log_failure(e: &AttendanceError) {
    match e {
        AttendanceError::Store(cause) => error!(error = %cause, "Attendance storage failure"),
        AttendanceError::InvalidStoredLogin { employee_id, date } => {
            warn!(employee_id, %date, "Stored login time cannot be parsed")
        }
        AttendanceError::ClockSkewRejected {
            employee_id,
            minutes,
        } => warn!(employee_id, minutes, "Logout precedes login"),
        _ => {}
    }
}
