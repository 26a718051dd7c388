use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::employee::EmployeeSnapshot;

/// Day classification, decided once at mark-out.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
pub enum AttendanceStatus {
    Present,
    #[serde(rename = "Half Day")]
    #[strum(serialize = "Half Day")]
    HalfDay,
    Absent,
}

/// One row per (employee_id, date).
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub employee_id: u64,
    /// Identity snapshot taken at mark-in.
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    pub login_at: Option<DateTime<Utc>>,
    /// Legacy `HH:MM:SS`, only read when `login_at` is missing.
    pub login_time: Option<String>,
    pub logout_at: Option<DateTime<Utc>>,
    /// Legacy `HH:MM:SS`
    pub logout_time: Option<String>,
    pub hours_worked: Option<f64>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceRecord {
    /// A freshly marked-in record.
    pub fn open(
        employee_id: u64,
        employee: EmployeeSnapshot,
        date: NaiveDate,
        login_at: DateTime<Utc>,
    ) -> Self {
        Self {
            employee_id,
            name: employee.name,
            email: employee.email,
            date,
            login_at: Some(login_at),
            login_time: None,
            logout_at: None,
            logout_time: None,
            hours_worked: None,
            status: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.logout_at.is_some() || self.logout_time.is_some()
    }

    pub fn close(&mut self, logout_at: DateTime<Utc>, hours_worked: f64, status: AttendanceStatus) {
        self.logout_at = Some(logout_at);
        self.hours_worked = Some(hours_worked);
        self.status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> EmployeeSnapshot {
        EmployeeSnapshot {
            name: "Asha Rao".to_string(),
            email: "asha@company.com".to_string(),
        }
    }

    #[test]
    fn status_uses_display_names() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "Half Day");
        assert_eq!("Half Day".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::HalfDay);
        assert_eq!(
            serde_json::to_value(AttendanceStatus::HalfDay).unwrap(),
            serde_json::json!("Half Day")
        );
        assert_eq!(AttendanceStatus::Present.as_ref(), "Present");
    }

    #[test]
    fn open_then_close() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let login = Utc.with_ymd_and_hms(2025, 3, 10, 3, 30, 0).unwrap();
        let mut record = AttendanceRecord::open(7, snapshot(), date, login);

        assert_eq!(record.name, "Asha Rao");
        assert_eq!(record.login_at, Some(login));
        assert!(!record.is_closed());
        assert!(record.status.is_none());

        let logout = Utc.with_ymd_and_hms(2025, 3, 10, 11, 0, 0).unwrap();
        record.close(logout, 7.5, AttendanceStatus::Present);
        assert!(record.is_closed());
        assert_eq!(record.hours_worked, Some(7.5));
    }

    #[test]
    fn legacy_logout_string_counts_as_closed() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let login = Utc.with_ymd_and_hms(2025, 3, 10, 3, 30, 0).unwrap();
        let mut record = AttendanceRecord::open(7, snapshot(), date, login);
        record.logout_time = Some("18:00:00".to_string());
        assert!(record.is_closed());
    }
}
