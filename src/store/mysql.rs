use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};

use crate::error::{StoreError, StoreResult};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

use super::ClockStore;

/// MySQL error state for integrity violations (duplicate key included).
const INTEGRITY_VIOLATION: &str = "23000";

const SELECT_COLUMNS: &str = r#"
    SELECT employee_id, name, email, date,
           login_time, login_at, logout_time, logout_at,
           hours_worked, status
    FROM attendance
"#;

#[derive(Debug, FromRow)]
struct AttendanceRow {
    employee_id: u64,
    name: String,
    email: String,
    date: NaiveDate,
    login_time: Option<String>,
    login_at: Option<DateTime<Utc>>,
    logout_time: Option<String>,
    logout_at: Option<DateTime<Utc>>,
    hours_worked: Option<f64>,
    status: Option<String>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .map(|s| {
                s.parse::<AttendanceStatus>().map_err(|_| {
                    StoreError::Decode(format!(
                        "unknown status {:?} for employee {} on {}",
                        s, row.employee_id, row.date
                    ))
                })
            })
            .transpose()?;

        Ok(AttendanceRecord {
            employee_id: row.employee_id,
            name: row.name,
            email: row.email,
            date: row.date,
            login_at: row.login_at,
            login_time: row.login_time,
            logout_at: row.logout_at,
            logout_time: row.logout_time,
            hours_worked: row.hours_worked,
            status,
        })
    }
}

fn into_records(rows: Vec<AttendanceRow>) -> StoreResult<Vec<AttendanceRecord>> {
    rows.into_iter().map(AttendanceRecord::try_from).collect()
}

#[derive(Clone)]
pub struct MySqlClockStore {
    pool: MySqlPool,
}

impl MySqlClockStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClockStore for MySqlClockStore {
    async fn find_one(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE employee_id = ? AND date = ?");

        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn insert(&self, record: &AttendanceRecord) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, name, email, date, login_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.employee_id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(record.date)
        .bind(record.login_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(INTEGRITY_VIOLATION) =>
            {
                Err(StoreError::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, record: &AttendanceRecord) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET logout_at = ?, hours_worked = ?, status = ?
            WHERE employee_id = ?
            AND date = ?
            AND logout_at IS NULL
            AND logout_time IS NULL
            "#,
        )
        .bind(record.logout_at)
        .bind(record.hours_worked)
        .bind(record.status.map(|s| s.to_string()))
        .bind(record.employee_id)
        .bind(record.date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> StoreResult<Vec<AttendanceRecord>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY date DESC, employee_id ASC");

        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        into_records(rows)
    }

    async fn list_for_employee(&self, employee_id: u64) -> StoreResult<Vec<AttendanceRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE employee_id = ? ORDER BY date ASC");

        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;

        into_records(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: Option<&str>) -> AttendanceRow {
        AttendanceRow {
            employee_id: 3,
            name: "John Doe".to_string(),
            email: "john.doe@company.com".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            login_time: Some("09:00:00".to_string()),
            login_at: None,
            logout_time: None,
            logout_at: None,
            hours_worked: Some(4.25),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn row_maps_stored_status() {
        let record = AttendanceRecord::try_from(row(Some("Half Day"))).unwrap();
        assert_eq!(record.status, Some(AttendanceStatus::HalfDay));
        assert_eq!(record.login_time.as_deref(), Some("09:00:00"));
    }

    #[test]
    fn row_with_unknown_status_is_a_decode_error() {
        let err = AttendanceRecord::try_from(row(Some("Late"))).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
