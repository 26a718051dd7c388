use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use derive_more::Display;
use serde_json::json;

/// Failures reported by the storage collaborators.
#[derive(Debug, Display)]
pub enum StoreError {
    /// The (employee_id, date) key is already taken.
    #[display(fmt = "record already exists")]
    Duplicate,
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
    /// A stored row could not be mapped back into the domain.
    #[display(fmt = "undecodable row: {}", _0)]
    Decode(String),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Mark-in / mark-out failures that reach the caller.
///
/// Idempotent repeats are not errors and never show up here.
#[derive(Debug, Display)]
pub enum AttendanceError {
    #[display(fmt = "Employee not found")]
    EmployeeNotFound(u64),
    #[display(fmt = "No attendance record found for today")]
    NoRecordFound { employee_id: u64, date: NaiveDate },
    #[display(fmt = "Invalid stored login time")]
    InvalidStoredLogin { employee_id: u64, date: NaiveDate },
    #[display(fmt = "Logout time precedes login time")]
    ClockSkewRejected { employee_id: u64, minutes: i64 },
    #[display(fmt = "Internal Server Error")]
    Store(StoreError),
}

impl std::error::Error for AttendanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttendanceError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for AttendanceError {
    fn from(e: StoreError) -> Self {
        AttendanceError::Store(e)
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::EmployeeNotFound(_) | AttendanceError::NoRecordFound { .. } => {
                StatusCode::NOT_FOUND
            }
            AttendanceError::InvalidStoredLogin { .. }
            | AttendanceError::ClockSkewRejected { .. } => StatusCode::BAD_REQUEST,
            AttendanceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Store details stay in the logs; Display of Store is generic.
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
