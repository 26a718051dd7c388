use crate::auth::auth::AuthUser;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::service::AttendanceService;
use crate::timekeeping::{AttendanceZone, MarkInOutcome, MarkOutOutcome};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "employee_id": 42,
    "name": "John Doe",
    "email": "john.doe@company.com",
    "date": "2026-01-01",
    "login_time": "09:00:00",
    "login_at": "2026-01-01T03:30:00Z",
    "logout_time": "17:30:00",
    "logout_at": "2026-01-01T12:00:00Z",
    "hours_worked": 8.5,
    "status": "Present"
}))]
pub struct AttendanceView {
    pub employee_id: u64,
    pub name: String,
    pub email: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Local wall-clock time of mark-in
    #[schema(example = "09:00:00")]
    pub login_time: Option<String>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub login_at: Option<DateTime<Utc>>,
    /// Local wall-clock time of mark-out
    #[schema(example = "17:30:00")]
    pub logout_time: Option<String>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub logout_at: Option<DateTime<Utc>>,
    #[schema(example = 8.5)]
    pub hours_worked: Option<f64>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceView {
    /// Display times are rendered from the instants; stored legacy strings
    /// are only shown when the instant is missing.
    pub fn new(record: &AttendanceRecord, zone: &AttendanceZone) -> Self {
        let render = |instant: Option<DateTime<Utc>>, legacy: &Option<String>| {
            instant
                .map(|at| zone.format_time(at))
                .or_else(|| legacy.clone())
        };

        Self {
            employee_id: record.employee_id,
            name: record.name.clone(),
            email: record.email.clone(),
            date: record.date,
            login_time: render(record.login_at, &record.login_time),
            login_at: record.login_at,
            logout_time: render(record.logout_at, &record.logout_time),
            logout_at: record.logout_at,
            hours_worked: record.hours_worked,
            status: record.status,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MarkOutResponse {
    #[schema(example = "Logout time recorded")]
    pub message: String,
    pub attendance: AttendanceView,
    pub status: AttendanceStatus,
    #[schema(example = 7.5)]
    pub hours_worked: f64,
}

fn views(records: &[AttendanceRecord], zone: &AttendanceZone) -> Vec<AttendanceView> {
    records.iter().map(|r| AttendanceView::new(r, zone)).collect()
}

/// Mark-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/mark-in",
    responses(
        (status = 201, description = "Login time recorded", body = Object, example = json!({
            "message": "Login time recorded",
            "attendance": {
                "employee_id": 42,
                "name": "John Doe",
                "email": "john.doe@company.com",
                "date": "2026-01-01",
                "login_time": "09:00:00",
                "login_at": "2026-01-01T03:30:00Z"
            }
        })),
        (status = 200, description = "Already marked in today", body = Object, example = json!({
            "message": "Already marked in"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_in(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    match service.mark_in(employee_id).await? {
        MarkInOutcome::Created(record) => Ok(HttpResponse::Created().json(json!({
            "message": "Login time recorded",
            "attendance": AttendanceView::new(&record, service.zone())
        }))),
        MarkInOutcome::AlreadyMarked => Ok(HttpResponse::Ok().json(json!({
            "message": "Already marked in"
        }))),
    }
}

/// Mark-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/mark-out",
    responses(
        (status = 200, description = "Logout time recorded, or already marked out", body = MarkOutResponse),
        (status = 400, description = "Stored login time is unusable", body = Object, example = json!({
            "message": "Invalid stored login time"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 404, description = "No attendance record for today", body = Object, example = json!({
            "message": "No attendance record found for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_out(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    match service.mark_out(employee_id).await? {
        MarkOutOutcome::Completed { record, worked } => Ok(HttpResponse::Ok().json(MarkOutResponse {
            message: "Logout time recorded".to_string(),
            attendance: AttendanceView::new(&record, service.zone()),
            status: worked.status,
            hours_worked: worked.rounded_hours(),
        })),
        MarkOutOutcome::AlreadyMarked => Ok(HttpResponse::Ok().json(json!({
            "message": "Already marked out"
        }))),
    }
}

/// Caller's own attendance, oldest day first
#[utoipa::path(
    get,
    path = "/api/attendance/my",
    responses(
        (status = 200, description = "Attendance history", body = [AttendanceView]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_attendance(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let records = service.list_mine(employee_id).await?;

    Ok(HttpResponse::Ok().json(views(&records, service.zone())))
}

/// Every attendance record, newest day first (admin only)
#[utoipa::path(
    get,
    path = "/api/attendance/all",
    responses(
        (status = 200, description = "All attendance records", body = [AttendanceView]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn all_attendance(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let records = service.list_all().await?;

    Ok(HttpResponse::Ok().json(views(&records, service.zone())))
}
