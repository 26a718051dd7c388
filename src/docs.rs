use crate::api::attendance::{AttendanceView, MarkOutResponse};
use crate::model::attendance::AttendanceStatus;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance

Daily mark-in / mark-out tracking for employees of the HRM system.

### Rules
- One record per employee per calendar day (fixed zone, default UTC+05:30)
- Repeated mark-in or mark-out is reported, never an error
- Hours worked are measured at mark-out:
  - **7.5 h or more** → `Present`
  - **4 h or more** → `Half Day`
  - otherwise → `Absent`

### Security
All endpoints require a **JWT Bearer** access token issued by the auth service.
Listing everyone's attendance is restricted to **Admin**.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::mark_in,
        crate::api::attendance::mark_out,
        crate::api::attendance::my_attendance,
        crate::api::attendance::all_attendance
    ),
    components(
        schemas(
            AttendanceView,
            AttendanceStatus,
            MarkOutResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
