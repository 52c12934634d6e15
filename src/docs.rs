use crate::api::attendance_correction::{CorrectionDetails, ResolveCorrection};
use crate::error::ActionResponse;
use crate::model::correction::{CorrectionRequest, CorrectionStatus, CorrectionWithUser};
use crate::model::time_entry::TimeEntry;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Correction API",
        version = "0.1.0",
        description = r#"
## Attendance corrections

Employees file a request to amend a day's clock-in/clock-out record; HR or
an Admin approves or rejects it. Approved corrections are written into the
employee's time entry for that day.

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token.
Resolving a request requires the **HR** or **Admin** role.

### 📦 Response Format
- Intake and resolution answer `{ "success": bool, "message": string }`
- Listings return plain JSON arrays

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance_correction::submit_correction,
        crate::api::attendance_correction::list_corrections,
        crate::api::attendance_correction::get_correction,
        crate::api::attendance_correction::resolve_correction,
        crate::api::attendance_correction::list_time_entries
    ),
    components(
        schemas(
            CorrectionDetails,
            ResolveCorrection,
            ActionResponse,
            CorrectionStatus,
            CorrectionRequest,
            CorrectionWithUser,
            TimeEntry
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance Corrections", description = "Attendance correction workflow APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
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
