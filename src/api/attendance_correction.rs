use crate::auth::auth::AuthUser;
use crate::error::{ActionResponse, CorrectionError};
use crate::model::correction::{CorrectionFilter, CorrectionStatus, NewCorrection};
use crate::store::CorrectionStore;
use crate::utils::week::week_start;
use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

const MISSING_FIELDS: &str = "Missing required fields.";
const INVALID_FORMAT: &str = "Invalid date or time format.";
const INVALID_STATUS: &str = "Invalid status.";

/// Intake form as posted by the client. Every field is required; they are
/// optional here so a missing one becomes a validation failure, not a
/// deserialization error.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionDetails {
    #[schema(example = "2024-06-12", format = "date")]
    pub date: Option<String>,
    #[schema(example = "09:00")]
    pub clock_in: Option<String>,
    #[schema(example = "18:00")]
    pub clock_out: Option<String>,
    #[schema(example = "Badge reader was offline")]
    pub reason: Option<String>,
    #[schema(example = "Jane Smith")]
    pub approved_by: Option<String>,
}

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

impl CorrectionDetails {
    pub fn validate(&self, user_id: u64) -> Result<NewCorrection, CorrectionError> {
        let (Some(date), Some(clock_in), Some(clock_out), Some(reason), Some(approved_by)) = (
            required(&self.date),
            required(&self.clock_in),
            required(&self.clock_out),
            required(&self.reason),
            required(&self.approved_by),
        ) else {
            return Err(CorrectionError::validation(MISSING_FIELDS));
        };

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| CorrectionError::validation(INVALID_FORMAT))?;
        let (Some(clock_in), Some(clock_out)) = (parse_time(clock_in), parse_time(clock_out))
        else {
            return Err(CorrectionError::validation(INVALID_FORMAT));
        };

        Ok(NewCorrection {
            user_id,
            date,
            clock_in: date.and_time(clock_in),
            clock_out: date.and_time(clock_out),
            reason: reason.to_string(),
            approved_by: approved_by.to_string(),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveCorrection {
    /// approved or rejected
    #[schema(example = "approved")]
    pub status: Option<String>,
}

impl ResolveCorrection {
    pub fn resolution(&self) -> Result<CorrectionStatus, CorrectionError> {
        self.status
            .as_deref()
            .and_then(|s| s.parse::<CorrectionStatus>().ok())
            .filter(|s| s.is_resolution())
            .ok_or_else(|| CorrectionError::validation(INVALID_STATUS))
    }
}

/// Body error handler for intake. A field of the wrong JSON type is a format
/// problem; an absent or unreadable body counts as missing fields.
pub fn submit_json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected correction intake body");
    let message = match &err {
        JsonPayloadError::Deserialize(e) if e.is_data() => INVALID_FORMAT,
        _ => MISSING_FIELDS,
    };
    CorrectionError::validation(message).into()
}

/// Body error handler for resolution: anything unreadable is an invalid status.
pub fn resolve_json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected correction resolution body");
    CorrectionError::validation(INVALID_STATUS).into()
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CorrectionQuery {
    /// Filter by status (pending, approved, rejected)
    pub status: Option<String>,
    /// Filter by submitting user (reviewers only)
    pub user_id: Option<u64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimeEntryQuery {
    /// Any date in the week to show; entries are grouped by the Sunday that starts it
    #[param(value_type = Option<String>, format = "date", example = "2024-06-09")]
    pub week_start: Option<NaiveDate>,
}

/* =========================
File a correction request
========================= */
#[utoipa::path(
    post,
    path = "/api/attendance/corrections",
    request_body(
        content = CorrectionDetails,
        description = "Correction request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Correction request filed", body = ActionResponse, example = json!({
            "success": true,
            "message": "Attendance correction request filed successfully.",
            "id": 1
        })),
        (status = 400, description = "Missing or malformed fields", body = ActionResponse, example = json!({
            "success": false,
            "message": "Missing required fields."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Server error", body = ActionResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance Corrections"
)]
pub async fn submit_correction(
    auth: AuthUser,
    store: web::Data<dyn CorrectionStore>,
    payload: web::Json<CorrectionDetails>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;
    let new = payload.validate(user_id)?;

    let id = store.insert_correction(&new).await.map_err(|e| {
        tracing::error!(error = %e, user_id, "File attendance correction failed");
        CorrectionError::from(e)
    })?;

    tracing::info!(correction_id = id, user_id, date = %new.date, "Attendance correction filed");

    Ok(HttpResponse::Ok().json(
        ActionResponse::ok("Attendance correction request filed successfully.").with_id(id),
    ))
}

/* =========================
List correction requests
========================= */
/// Reviewers see every request; everyone else only their own. A store
/// failure yields an empty list.
#[utoipa::path(
    get,
    path = "/api/attendance/corrections",
    params(CorrectionQuery),
    responses(
        (status = 200, description = "Correction requests, newest first", body = [crate::model::correction::CorrectionWithUser]),
        (status = 400, description = "Invalid status filter", body = ActionResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance Corrections"
)]
pub async fn list_corrections(
    auth: AuthUser,
    store: web::Data<dyn CorrectionStore>,
    query: web::Query<CorrectionQuery>,
) -> actix_web::Result<impl Responder> {
    let status = match query.status.as_deref() {
        Some(s) => Some(
            s.parse::<CorrectionStatus>()
                .map_err(|_| CorrectionError::validation(INVALID_STATUS))?,
        ),
        None => None,
    };

    let filter = CorrectionFilter {
        user_id: if auth.is_reviewer() {
            query.user_id
        } else {
            Some(auth.user_id)
        },
        status,
    };

    let rows = match store.list_corrections(&filter).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Get attendance correction requests failed");
            Vec::new()
        }
    };

    Ok(HttpResponse::Ok().json(rows))
}

/// Fetch one correction request
#[utoipa::path(
    get,
    path = "/api/attendance/corrections/{correction_id}",
    params(
        ("correction_id" = u64, Path, description = "ID of the correction request")
    ),
    responses(
        (status = 200, description = "Correction request found", body = crate::model::correction::CorrectionWithUser),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Correction request not found", body = ActionResponse, example = json!({
            "success": false,
            "message": "Correction request not found."
        })),
        (status = 500, description = "Server error", body = ActionResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance Corrections"
)]
pub async fn get_correction(
    auth: AuthUser,
    store: web::Data<dyn CorrectionStore>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let correction_id = path.into_inner();

    let row = store.get_correction(correction_id).await.map_err(|e| {
        tracing::error!(error = %e, correction_id, "Failed to fetch correction request");
        CorrectionError::from(e)
    })?;

    match row {
        Some(row) if auth.is_reviewer() || row.request.user_id == auth.user_id => {
            Ok(HttpResponse::Ok().json(row))
        }
        _ => Ok(HttpResponse::NotFound().json(ActionResponse::failed("Correction request not found."))),
    }
}

/* =========================
Approve / reject (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/attendance/corrections/{correction_id}",
    params(
        ("correction_id" = u64, Path, description = "ID of the correction request to resolve")
    ),
    request_body(
        content = ResolveCorrection,
        description = "Target status",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Request resolved", body = ActionResponse, example = json!({
            "success": true,
            "message": "Request approved."
        })),
        (status = 400, description = "Invalid status", body = ActionResponse, example = json!({
            "success": false,
            "message": "Invalid status."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found or already processed", body = ActionResponse, example = json!({
            "success": false,
            "message": "Correction request not found or already processed."
        })),
        (status = 500, description = "Server error", body = ActionResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance Corrections"
)]
pub async fn resolve_correction(
    auth: AuthUser,
    store: web::Data<dyn CorrectionStore>,
    path: web::Path<u64>,
    payload: web::Json<ResolveCorrection>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let correction_id = path.into_inner();
    let status = payload.resolution()?;

    let resolution = store
        .resolve_correction(correction_id, status)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, correction_id, %status, "Update attendance correction status failed");
            CorrectionError::from(e)
        })?
        .ok_or(CorrectionError::NotFound)?;

    tracing::info!(
        correction_id,
        %status,
        reviewer = %auth.username,
        user_id = resolution.request.user_id,
        date = %resolution.request.date,
        time_entry = ?resolution.time_entry,
        "Attendance correction resolved"
    );

    Ok(HttpResponse::Ok().json(ActionResponse::ok(format!("Request {status}."))))
}

/// The caller's time entries, optionally for a single week
#[utoipa::path(
    get,
    path = "/api/attendance/time-entries",
    params(TimeEntryQuery),
    responses(
        (status = 200, description = "Time entries ordered by date", body = [crate::model::time_entry::TimeEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Server error", body = ActionResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance Corrections"
)]
pub async fn list_time_entries(
    auth: AuthUser,
    store: web::Data<dyn CorrectionStore>,
    query: web::Query<TimeEntryQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;
    let week = query.week_start.map(week_start);

    let entries = store.list_time_entries(user_id, week).await.map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to fetch time entries");
        CorrectionError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(entries))
}
