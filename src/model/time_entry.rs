use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::correction::CorrectionRequest;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeEntry {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub user_id: u64,
    #[schema(example = "2024-06-12", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "2024-06-12T09:00:00", format = "date-time", value_type = String)]
    pub clock_in: NaiveDateTime,
    #[schema(example = "2024-06-12T18:00:00", format = "date-time", value_type = String)]
    pub clock_out: NaiveDateTime,
    #[schema(example = "2024-06-09", format = "date", value_type = String)]
    pub week_start: NaiveDate,
}

/// What an approval did to the user's time entry for the corrected day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEntryChange {
    Created,
    Updated,
}

/// Outcome of resolving a pending correction.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub request: CorrectionRequest,
    /// `None` for rejections.
    pub time_entry: Option<TimeEntryChange>,
}
