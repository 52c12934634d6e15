use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum::{Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CorrectionStatus {
    Pending,
    Approved,
    Rejected,
}

impl CorrectionStatus {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Only approved and rejected can be the target of a resolution.
    pub fn is_resolution(self) -> bool {
        matches!(self, CorrectionStatus::Approved | CorrectionStatus::Rejected)
    }
}

// lets sqlx decode the ENUM column through a plain string
impl TryFrom<String> for CorrectionStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CorrectionRequest {
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
    #[schema(example = "Badge reader was offline")]
    pub reason: String,
    #[schema(example = "Jane Smith")]
    pub approved_by_senior: String,
    #[sqlx(try_from = "String")]
    pub status: CorrectionStatus,
    #[schema(example = "2024-06-13T08:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// A correction joined with the submitting user's display name.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CorrectionWithUser {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub request: CorrectionRequest,
    #[schema(example = "jdoe")]
    pub username: String,
}

/// A validated intake, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCorrection {
    pub user_id: u64,
    pub date: NaiveDate,
    pub clock_in: NaiveDateTime,
    pub clock_out: NaiveDateTime,
    pub reason: String,
    pub approved_by: String,
}

#[derive(Debug, Clone, Default)]
pub struct CorrectionFilter {
    pub user_id: Option<u64>,
    pub status: Option<CorrectionStatus>,
}
