//! Persistence for correction requests and the time entries they feed.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::correction::{
    CorrectionFilter, CorrectionStatus, CorrectionWithUser, NewCorrection,
};
use crate::model::time_entry::{Resolution, TimeEntry};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait CorrectionStore: Send + Sync {
    /// Inserts a pending correction and returns its id.
    async fn insert_correction(&self, new: &NewCorrection) -> StoreResult<u64>;

    /// Corrections joined with their submitter, newest first.
    async fn list_corrections(
        &self,
        filter: &CorrectionFilter,
    ) -> StoreResult<Vec<CorrectionWithUser>>;

    async fn get_correction(&self, id: u64) -> StoreResult<Option<CorrectionWithUser>>;

    /// Moves a pending correction to `status` and, on approval, writes the
    /// corrected times into the user's time entry for that day. Runs as one
    /// unit. Returns `None` when no pending correction has this id.
    async fn resolve_correction(
        &self,
        id: u64,
        status: CorrectionStatus,
    ) -> StoreResult<Option<Resolution>>;

    async fn list_time_entries(
        &self,
        user_id: u64,
        week_start: Option<NaiveDate>,
    ) -> StoreResult<Vec<TimeEntry>>;
}
