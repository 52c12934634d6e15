use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{CorrectionStore, StoreResult};
use crate::model::correction::{
    CorrectionFilter, CorrectionRequest, CorrectionStatus, CorrectionWithUser, NewCorrection,
};
use crate::model::time_entry::{Resolution, TimeEntry, TimeEntryChange};
use crate::utils::week::week_start;

#[derive(Default)]
struct State {
    users: HashMap<u64, String>,
    corrections: Vec<CorrectionRequest>,
    time_entries: Vec<TimeEntry>,
    next_entry_id: u64,
    failing: bool,
}

/// In-process store used by handler tests.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn with_users(users: &[(u64, &str)]) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for (id, name) in users {
                state.users.insert(*id, name.to_string());
            }
        }
        store
    }

    /// Makes every subsequent call fail like a dropped connection.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    pub fn corrections(&self) -> Vec<CorrectionRequest> {
        self.state.lock().unwrap().corrections.clone()
    }

    pub fn time_entries(&self) -> Vec<TimeEntry> {
        self.state.lock().unwrap().time_entries.clone()
    }

    pub fn seed_time_entry(&self, entry: TimeEntry) {
        let mut state = self.state.lock().unwrap();
        state.next_entry_id = state.next_entry_id.max(entry.id);
        state.time_entries.push(entry);
    }

    fn check(state: &State) -> StoreResult<()> {
        if state.failing {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }

    fn matches(filter: &CorrectionFilter, request: &CorrectionRequest) -> bool {
        filter.user_id.is_none_or(|id| id == request.user_id)
            && filter.status.is_none_or(|status| status == request.status)
    }

    fn join(state: &State, request: &CorrectionRequest) -> Option<CorrectionWithUser> {
        state.users.get(&request.user_id).map(|username| CorrectionWithUser {
            request: request.clone(),
            username: username.clone(),
        })
    }
}

#[async_trait]
impl CorrectionStore for MemoryStore {
    async fn insert_correction(&self, new: &NewCorrection) -> StoreResult<u64> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state)?;

        let id = state.corrections.len() as u64 + 1;
        state.corrections.push(CorrectionRequest {
            id,
            user_id: new.user_id,
            date: new.date,
            clock_in: new.clock_in,
            clock_out: new.clock_out,
            reason: new.reason.clone(),
            approved_by_senior: new.approved_by.clone(),
            status: CorrectionStatus::Pending,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_corrections(
        &self,
        filter: &CorrectionFilter,
    ) -> StoreResult<Vec<CorrectionWithUser>> {
        let state = self.state.lock().unwrap();
        Self::check(&state)?;

        let mut rows: Vec<_> = state
            .corrections
            .iter()
            .filter(|c| Self::matches(filter, c))
            .filter_map(|c| Self::join(&state, c))
            .collect();
        rows.sort_by(|a, b| {
            (b.request.created_at, b.request.id).cmp(&(a.request.created_at, a.request.id))
        });
        Ok(rows)
    }

    async fn get_correction(&self, id: u64) -> StoreResult<Option<CorrectionWithUser>> {
        let state = self.state.lock().unwrap();
        Self::check(&state)?;

        Ok(state
            .corrections
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| Self::join(&state, c)))
    }

    async fn resolve_correction(
        &self,
        id: u64,
        status: CorrectionStatus,
    ) -> StoreResult<Option<Resolution>> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        Self::check(state)?;

        let Some(request) = state
            .corrections
            .iter_mut()
            .find(|c| c.id == id && c.status == CorrectionStatus::Pending)
        else {
            return Ok(None);
        };
        request.status = status;
        let request = request.clone();

        let time_entry = if status == CorrectionStatus::Approved {
            let existing = state
                .time_entries
                .iter_mut()
                .find(|e| e.user_id == request.user_id && e.date == request.date);

            Some(match existing {
                Some(entry) => {
                    entry.clock_in = request.clock_in;
                    entry.clock_out = request.clock_out;
                    TimeEntryChange::Updated
                }
                None => {
                    state.next_entry_id += 1;
                    let entry = TimeEntry {
                        id: state.next_entry_id,
                        user_id: request.user_id,
                        date: request.date,
                        clock_in: request.clock_in,
                        clock_out: request.clock_out,
                        week_start: week_start(request.date),
                    };
                    state.time_entries.push(entry);
                    TimeEntryChange::Created
                }
            })
        } else {
            None
        };

        Ok(Some(Resolution {
            request,
            time_entry,
        }))
    }

    async fn list_time_entries(
        &self,
        user_id: u64,
        week: Option<NaiveDate>,
    ) -> StoreResult<Vec<TimeEntry>> {
        let state = self.state.lock().unwrap();
        Self::check(&state)?;

        let mut entries: Vec<_> = state
            .time_entries
            .iter()
            .filter(|e| e.user_id == user_id && week.is_none_or(|w| w == e.week_start))
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.date);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_correction(date: NaiveDate, hour: u32) -> NewCorrection {
        NewCorrection {
            user_id: 1,
            date,
            clock_in: date.and_hms_opt(hour, 0, 0).unwrap(),
            clock_out: date.and_hms_opt(17, 0, 0).unwrap(),
            reason: "missed punch".into(),
            approved_by: "Lead".into(),
        }
    }

    #[actix_web::test]
    async fn approval_reports_whether_the_entry_was_created_or_updated() {
        let store = MemoryStore::with_users(&[(1, "jdoe")]);
        let day = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let first = store.insert_correction(&new_correction(day, 9)).await.unwrap();
        let second = store.insert_correction(&new_correction(day, 8)).await.unwrap();

        let created = store
            .resolve_correction(first, CorrectionStatus::Approved)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.time_entry, Some(TimeEntryChange::Created));

        let updated = store
            .resolve_correction(second, CorrectionStatus::Approved)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.time_entry, Some(TimeEntryChange::Updated));

        let entries = store.time_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].clock_in, day.and_hms_opt(8, 0, 0).unwrap());
    }

    #[actix_web::test]
    async fn rejection_reports_no_time_entry_change() {
        let store = MemoryStore::with_users(&[(1, "jdoe")]);
        let day = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let id = store.insert_correction(&new_correction(day, 9)).await.unwrap();

        let resolution = store
            .resolve_correction(id, CorrectionStatus::Rejected)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolution.time_entry, None);
        assert!(store.time_entries().is_empty());
    }
}
