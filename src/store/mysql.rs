use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{MySqlConnection, MySqlPool};

use super::{CorrectionStore, StoreResult};
use crate::model::correction::{
    CorrectionFilter, CorrectionRequest, CorrectionStatus, CorrectionWithUser, NewCorrection,
};
use crate::model::time_entry::{Resolution, TimeEntry, TimeEntryChange};
use crate::utils::week::week_start;

const CORRECTION_COLUMNS: &str = r#"
    ac.id, ac.user_id, ac.date, ac.clock_in, ac.clock_out, ac.reason,
    ac.approved_by_senior, CAST(ac.status AS CHAR) AS status, ac.created_at
"#;

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

pub struct MySqlCorrectionStore {
    pool: MySqlPool,
}

impl MySqlCorrectionStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Writes the approved times into the (user, date) entry, creating it if needed.
/// Relies on the `uq_time_entries_user_date` key. Must run inside the
/// resolving transaction so the locking read holds until commit.
async fn upsert_time_entry(
    conn: &mut MySqlConnection,
    request: &CorrectionRequest,
) -> StoreResult<TimeEntryChange> {
    // rows_affected() of the upsert varies with CLIENT_FOUND_ROWS, so look first
    let existing: Option<u64> = sqlx::query_scalar(
        "SELECT id FROM time_entries WHERE user_id = ? AND date = ? FOR UPDATE",
    )
    .bind(request.user_id)
    .bind(request.date)
    .fetch_optional(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO time_entries (user_id, clock_in, clock_out, date, week_start)
        VALUES (?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            clock_in = VALUES(clock_in),
            clock_out = VALUES(clock_out)
        "#,
    )
    .bind(request.user_id)
    .bind(request.clock_in)
    .bind(request.clock_out)
    .bind(request.date)
    .bind(week_start(request.date))
    .execute(&mut *conn)
    .await?;

    Ok(match existing {
        Some(_) => TimeEntryChange::Updated,
        None => TimeEntryChange::Created,
    })
}

#[async_trait]
impl CorrectionStore for MySqlCorrectionStore {
    async fn insert_correction(&self, new: &NewCorrection) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_corrections
                (user_id, date, clock_in, clock_out, reason, approved_by_senior)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.user_id)
        .bind(new.date)
        .bind(new.clock_in)
        .bind(new.clock_out)
        .bind(new.reason.as_str())
        .bind(new.approved_by.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn list_corrections(
        &self,
        filter: &CorrectionFilter,
    ) -> StoreResult<Vec<CorrectionWithUser>> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(user_id) = filter.user_id {
            where_sql.push_str(" AND ac.user_id = ?");
            args.push(FilterValue::U64(user_id));
        }

        if let Some(status) = filter.status {
            where_sql.push_str(" AND ac.status = ?");
            args.push(FilterValue::Str(status.as_str()));
        }

        let sql = format!(
            r#"
            SELECT {CORRECTION_COLUMNS}, u.username
            FROM attendance_corrections ac
            JOIN users u ON ac.user_id = u.id
            {where_sql}
            ORDER BY ac.created_at DESC, ac.id DESC
            "#
        );

        let mut query = sqlx::query_as::<_, CorrectionWithUser>(&sql);
        for arg in args {
            query = match arg {
                FilterValue::U64(v) => query.bind(v),
                FilterValue::Str(s) => query.bind(s),
            };
        }

        query.fetch_all(&self.pool).await
    }

    async fn get_correction(&self, id: u64) -> StoreResult<Option<CorrectionWithUser>> {
        let sql = format!(
            r#"
            SELECT {CORRECTION_COLUMNS}, u.username
            FROM attendance_corrections ac
            JOIN users u ON ac.user_id = u.id
            WHERE ac.id = ?
            "#
        );

        sqlx::query_as::<_, CorrectionWithUser>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn resolve_correction(
        &self,
        id: u64,
        status: CorrectionStatus,
    ) -> StoreResult<Option<Resolution>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE attendance_corrections
            SET status = ?
            WHERE id = ?
            AND status = 'pending'
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let sql = format!("SELECT {CORRECTION_COLUMNS} FROM attendance_corrections ac WHERE ac.id = ?");
        let request = sqlx::query_as::<_, CorrectionRequest>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        let time_entry = if status == CorrectionStatus::Approved {
            Some(upsert_time_entry(&mut *tx, &request).await?)
        } else {
            None
        };

        tx.commit().await?;

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
        let mut sql = String::from(
            r#"
            SELECT id, user_id, date, clock_in, clock_out, week_start
            FROM time_entries
            WHERE user_id = ?
            "#,
        );
        if week.is_some() {
            sql.push_str(" AND week_start = ?");
        }
        sql.push_str(" ORDER BY date");

        let mut query = sqlx::query_as::<_, TimeEntry>(&sql).bind(user_id);
        if let Some(week) = week {
            query = query.bind(week);
        }

        query.fetch_all(&self.pool).await
    }
}
