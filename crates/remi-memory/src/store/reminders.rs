//! Reminder CRUD and the delivery claim.

use super::{Store, DB_TIME_FORMAT};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use remi_core::error::RemiError;
use remi_core::reminder::Reminder;
use remi_core::traits::ReminderStore;
use uuid::Uuid;

type ReminderRow = (String, String, String, String, String);

fn row_to_reminder(row: ReminderRow) -> Result<Reminder, RemiError> {
    let (id, owner, text, due_at, created_at) = row;
    let due_at = NaiveDateTime::parse_from_str(&due_at, DB_TIME_FORMAT)
        .map_err(|e| RemiError::Memory(format!("bad due_at for reminder {id}: {e}")))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at, DB_TIME_FORMAT)
        .map_err(|e| RemiError::Memory(format!("bad created_at for reminder {id}: {e}")))?;
    Ok(Reminder {
        id,
        owner,
        text,
        due_at,
        created_at,
    })
}

#[async_trait]
impl ReminderStore for Store {
    async fn create(
        &self,
        owner: &str,
        text: &str,
        due_at: NaiveDateTime,
    ) -> Result<String, RemiError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO reminders (id, owner, text, due_at, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(owner)
        .bind(text)
        .bind(due_at.format(DB_TIME_FORMAT).to_string())
        .bind(
            Local::now()
                .naive_local()
                .format(DB_TIME_FORMAT)
                .to_string(),
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RemiError::Memory(format!("create reminder failed: {e}")))?;

        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Reminder>, RemiError> {
        let rows: Vec<ReminderRow> = sqlx::query_as(
            "SELECT id, owner, text, due_at, created_at FROM reminders ORDER BY due_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RemiError::Memory(format!("list reminders failed: {e}")))?;

        rows.into_iter().map(row_to_reminder).collect()
    }

    async fn list_for_owner(&self, owner: &str) -> Result<Vec<Reminder>, RemiError> {
        let rows: Vec<ReminderRow> = sqlx::query_as(
            "SELECT id, owner, text, due_at, created_at FROM reminders \
             WHERE owner = ? ORDER BY due_at ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RemiError::Memory(format!("list reminders failed: {e}")))?;

        rows.into_iter().map(row_to_reminder).collect()
    }

    async fn delete_if_present(&self, id: &str) -> Result<bool, RemiError> {
        // Single conditional DELETE: of any number of concurrent
        // deleters for the same id, exactly one observes a removed row.
        let result = sqlx::query("DELETE FROM reminders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RemiError::Memory(format!("delete reminder failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
