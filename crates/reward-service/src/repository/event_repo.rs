//! 活动仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::EventRepositoryTrait;
use crate::error::Result;
use crate::models::{Event, EventStatus};
use crate::pagination::Window;

pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, name, description, condition, start_date, end_date,
                                status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.condition)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.status)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, description, condition, start_date, end_date,
                   status, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    pub async fn update(&self, event: &Event) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $2, description = $3, condition = $4, start_date = $5,
                end_date = $6, status = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.condition)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.status)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(&self, status: Option<EventStatus>, window: Window) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, description, condition, start_date, end_date,
                   status, created_at, updated_at
            FROM events
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    pub async fn count(&self, status: Option<EventStatus>) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM events
            WHERE ($1::text IS NULL OR status = $1)
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl EventRepositoryTrait for EventRepository {
    async fn create(&self, event: &Event) -> Result<()> {
        self.create(event).await
    }

    async fn get(&self, id: &str) -> Result<Option<Event>> {
        self.get(id).await
    }

    async fn update(&self, event: &Event) -> Result<bool> {
        self.update(event).await
    }

    async fn list(&self, status: Option<EventStatus>, window: Window) -> Result<Vec<Event>> {
        self.list(status, window).await
    }

    async fn count(&self, status: Option<EventStatus>) -> Result<u64> {
        self.count(status).await
    }
}
