//! 奖励申请仓储
//!
//! 重复申请和并发审核都交给数据库原子语句处理：
//!
//! - 创建：`ON CONFLICT` 命中 (user_id, event_id) 上的 PENDING 部分唯一索引时不插入
//! - 状态流转：`UPDATE ... WHERE status = 'PENDING' RETURNING`，并发时只有一个能成功

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::traits::{RewardRequestFilter, RewardRequestRepositoryTrait};
use crate::error::Result;
use crate::models::{RewardRequest, RewardRequestStatus};
use crate::pagination::{CursorQuery, Window};

const FILTER_CLAUSE: &str = "($1::text IS NULL OR user_id = $1) \
     AND ($2::text IS NULL OR event_id = $2) \
     AND ($3::text IS NULL OR status = $3)";

pub struct RewardRequestRepository {
    pool: PgPool,
}

impl RewardRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_pending(&self, request: &RewardRequest) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO reward_requests (id, user_id, event_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, 'PENDING', $4, $5)
            ON CONFLICT (user_id, event_id) WHERE status = 'PENDING' DO NOTHING
            "#,
        )
        .bind(&request.id)
        .bind(&request.user_id)
        .bind(&request.event_id)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn get(&self, id: &str) -> Result<Option<RewardRequest>> {
        let request = sqlx::query_as::<_, RewardRequest>(
            r#"
            SELECT id, user_id, event_id, status, created_at, updated_at
            FROM reward_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn list(
        &self,
        filter: &RewardRequestFilter,
        window: Window,
    ) -> Result<Vec<RewardRequest>> {
        let requests = sqlx::query_as::<_, RewardRequest>(&format!(
            "SELECT id, user_id, event_id, status, created_at, updated_at \
             FROM reward_requests WHERE {FILTER_CLAUSE} \
             ORDER BY created_at DESC, id DESC LIMIT $4 OFFSET $5"
        ))
        .bind(filter.user_id.as_deref())
        .bind(filter.event_id.as_deref())
        .bind(filter.status.map(|s| s.as_str()))
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn count(&self, filter: &RewardRequestFilter) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM reward_requests WHERE {FILTER_CLAUSE}"
        ))
        .bind(filter.user_id.as_deref())
        .bind(filter.event_id.as_deref())
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    pub async fn list_after(
        &self,
        filter: &RewardRequestFilter,
        query: &CursorQuery,
    ) -> Result<Vec<RewardRequest>> {
        let requests = sqlx::query_as::<_, RewardRequest>(&format!(
            "SELECT id, user_id, event_id, status, created_at, updated_at \
             FROM reward_requests WHERE {FILTER_CLAUSE} \
             AND ($4::text IS NULL OR id > $4) ORDER BY id ASC LIMIT $5"
        ))
        .bind(filter.user_id.as_deref())
        .bind(filter.event_id.as_deref())
        .bind(filter.status.map(|s| s.as_str()))
        .bind(query.after_id.as_deref())
        .bind(query.fetch_limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn transition_status(
        &self,
        id: &str,
        to: RewardRequestStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<RewardRequest>> {
        let updated = sqlx::query_as::<_, RewardRequest>(
            r#"
            UPDATE reward_requests
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = 'PENDING'
            RETURNING id, user_id, event_id, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(to)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}

#[async_trait]
impl RewardRequestRepositoryTrait for RewardRequestRepository {
    async fn create_pending(&self, request: &RewardRequest) -> Result<bool> {
        self.create_pending(request).await
    }

    async fn get(&self, id: &str) -> Result<Option<RewardRequest>> {
        self.get(id).await
    }

    async fn list(
        &self,
        filter: &RewardRequestFilter,
        window: Window,
    ) -> Result<Vec<RewardRequest>> {
        self.list(filter, window).await
    }

    async fn count(&self, filter: &RewardRequestFilter) -> Result<u64> {
        self.count(filter).await
    }

    async fn list_after(
        &self,
        filter: &RewardRequestFilter,
        query: &CursorQuery,
    ) -> Result<Vec<RewardRequest>> {
        self.list_after(filter, query).await
    }

    async fn transition_status(
        &self,
        id: &str,
        to: RewardRequestStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<RewardRequest>> {
        self.transition_status(id, to, updated_at).await
    }
}
