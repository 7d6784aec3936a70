//! 活动奖励关联仓储

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::traits::EventRewardRepositoryTrait;
use crate::error::Result;

pub struct EventRewardRepository {
    pool: PgPool,
}

impl EventRewardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 依赖 (event_id, reward_id) 主键判重，不做先查后插
    pub async fn add_link(
        &self,
        event_id: &str,
        reward_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO event_rewards (event_id, reward_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id, reward_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(reward_id)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn remove_link(&self, event_id: &str, reward_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM event_rewards WHERE event_id = $1 AND reward_id = $2")
            .bind(event_id)
            .bind(reward_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_reward_ids(&self, event_id: &str) -> Result<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT reward_id FROM event_rewards
            WHERE event_id = $1
            ORDER BY created_at ASC, reward_id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[async_trait]
impl EventRewardRepositoryTrait for EventRewardRepository {
    async fn add_link(
        &self,
        event_id: &str,
        reward_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<bool> {
        self.add_link(event_id, reward_id, created_at).await
    }

    async fn remove_link(&self, event_id: &str, reward_id: &str) -> Result<bool> {
        self.remove_link(event_id, reward_id).await
    }

    async fn list_reward_ids(&self, event_id: &str) -> Result<Vec<String>> {
        self.list_reward_ids(event_id).await
    }
}
