//! 奖励仓储
//!
//! 变体字段存放在 `reward_data` JSONB 列，读出时按 `reward_type` 重新解析

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::{RewardFilter, RewardRepositoryTrait};
use crate::error::{Result, RewardError};
use crate::models::{Reward, RewardRow};
use crate::pagination::{CursorQuery, Window};

const SELECT_COLUMNS: &str =
    "SELECT id, name, description, reward_type, reward_data, created_at, updated_at FROM rewards";

// 名称使用子串匹配而非 LIKE，避免用户输入中的 % 和 _ 被当成通配符
const FILTER_CLAUSE: &str = "($1::text IS NULL OR reward_type = $1) \
     AND ($2::text IS NULL OR strpos(lower(name), lower($2)) > 0)";

fn into_rewards(rows: Vec<RewardRow>) -> Result<Vec<Reward>> {
    rows.into_iter()
        .map(|row| Reward::try_from(row).map_err(RewardError::Internal))
        .collect()
}

pub struct RewardRepository {
    pool: PgPool,
}

impl RewardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, reward: &Reward) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rewards (id, name, description, reward_type, reward_data,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&reward.id)
        .bind(&reward.name)
        .bind(&reward.description)
        .bind(reward.reward_type())
        .bind(reward.data.to_value()?)
        .bind(reward.created_at)
        .bind(reward.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Reward>> {
        let row = sqlx::query_as::<_, RewardRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| Reward::try_from(r).map_err(RewardError::Internal))
            .transpose()
    }

    pub async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Reward>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = sqlx::query_as::<_, RewardRow>(&format!(
            "{SELECT_COLUMNS} WHERE id = ANY($1) ORDER BY id ASC"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        into_rewards(rows)
    }

    pub async fn list(&self, filter: &RewardFilter, window: Window) -> Result<Vec<Reward>> {
        let rows = sqlx::query_as::<_, RewardRow>(&format!(
            "{SELECT_COLUMNS} WHERE {FILTER_CLAUSE} \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(filter.reward_type.map(|t| t.as_str()))
        .bind(filter.name.as_deref())
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await?;

        into_rewards(rows)
    }

    pub async fn count(&self, filter: &RewardFilter) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM rewards WHERE {FILTER_CLAUSE}"))
                .bind(filter.reward_type.map(|t| t.as_str()))
                .bind(filter.name.as_deref())
                .fetch_one(&self.pool)
                .await?;

        Ok(count.max(0) as u64)
    }

    pub async fn list_after(&self, filter: &RewardFilter, query: &CursorQuery) -> Result<Vec<Reward>> {
        let rows = sqlx::query_as::<_, RewardRow>(&format!(
            "{SELECT_COLUMNS} WHERE {FILTER_CLAUSE} \
             AND ($3::text IS NULL OR id > $3) ORDER BY id ASC LIMIT $4"
        ))
        .bind(filter.reward_type.map(|t| t.as_str()))
        .bind(filter.name.as_deref())
        .bind(query.after_id.as_deref())
        .bind(query.fetch_limit)
        .fetch_all(&self.pool)
        .await?;

        into_rewards(rows)
    }
}

#[async_trait]
impl RewardRepositoryTrait for RewardRepository {
    async fn create(&self, reward: &Reward) -> Result<()> {
        self.create(reward).await
    }

    async fn get(&self, id: &str) -> Result<Option<Reward>> {
        self.get(id).await
    }

    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Reward>> {
        self.get_by_ids(ids).await
    }

    async fn list(&self, filter: &RewardFilter, window: Window) -> Result<Vec<Reward>> {
        self.list(filter, window).await
    }

    async fn count(&self, filter: &RewardFilter) -> Result<u64> {
        self.count(filter).await
    }

    async fn list_after(&self, filter: &RewardFilter, query: &CursorQuery) -> Result<Vec<Reward>> {
        self.list_after(filter, query).await
    }
}
