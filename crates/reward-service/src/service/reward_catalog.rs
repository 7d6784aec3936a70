//! 奖励目录服务
//!
//! 负责奖励的创建、校验与查询。奖励创建后不可修改。
//!
//! ## 变体校验
//!
//! `rewardData` 通过 `RewardType::parse_data` 按类型分发到对应结构解析，
//! 缺字段、类型不符、数值非正或混入其他变体的字段都返回 `InvalidRewardData`。

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use reward_shared::observability::metrics;

use crate::error::{Result, RewardError};
use crate::models::{Reward, new_id};
use crate::pagination::{CursorPage, CursorParams};
use crate::repository::{RewardFilter, RewardRepositoryTrait};
use crate::service::dto::{CreateRewardDto, RewardCursorQueryDto, RewardListDto, RewardQueryDto};

pub struct RewardCatalog {
    reward_repo: Arc<dyn RewardRepositoryTrait>,
}

impl RewardCatalog {
    pub fn new(reward_repo: Arc<dyn RewardRepositoryTrait>) -> Self {
        Self { reward_repo }
    }

    #[instrument(skip(self, dto), fields(reward_type = %dto.reward_type, name = %dto.name))]
    pub async fn create_reward(&self, dto: CreateRewardDto) -> Result<Reward> {
        let data = dto
            .reward_type
            .parse_data(dto.reward_data)
            .map_err(|reason| RewardError::InvalidRewardData {
                reward_type: dto.reward_type,
                reason,
            })?;

        let now = Utc::now();
        let reward = Reward {
            id: new_id(),
            name: dto.name,
            description: dto.description,
            data,
            created_at: now,
            updated_at: now,
        };

        self.reward_repo.create(&reward).await?;
        metrics::record_reward_created(reward.reward_type().as_str());

        info!(reward_id = %reward.id, "Reward created");
        Ok(reward)
    }

    pub async fn get_reward_by_id(&self, id: &str) -> Result<Reward> {
        self.reward_repo
            .get(id)
            .await?
            .ok_or_else(|| RewardError::RewardNotFound(id.to_string()))
    }

    /// 偏移查询奖励列表，总数与窗口独立统计
    pub async fn get_rewards(&self, query: RewardQueryDto) -> Result<RewardListDto> {
        let filter = RewardFilter {
            reward_type: query.reward_type,
            name: query.name.clone(),
        };

        let rewards = self.reward_repo.list(&filter, query.window()).await?;
        let total = self.reward_repo.count(&filter).await?;

        Ok(RewardListDto { rewards, total })
    }

    pub async fn get_rewards_by_cursor(
        &self,
        query: RewardCursorQueryDto,
    ) -> Result<CursorPage<Reward>> {
        let filter = RewardFilter {
            reward_type: query.reward_type,
            name: query.name,
        };
        let params = CursorParams::new(query.cursor.as_deref(), query.limit);

        let items = self
            .reward_repo
            .list_after(&filter, &params.query())
            .await?;

        Ok(CursorPage::from_overfetched(items, params.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RewardData, RewardType};
    use crate::pagination::{Window, decode_cursor, encode_cursor};
    use crate::repository::MockRewardRepositoryTrait;
    use serde_json::{Value, json};

    fn dto(reward_type: RewardType, data: Value) -> CreateRewardDto {
        CreateRewardDto {
            name: "奖励".to_string(),
            description: None,
            reward_type,
            reward_data: data,
        }
    }

    fn reward(id: &str) -> Reward {
        let now = Utc::now();
        Reward {
            id: id.to_string(),
            name: format!("Reward {id}"),
            description: None,
            data: RewardData::Point(crate::models::PointReward { points: 1 }),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_each_variant() {
        let mut repo = MockRewardRepositoryTrait::new();
        repo.expect_create().times(4).returning(|_| Ok(()));
        let catalog = RewardCatalog::new(Arc::new(repo));

        let cases = vec![
            (RewardType::Point, json!({"points": 100})),
            (RewardType::Item, json!({"itemId": "sword", "quantity": 1})),
            (
                RewardType::Coupon,
                json!({"couponCode": "OFF10", "expiry": "2027-01-01T00:00:00Z"}),
            ),
            (RewardType::Badge, json!({"badgeId": "first-login"})),
        ];

        for (reward_type, data) in cases {
            let reward = catalog.create_reward(dto(reward_type, data)).await.unwrap();
            assert_eq!(reward.reward_type(), reward_type);
        }
    }

    #[tokio::test]
    async fn test_create_with_mismatched_data_is_rejected() {
        let mut repo = MockRewardRepositoryTrait::new();
        repo.expect_create().never();
        let catalog = RewardCatalog::new(Arc::new(repo));

        let cases = vec![
            (RewardType::Point, json!({"badgeId": "b"})),
            (RewardType::Item, json!({"itemId": "sword"})),
            (RewardType::Coupon, json!({"points": 10})),
            (RewardType::Badge, json!({})),
            (RewardType::Point, json!({"points": -1})),
        ];

        for (reward_type, data) in cases {
            let err = catalog.create_reward(dto(reward_type, data)).await.unwrap_err();
            assert!(
                matches!(err, RewardError::InvalidRewardData { reward_type: t, .. } if t == reward_type)
            );
        }
    }

    #[tokio::test]
    async fn test_get_reward_not_found() {
        let mut repo = MockRewardRepositoryTrait::new();
        repo.expect_get().returning(|_| Ok(None));
        let catalog = RewardCatalog::new(Arc::new(repo));

        let err = catalog.get_reward_by_id("r-404").await.unwrap_err();
        assert_eq!(err.error_code(), "REWARD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_rewards_clamps_limit_and_counts_total() {
        let mut repo = MockRewardRepositoryTrait::new();
        repo.expect_list()
            .withf(|filter, window| {
                filter.reward_type == Some(RewardType::Point)
                    && *window
                        == Window {
                            limit: 100,
                            offset: 40,
                        }
            })
            .returning(|_, _| Ok(vec![reward("r-1")]));
        repo.expect_count().returning(|_| Ok(41));
        let catalog = RewardCatalog::new(Arc::new(repo));

        let result = catalog
            .get_rewards(RewardQueryDto {
                reward_type: Some(RewardType::Point),
                name: None,
                limit: 1000,
                offset: 40,
            })
            .await
            .unwrap();

        assert_eq!(result.total, 41);
        assert_eq!(result.rewards.len(), 1);
    }

    #[tokio::test]
    async fn test_get_rewards_by_cursor() {
        let mut repo = MockRewardRepositoryTrait::new();
        repo.expect_list_after()
            .withf(|_, query| query.after_id.as_deref() == Some("r-00") && query.fetch_limit == 3)
            .returning(|_, _| Ok(vec![reward("r-01"), reward("r-02"), reward("r-03")]));
        let catalog = RewardCatalog::new(Arc::new(repo));

        let page = catalog
            .get_rewards_by_cursor(RewardCursorQueryDto {
                cursor: Some(encode_cursor("r-00")),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);
        assert_eq!(
            page.next_cursor.as_deref().and_then(decode_cursor).as_deref(),
            Some("r-02")
        );
    }
}
