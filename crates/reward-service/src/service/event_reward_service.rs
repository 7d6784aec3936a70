//! 活动奖励关联服务

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::error::{Result, RewardError};
use crate::models::Reward;
use crate::repository::{EventRepositoryTrait, EventRewardRepositoryTrait, RewardRepositoryTrait};

pub struct EventRewardService {
    event_repo: Arc<dyn EventRepositoryTrait>,
    reward_repo: Arc<dyn RewardRepositoryTrait>,
    link_repo: Arc<dyn EventRewardRepositoryTrait>,
}

impl EventRewardService {
    pub fn new(
        event_repo: Arc<dyn EventRepositoryTrait>,
        reward_repo: Arc<dyn RewardRepositoryTrait>,
        link_repo: Arc<dyn EventRewardRepositoryTrait>,
    ) -> Self {
        Self {
            event_repo,
            reward_repo,
            link_repo,
        }
    }

    async fn ensure_event(&self, event_id: &str) -> Result<()> {
        match self.event_repo.get(event_id).await? {
            Some(_) => Ok(()),
            None => Err(RewardError::EventNotFound(event_id.to_string())),
        }
    }

    /// 关联奖励到活动
    ///
    /// 重复关联返回 `DuplicateAssociation`，由存储层原子插入判定
    #[instrument(skip(self))]
    pub async fn add_reward_to_event(&self, event_id: &str, reward_id: &str) -> Result<()> {
        self.ensure_event(event_id).await?;
        if self.reward_repo.get(reward_id).await?.is_none() {
            return Err(RewardError::RewardNotFound(reward_id.to_string()));
        }

        let inserted = self
            .link_repo
            .add_link(event_id, reward_id, Utc::now())
            .await?;
        if !inserted {
            return Err(RewardError::DuplicateAssociation {
                event_id: event_id.to_string(),
                reward_id: reward_id.to_string(),
            });
        }

        info!("Reward linked to event");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_reward_from_event(&self, event_id: &str, reward_id: &str) -> Result<()> {
        if !self.link_repo.remove_link(event_id, reward_id).await? {
            return Err(RewardError::AssociationNotFound {
                event_id: event_id.to_string(),
                reward_id: reward_id.to_string(),
            });
        }

        info!("Reward unlinked from event");
        Ok(())
    }

    pub async fn get_rewards_by_event_id(&self, event_id: &str) -> Result<Vec<Reward>> {
        self.ensure_event(event_id).await?;
        let reward_ids = self.link_repo.list_reward_ids(event_id).await?;
        self.reward_repo.get_by_ids(&reward_ids).await
    }
}
