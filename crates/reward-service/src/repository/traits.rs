//! 仓储 Trait 定义
//!
//! 服务层只依赖这些接口，PostgreSQL 与内存实现可以互换，单元测试使用 mockall 生成的 mock

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Event, EventStatus, Reward, RewardRequest, RewardRequestStatus, RewardType};
use crate::pagination::{CursorQuery, Window};

/// 奖励列表过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardFilter {
    pub reward_type: Option<RewardType>,
    /// 名称子串，大小写不敏感
    pub name: Option<String>,
}

impl RewardFilter {
    pub fn matches(&self, reward: &Reward) -> bool {
        if let Some(t) = self.reward_type
            && reward.reward_type() != t
        {
            return false;
        }
        match &self.name {
            Some(name) => reward.name.to_lowercase().contains(&name.to_lowercase()),
            None => true,
        }
    }
}

/// 奖励申请列表过滤条件（各条件之间为 AND）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardRequestFilter {
    pub user_id: Option<String>,
    pub event_id: Option<String>,
    pub status: Option<RewardRequestStatus>,
}

impl RewardRequestFilter {
    pub fn matches(&self, request: &RewardRequest) -> bool {
        self.user_id.as_ref().is_none_or(|u| &request.user_id == u)
            && self.event_id.as_ref().is_none_or(|e| &request.event_id == e)
            && self.status.is_none_or(|s| request.status == s)
    }
}

/// 活动仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepositoryTrait: Send + Sync {
    async fn create(&self, event: &Event) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Event>>;
    /// 整体覆盖更新，返回记录是否存在
    async fn update(&self, event: &Event) -> Result<bool>;
    async fn list(&self, status: Option<EventStatus>, window: Window) -> Result<Vec<Event>>;
    async fn count(&self, status: Option<EventStatus>) -> Result<u64>;
}

/// 奖励仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardRepositoryTrait: Send + Sync {
    async fn create(&self, reward: &Reward) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Reward>>;
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Reward>>;
    async fn list(&self, filter: &RewardFilter, window: Window) -> Result<Vec<Reward>>;
    async fn count(&self, filter: &RewardFilter) -> Result<u64>;
    async fn list_after(&self, filter: &RewardFilter, query: &CursorQuery) -> Result<Vec<Reward>>;
}

/// 活动奖励关联仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRewardRepositoryTrait: Send + Sync {
    /// 原子插入，关联已存在时返回 false
    async fn add_link(
        &self,
        event_id: &str,
        reward_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<bool>;
    /// 删除关联，关联不存在时返回 false
    async fn remove_link(&self, event_id: &str, reward_id: &str) -> Result<bool>;
    async fn list_reward_ids(&self, event_id: &str) -> Result<Vec<String>>;
}

/// 奖励申请仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardRequestRepositoryTrait: Send + Sync {
    /// 插入待审核申请
    ///
    /// 同一 (user_id, event_id) 已有 PENDING 申请时不插入并返回 false，检查与插入是原子的
    async fn create_pending(&self, request: &RewardRequest) -> Result<bool>;
    async fn get(&self, id: &str) -> Result<Option<RewardRequest>>;
    async fn list(
        &self,
        filter: &RewardRequestFilter,
        window: Window,
    ) -> Result<Vec<RewardRequest>>;
    async fn count(&self, filter: &RewardRequestFilter) -> Result<u64>;
    async fn list_after(
        &self,
        filter: &RewardRequestFilter,
        query: &CursorQuery,
    ) -> Result<Vec<RewardRequest>>;
    /// 比较并设置：仅当当前状态为 PENDING 时更新，返回更新后的记录
    async fn transition_status(
        &self,
        id: &str,
        to: RewardRequestStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<RewardRequest>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PointReward, RewardData};

    #[test]
    fn test_reward_filter_name_is_case_insensitive() {
        let now = Utc::now();
        let reward = Reward {
            id: "r-1".to_string(),
            name: "Welcome Points".to_string(),
            description: None,
            data: RewardData::Point(PointReward { points: 10 }),
            created_at: now,
            updated_at: now,
        };

        let filter = RewardFilter {
            reward_type: None,
            name: Some("come p".to_string()),
        };
        assert!(filter.matches(&reward));

        let filter = RewardFilter {
            reward_type: Some(RewardType::Badge),
            name: Some("welcome".to_string()),
        };
        assert!(!filter.matches(&reward));
    }

    #[test]
    fn test_reward_request_filter_is_conjunctive() {
        let request = RewardRequest::new_pending("rr-1".into(), "u-1", "e-1", Utc::now());

        assert!(RewardRequestFilter::default().matches(&request));
        assert!(
            RewardRequestFilter {
                user_id: Some("u-1".into()),
                event_id: Some("e-1".into()),
                status: Some(RewardRequestStatus::Pending),
            }
            .matches(&request)
        );
        assert!(
            !RewardRequestFilter {
                user_id: Some("u-1".into()),
                event_id: Some("e-2".into()),
                status: None,
            }
            .matches(&request)
        );
    }
}
