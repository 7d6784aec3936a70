//! 奖励申请与活动奖励关联实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::RewardRequestStatus;

/// 奖励申请
///
/// 用户对某个活动奖励的一次领取申请，只能通过状态机修改 status，不做物理删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequest {
    pub id: String,
    /// 申请用户 ID
    pub user_id: String,
    /// 活动 ID（引用，不复制活动内容）
    pub event_id: String,
    pub status: RewardRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RewardRequest {
    /// 构造一条新的待审核申请
    pub fn new_pending(id: String, user_id: &str, event_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: user_id.to_string(),
            event_id: event_id.to_string(),
            status: RewardRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RewardRequestStatus::Pending
    }
}

/// 活动与奖励的关联
///
/// 每个 (event_id, reward_id) 至多一条，删除关联不影响活动或奖励本身
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventReward {
    pub event_id: String,
    pub reward_id: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pending() {
        let now = Utc::now();
        let request = RewardRequest::new_pending("rr-1".to_string(), "u-1", "e-1", now);
        assert!(request.is_pending());
        assert_eq!(request.created_at, request.updated_at);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["userId"], "u-1");
        assert_eq!(value["eventId"], "e-1");
        assert_eq!(value["status"], "PENDING");
    }
}
