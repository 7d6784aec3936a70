//! 奖励申请状态变更通知
//!
//! 审核通过不在本服务内发放奖励，下游发放方订阅此通知自行处理。
//! 基于 tokio broadcast：没有订阅者时发布不是错误，订阅者只会收到订阅之后的变更。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::{RewardRequest, RewardRequestStatus};

const DEFAULT_CAPACITY: usize = 256;

/// 状态变更通知
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequestStatusChanged {
    pub request_id: String,
    pub user_id: String,
    pub event_id: String,
    pub from: RewardRequestStatus,
    pub to: RewardRequestStatus,
    pub changed_at: DateTime<Utc>,
}

impl RewardRequestStatusChanged {
    pub fn new(updated: &RewardRequest, from: RewardRequestStatus) -> Self {
        Self {
            request_id: updated.id.clone(),
            user_id: updated.user_id.clone(),
            event_id: updated.event_id.clone(),
            from,
            to: updated.status,
            changed_at: updated.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusChangeNotifier {
    sender: broadcast::Sender<RewardRequestStatusChanged>,
}

impl Default for StatusChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl StatusChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RewardRequestStatusChanged> {
        self.sender.subscribe()
    }

    /// 发布变更，返回收到通知的订阅者数量
    pub fn publish(&self, change: RewardRequestStatusChanged) -> usize {
        match self.sender.send(change) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(change)) => {
                debug!(request_id = %change.request_id, "No subscriber for status change");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
