//! 奖励申请服务
//!
//! 管理用户领取活动奖励的申请及其审核状态机：
//!
//! ```text
//! PENDING ──► APPROVED
//!    │
//!    └─────► REJECTED
//! ```
//!
//! 终态不可再变更。审核通过只发布状态变更通知，奖励的实际发放由下游订阅者完成。

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use reward_shared::observability::metrics;

use crate::error::{Result, RewardError};
use crate::models::{RewardRequest, RewardRequestStatus, new_id};
use crate::notifier::{RewardRequestStatusChanged, StatusChangeNotifier};
use crate::pagination::{CursorPage, CursorParams, OffsetPage};
use crate::repository::{EventRepositoryTrait, RewardRequestFilter, RewardRequestRepositoryTrait};
use crate::service::dto::{RewardRequestCursorQueryDto, RewardRequestQueryDto};

pub struct RewardRequestService {
    event_repo: Arc<dyn EventRepositoryTrait>,
    request_repo: Arc<dyn RewardRequestRepositoryTrait>,
    notifier: StatusChangeNotifier,
}

impl RewardRequestService {
    pub fn new(
        event_repo: Arc<dyn EventRepositoryTrait>,
        request_repo: Arc<dyn RewardRequestRepositoryTrait>,
        notifier: StatusChangeNotifier,
    ) -> Self {
        Self {
            event_repo,
            request_repo,
            notifier,
        }
    }

    /// 创建奖励申请
    ///
    /// 同一用户在同一活动上同时只能有一条 PENDING 申请
    #[instrument(skip(self))]
    pub async fn create_reward_request(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<RewardRequest> {
        if self.event_repo.get(event_id).await?.is_none() {
            return Err(RewardError::EventNotFound(event_id.to_string()));
        }

        let request = RewardRequest::new_pending(new_id(), user_id, event_id, Utc::now());
        if !self.request_repo.create_pending(&request).await? {
            warn!("Duplicate pending reward request");
            return Err(RewardError::DuplicateRewardRequest {
                user_id: user_id.to_string(),
                event_id: event_id.to_string(),
            });
        }

        metrics::record_reward_request_created();
        info!(request_id = %request.id, "Reward request created");
        Ok(request)
    }

    pub async fn get_reward_request_by_id(&self, id: &str) -> Result<RewardRequest> {
        self.request_repo
            .get(id)
            .await?
            .ok_or_else(|| RewardError::RewardRequestNotFound(id.to_string()))
    }

    pub async fn get_reward_requests(
        &self,
        query: RewardRequestQueryDto,
    ) -> Result<OffsetPage<RewardRequest>> {
        let params = query.params();
        let filter = RewardRequestFilter {
            user_id: query.user_id,
            event_id: query.event_id,
            status: query.status,
        };

        let items = self.request_repo.list(&filter, params.window()).await?;
        let total = self.request_repo.count(&filter).await?;

        Ok(OffsetPage::new(items, total, params))
    }

    pub async fn get_reward_requests_by_cursor(
        &self,
        query: RewardRequestCursorQueryDto,
    ) -> Result<CursorPage<RewardRequest>> {
        let params = CursorParams::new(query.cursor.as_deref(), query.limit);
        let filter = RewardRequestFilter {
            user_id: query.user_id,
            event_id: query.event_id,
            status: query.status,
        };

        let items = self
            .request_repo
            .list_after(&filter, &params.query())
            .await?;

        Ok(CursorPage::from_overfetched(items, params.limit))
    }

    /// 按命令中的状态名审核奖励申请
    ///
    /// 申请不存在时返回 `RewardRequestNotFound`，无法识别的状态名视为非法流转
    pub async fn update_reward_request_status_by_name(
        &self,
        request_id: &str,
        new_status: &str,
    ) -> Result<RewardRequest> {
        match new_status.parse::<RewardRequestStatus>() {
            Ok(status) => self.update_reward_request_status(request_id, status).await,
            Err(_) => {
                let current = self.get_reward_request_by_id(request_id).await?;
                Err(RewardError::InvalidStatusTransition {
                    request_id: request_id.to_string(),
                    current: current.status,
                    target: new_status.to_string(),
                })
            }
        }
    }

    /// 审核奖励申请
    ///
    /// 只允许 PENDING → APPROVED / REJECTED。持久化是对 `status = PENDING` 的比较并设置，
    /// 并发审核时只有一个成功，其余返回 `InvalidStatusTransition`
    #[instrument(skip(self))]
    pub async fn update_reward_request_status(
        &self,
        request_id: &str,
        new_status: RewardRequestStatus,
    ) -> Result<RewardRequest> {
        let current = self.get_reward_request_by_id(request_id).await?;

        if !current.status.can_transition_to(new_status) {
            return Err(RewardError::InvalidStatusTransition {
                request_id: request_id.to_string(),
                current: current.status,
                target: new_status.to_string(),
            });
        }

        let updated = match self
            .request_repo
            .transition_status(request_id, new_status, Utc::now())
            .await?
        {
            Some(updated) => updated,
            None => {
                // 读取之后被其他审核抢先，重新读取实际状态用于报错
                let actual = self
                    .request_repo
                    .get(request_id)
                    .await?
                    .map(|r| r.status)
                    .unwrap_or(current.status);
                warn!(current = %actual, "Lost concurrent status transition");
                return Err(RewardError::InvalidStatusTransition {
                    request_id: request_id.to_string(),
                    current: actual,
                    target: new_status.to_string(),
                });
            }
        };

        metrics::record_status_transition(current.status.as_str(), updated.status.as_str());
        self.notifier
            .publish(RewardRequestStatusChanged::new(&updated, current.status));

        info!(user_id = %updated.user_id, event_id = %updated.event_id, "Reward request status updated");
        Ok(updated)
    }
}
