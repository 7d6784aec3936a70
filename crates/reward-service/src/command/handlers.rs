//! 命令处理器实现
//!
//! 每个处理器持有所需服务的 Arc，只做载荷解析和结果序列化

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::handler::{CommandHandler, parse_payload, to_json};
use crate::error::Result;
use crate::service::dto::{
    CreateEventDto, CreateRewardDto, CreateRewardRequestDto, EventIdDto, EventQueryDto,
    EventRewardDto, IdDto, RewardCursorQueryDto, RewardQueryDto, RewardRequestCursorQueryDto,
    RewardRequestQueryDto, UpdateEventDto, UpdateRewardRequestStatusDto,
};
use crate::service::{EventRewardService, EventService, RewardCatalog, RewardRequestService};

// ==================== 活动 ====================

pub struct CreateEventHandler(pub Arc<EventService>);

#[async_trait]
impl CommandHandler for CreateEventHandler {
    fn command(&self) -> &'static str {
        "create_event"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: CreateEventDto = parse_payload(payload)?;
        to_json(&self.0.create_event(dto).await?)
    }
}

pub struct GetEventHandler(pub Arc<EventService>);

#[async_trait]
impl CommandHandler for GetEventHandler {
    fn command(&self) -> &'static str {
        "get_event"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: IdDto = parse_payload(payload)?;
        to_json(&self.0.get_event_by_id(&dto.id).await?)
    }
}

pub struct UpdateEventHandler(pub Arc<EventService>);

#[async_trait]
impl CommandHandler for UpdateEventHandler {
    fn command(&self) -> &'static str {
        "update_event"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: UpdateEventDto = parse_payload(payload)?;
        to_json(&self.0.update_event(dto).await?)
    }
}

pub struct GetEventsHandler(pub Arc<EventService>);

#[async_trait]
impl CommandHandler for GetEventsHandler {
    fn command(&self) -> &'static str {
        "get_events"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: EventQueryDto = parse_payload(payload)?;
        to_json(&self.0.get_events(dto).await?)
    }
}

// ==================== 奖励 ====================

pub struct CreateRewardHandler(pub Arc<RewardCatalog>);

#[async_trait]
impl CommandHandler for CreateRewardHandler {
    fn command(&self) -> &'static str {
        "create_reward"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: CreateRewardDto = parse_payload(payload)?;
        to_json(&self.0.create_reward(dto).await?)
    }
}

pub struct GetRewardsHandler(pub Arc<RewardCatalog>);

#[async_trait]
impl CommandHandler for GetRewardsHandler {
    fn command(&self) -> &'static str {
        "get_rewards"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: RewardQueryDto = parse_payload(payload)?;
        to_json(&self.0.get_rewards(dto).await?)
    }
}

pub struct GetRewardsByCursorHandler(pub Arc<RewardCatalog>);

#[async_trait]
impl CommandHandler for GetRewardsByCursorHandler {
    fn command(&self) -> &'static str {
        "get_rewards_by_cursor"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: RewardCursorQueryDto = parse_payload(payload)?;
        to_json(&self.0.get_rewards_by_cursor(dto).await?)
    }
}

pub struct GetRewardByIdHandler(pub Arc<RewardCatalog>);

#[async_trait]
impl CommandHandler for GetRewardByIdHandler {
    fn command(&self) -> &'static str {
        "get_reward_by_id"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: IdDto = parse_payload(payload)?;
        to_json(&self.0.get_reward_by_id(&dto.id).await?)
    }
}

// ==================== 活动奖励关联 ====================

pub struct AddRewardToEventHandler(pub Arc<EventRewardService>);

#[async_trait]
impl CommandHandler for AddRewardToEventHandler {
    fn command(&self) -> &'static str {
        "add_reward_to_event"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: EventRewardDto = parse_payload(payload)?;
        self.0
            .add_reward_to_event(&dto.event_id, &dto.reward_id)
            .await?;
        Ok(Value::Null)
    }
}

pub struct RemoveRewardFromEventHandler(pub Arc<EventRewardService>);

#[async_trait]
impl CommandHandler for RemoveRewardFromEventHandler {
    fn command(&self) -> &'static str {
        "remove_reward_from_event"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: EventRewardDto = parse_payload(payload)?;
        self.0
            .remove_reward_from_event(&dto.event_id, &dto.reward_id)
            .await?;
        Ok(Value::Null)
    }
}

pub struct GetRewardsByEventIdHandler(pub Arc<EventRewardService>);

#[async_trait]
impl CommandHandler for GetRewardsByEventIdHandler {
    fn command(&self) -> &'static str {
        "get_rewards_by_event_id"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: EventIdDto = parse_payload(payload)?;
        to_json(&self.0.get_rewards_by_event_id(&dto.event_id).await?)
    }
}

// ==================== 奖励申请 ====================

pub struct CreateRewardRequestHandler(pub Arc<RewardRequestService>);

#[async_trait]
impl CommandHandler for CreateRewardRequestHandler {
    fn command(&self) -> &'static str {
        "create_reward_request"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: CreateRewardRequestDto = parse_payload(payload)?;
        to_json(
            &self
                .0
                .create_reward_request(&dto.user_id, &dto.event_id)
                .await?,
        )
    }
}

pub struct GetRewardRequestByIdHandler(pub Arc<RewardRequestService>);

#[async_trait]
impl CommandHandler for GetRewardRequestByIdHandler {
    fn command(&self) -> &'static str {
        "get_reward_request_by_id"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: IdDto = parse_payload(payload)?;
        to_json(&self.0.get_reward_request_by_id(&dto.id).await?)
    }
}

pub struct GetRewardRequestsHandler(pub Arc<RewardRequestService>);

#[async_trait]
impl CommandHandler for GetRewardRequestsHandler {
    fn command(&self) -> &'static str {
        "get_reward_requests"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: RewardRequestQueryDto = parse_payload(payload)?;
        to_json(&self.0.get_reward_requests(dto).await?)
    }
}

pub struct GetRewardRequestsByCursorHandler(pub Arc<RewardRequestService>);

#[async_trait]
impl CommandHandler for GetRewardRequestsByCursorHandler {
    fn command(&self) -> &'static str {
        "get_reward_requests_by_cursor"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: RewardRequestCursorQueryDto = parse_payload(payload)?;
        to_json(&self.0.get_reward_requests_by_cursor(dto).await?)
    }
}

pub struct UpdateRewardRequestStatusHandler(pub Arc<RewardRequestService>);

#[async_trait]
impl CommandHandler for UpdateRewardRequestStatusHandler {
    fn command(&self) -> &'static str {
        "update_reward_request_status"
    }

    async fn handle(&self, payload: Value) -> Result<Value> {
        let dto: UpdateRewardRequestStatusDto = parse_payload(payload)?;
        to_json(
            &self
                .0
                .update_reward_request_status_by_name(&dto.reward_request_id, &dto.status)
                .await?,
        )
    }
}
