//! 服务层数据传输对象
//!
//! 命令载荷统一使用 camelCase JSON，字段校验由 validator 完成，
//! 跨字段约束（活动时间窗口）由服务层检查

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::{EventStatus, Reward, RewardRequestStatus, RewardType};
use crate::pagination::{DEFAULT_PAGE_LIMIT, OffsetParams, Window};

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

/// 按 ID 查询
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IdDto {
    #[validate(length(min = 1, message = "id 不能为空"))]
    pub id: String,
}

// ==================== 活动 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 100, message = "活动名称长度必须在1-100个字符之间"))]
    pub name: String,
    pub description: Option<String>,
    pub condition: Option<Value>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: Option<EventStatus>,
}

/// 更新活动，未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDto {
    #[validate(length(min = 1, message = "id 不能为空"))]
    pub id: String,
    #[validate(length(min = 1, max = 100, message = "活动名称长度必须在1-100个字符之间"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub condition: Option<Value>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventQueryDto {
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_limit")]
    pub limit: u32,
}

impl EventQueryDto {
    pub fn params(&self) -> OffsetParams {
        OffsetParams::new(self.page, self.limit)
    }
}

// ==================== 奖励 ====================

/// 创建奖励
///
/// `rewardData` 只包含变体字段，按 `type` 对应的结构解析
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRewardDto {
    #[validate(length(min = 1, max = 100, message = "奖励名称长度必须在1-100个字符之间"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub reward_type: RewardType,
    #[serde(default)]
    pub reward_data: Value,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RewardQueryDto {
    #[serde(rename = "type")]
    pub reward_type: Option<RewardType>,
    pub name: Option<String>,
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
}

impl RewardQueryDto {
    pub fn window(&self) -> Window {
        Window::new(self.limit, self.offset)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RewardCursorQueryDto {
    #[serde(rename = "type")]
    pub reward_type: Option<RewardType>,
    pub name: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// 奖励列表
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardListDto {
    pub rewards: Vec<Reward>,
    pub total: u64,
}

/// 活动奖励关联操作
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventRewardDto {
    #[validate(length(min = 1, message = "eventId 不能为空"))]
    pub event_id: String,
    #[validate(length(min = 1, message = "rewardId 不能为空"))]
    pub reward_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventIdDto {
    #[validate(length(min = 1, message = "eventId 不能为空"))]
    pub event_id: String,
}

// ==================== 奖励申请 ====================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRewardRequestDto {
    #[validate(length(min = 1, max = 100, message = "userId 长度必须在1-100个字符之间"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "eventId 不能为空"))]
    pub event_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequestQueryDto {
    pub user_id: Option<String>,
    pub event_id: Option<String>,
    pub status: Option<RewardRequestStatus>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_limit")]
    pub limit: u32,
}

impl RewardRequestQueryDto {
    pub fn params(&self) -> OffsetParams {
        OffsetParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequestCursorQueryDto {
    pub user_id: Option<String>,
    pub event_id: Option<String>,
    pub status: Option<RewardRequestStatus>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// 审核奖励申请
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRewardRequestStatusDto {
    #[validate(length(min = 1, message = "rewardRequestId 不能为空"))]
    pub reward_request_id: String,
    /// 目标状态，未知取值由服务层按非法流转处理
    #[serde(alias = "newStatus")]
    #[validate(length(min = 1, message = "status 不能为空"))]
    pub status: String,
}
