//! 奖励服务错误类型
//!
//! 定义服务层的业务错误和系统错误

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::models::{RewardRequestStatus, RewardType};

/// 奖励服务错误类型
#[derive(Debug, Error)]
pub enum RewardError {
    // === 不存在 ===
    #[error("活动不存在: {0}")]
    EventNotFound(String),

    #[error("奖励不存在: {0}")]
    RewardNotFound(String),

    #[error("奖励申请不存在: {0}")]
    RewardRequestNotFound(String),

    #[error("活动奖励关联不存在: event_id={event_id}, reward_id={reward_id}")]
    AssociationNotFound { event_id: String, reward_id: String },

    // === 冲突 ===
    #[error("活动奖励关联已存在: event_id={event_id}, reward_id={reward_id}")]
    DuplicateAssociation { event_id: String, reward_id: String },

    #[error("已存在待审核的奖励申请: user_id={user_id}, event_id={event_id}")]
    DuplicateRewardRequest { user_id: String, event_id: String },

    #[error(
        "奖励申请状态不允许此操作: request_id={request_id}, current_status={current}, target_status={target}"
    )]
    InvalidStatusTransition {
        request_id: String,
        current: RewardRequestStatus,
        target: String,
    },

    // === 参数 ===
    #[error("奖励数据无效: type={reward_type}, {reason}")]
    InvalidRewardData {
        reward_type: RewardType,
        reason: String,
    },

    #[error("参数校验失败: {0}")]
    Validation(String),

    #[error("未知命令: {0}")]
    UnknownCommand(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 奖励服务 Result 类型别名
pub type Result<T> = std::result::Result<T, RewardError>;

impl RewardError {
    /// 检查是否为可重试的错误
    ///
    /// 业务错误重试也不会改变结果，只有存储层的瞬时故障值得调用方重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_)
        )
    }

    /// 是否为“资源不存在”一类错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound(_)
                | Self::RewardNotFound(_)
                | Self::RewardRequestNotFound(_)
                | Self::AssociationNotFound { .. }
                | Self::UnknownCommand(_)
        )
    }

    /// 是否为与当前状态冲突的错误
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateAssociation { .. }
                | Self::DuplicateRewardRequest { .. }
                | Self::InvalidStatusTransition { .. }
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EventNotFound(_) => "EVENT_NOT_FOUND",
            Self::RewardNotFound(_) => "REWARD_NOT_FOUND",
            Self::RewardRequestNotFound(_) => "REWARD_REQUEST_NOT_FOUND",
            Self::AssociationNotFound { .. } => "ASSOCIATION_NOT_FOUND",
            Self::DuplicateAssociation { .. } => "DUPLICATE_ASSOCIATION",
            Self::DuplicateRewardRequest { .. } => "DUPLICATE_REWARD_REQUEST",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::InvalidRewardData { .. } => "INVALID_REWARD_DATA",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnknownCommand(_) => "UNKNOWN_COMMAND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl RewardError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRewardData { .. } | Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ if self.is_not_found() => StatusCode::NOT_FOUND,
            _ if self.is_conflict() => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RewardError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统错误只返回通用提示，详细信息记录日志
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Serialization(e) => {
                tracing::error!(error = %e, "JSON 序列化失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for RewardError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition_error() -> RewardError {
        RewardError::InvalidStatusTransition {
            request_id: "rr-9".to_string(),
            current: RewardRequestStatus::Approved,
            target: "REJECTED".to_string(),
        }
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(RewardError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!RewardError::EventNotFound("e".to_string()).is_retryable());
        assert!(!transition_error().is_retryable());
    }

    #[test]
    fn test_error_is_business_error() {
        assert!(RewardError::RewardNotFound("r".to_string()).is_business_error());
        assert!(transition_error().is_business_error());
        assert!(!RewardError::Internal("panic".to_string()).is_business_error());
        assert!(!RewardError::Database(sqlx::Error::PoolTimedOut).is_business_error());
    }

    #[test]
    fn test_not_found_and_conflict_are_disjoint() {
        let errors = vec![
            RewardError::EventNotFound("e".into()),
            RewardError::RewardNotFound("r".into()),
            RewardError::RewardRequestNotFound("rr".into()),
            RewardError::AssociationNotFound {
                event_id: "e".into(),
                reward_id: "r".into(),
            },
            RewardError::DuplicateAssociation {
                event_id: "e".into(),
                reward_id: "r".into(),
            },
            RewardError::DuplicateRewardRequest {
                user_id: "u".into(),
                event_id: "e".into(),
            },
            transition_error(),
        ];

        for err in errors {
            assert!(
                err.is_not_found() != err.is_conflict(),
                "{} 必须且只能属于一类",
                err.error_code()
            );
        }
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            RewardError::EventNotFound("e".into()).error_code(),
            "EVENT_NOT_FOUND"
        );
        assert_eq!(transition_error().error_code(), "INVALID_STATUS_TRANSITION");
        assert_eq!(
            RewardError::InvalidRewardData {
                reward_type: RewardType::Point,
                reason: "x".into()
            }
            .error_code(),
            "INVALID_REWARD_DATA"
        );
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            RewardError::EventNotFound("e".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RewardError::UnknownCommand("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(transition_error().status_code(), StatusCode::CONFLICT);
        assert_eq!(
            RewardError::DuplicateAssociation {
                event_id: "e".into(),
                reward_id: "r".into()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RewardError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RewardError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_display() {
        let err = transition_error();
        let msg = err.to_string();
        assert!(msg.contains("rr-9"));
        assert!(msg.contains("APPROVED"));
        assert!(msg.contains("REJECTED"));

        let err = RewardError::DuplicateRewardRequest {
            user_id: "user-123".into(),
            event_id: "event-7".into(),
        };
        assert!(err.to_string().contains("user-123"));
        assert!(err.to_string().contains("event-7"));
    }
}
