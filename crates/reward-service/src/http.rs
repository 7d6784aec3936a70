//! HTTP 命令入口
//!
//! - `POST /commands/{name}`：请求体为命令载荷（JSON，可为空），响应统一包装为 [`ApiResponse`]
//! - `GET /health`：健康检查，PostgreSQL 后端时同时探测数据库

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use reward_shared::database::Database;

use crate::command::CommandRouter;
use crate::error::RewardError;

/// 统一响应结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }
}

#[derive(Clone)]
pub struct HttpState {
    pub commands: Arc<CommandRouter>,
    /// 内存后端时为 None
    pub database: Option<Database>,
}

/// 构建 HTTP 路由
pub fn router(
    commands: Arc<CommandRouter>,
    database: Option<Database>,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/commands/{name}", post(execute_command))
        .route("/health", get(health_check))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(HttpState { commands, database })
}

async fn execute_command(
    State(state): State<HttpState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<Value>>, RewardError> {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| RewardError::Validation(format!("请求体不是合法 JSON: {e}")))?
    };

    let data = state.commands.dispatch(&name, payload).await?;
    Ok(Json(ApiResponse::success(data)))
}

async fn health_check(State(state): State<HttpState>) -> impl IntoResponse {
    let database = match &state.database {
        None => "disabled",
        Some(db) => match db.health_check().await {
            Ok(()) => "ok",
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                "unavailable"
            }
        },
    };

    let status = if database == "unavailable" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status,
        Json(serde_json::json!({
            "status": if status == StatusCode::OK { "ok" } else { "degraded" },
            "service": "reward-service",
            "database": database,
            "commands": state.commands.len()
        })),
    )
}
