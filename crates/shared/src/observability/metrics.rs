//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// 全局 Prometheus handle，用于渲染指标
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROMETHEUS_HANDLE.set(handle.clone());

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册业务指标描述，出现在 /metrics 的 HELP 注释中
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("commands_total", "Total number of handled commands");
    metrics::describe_histogram!(
        "command_duration_seconds",
        "Command handling duration in seconds"
    );
    metrics::describe_counter!("rewards_created_total", "Total number of created rewards");
    metrics::describe_counter!(
        "reward_requests_created_total",
        "Total number of created reward requests"
    );
    metrics::describe_counter!(
        "reward_request_transitions_total",
        "Total number of reward request status transitions"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

/// 获取全局 Prometheus handle（用于自定义渲染）
pub fn get_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// 记录命令处理
#[inline]
pub fn record_command(command: &str, status: &str, duration_secs: f64) {
    metrics::counter!(
        "commands_total",
        "command" => command.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "command_duration_seconds",
        "command" => command.to_string()
    )
    .record(duration_secs);
}

/// 记录奖励创建
#[inline]
pub fn record_reward_created(reward_type: &str) {
    metrics::counter!(
        "rewards_created_total",
        "reward_type" => reward_type.to_string()
    )
    .increment(1);
}

/// 记录奖励申请创建
#[inline]
pub fn record_reward_request_created() {
    metrics::counter!("reward_requests_created_total").increment(1);
}

/// 记录奖励申请状态流转
#[inline]
pub fn record_status_transition(from: &str, to: &str) {
    metrics::counter!(
        "reward_request_transitions_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}
