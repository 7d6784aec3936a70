//! 奖励服务
//!
//! 通过 HTTP 暴露奖励命令，存储后端由配置决定。

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reward_shared::{
    config::{AppConfig, StorageBackend},
    database::Database,
    observability,
};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use reward_service::{AppState, CommandRouter, http};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载配置，失败时先记下错误，等日志初始化后再输出
    let (config, load_error) = AppConfig::load_or_default("reward-service");

    // 2. 初始化可观测性
    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!("Starting reward-service...");
    info!(
        environment = %config.environment,
        backend = ?config.storage.backend,
        "Configuration loaded"
    );

    // 3. 按存储后端装配服务
    let (state, db) = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            if config.database.run_migrations {
                db.run_migrations().await?;
            }
            info!("Database connection established");
            (AppState::postgres(db.pool().clone()), Some(db))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data will be lost on restart");
            (AppState::in_memory(), None)
        }
    };

    // 4. 命令路由与 HTTP 入口
    let commands = Arc::new(CommandRouter::with_defaults(&state));
    let app = http::router(
        commands,
        db.clone(),
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await;
    }

    info!("Service shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
///
/// 监听 Ctrl+C 和 SIGTERM 信号
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        }
    }
}
