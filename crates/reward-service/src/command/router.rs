//! 命令路由表
//!
//! 启动时一次性建立 命令名 → 处理器 的映射，运行期只读。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use reward_shared::observability::metrics;

use super::handler::CommandHandler;
use super::handlers::*;
use crate::error::{Result, RewardError};
use crate::state::AppState;

pub struct CommandRouter {
    handlers: HashMap<&'static str, Arc<dyn CommandHandler>>,
}

impl CommandRouter {
    /// 创建空的路由表
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// 注册处理器，同名命令会被替换
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> &mut Self {
        let command = handler.command();
        debug!(command, "注册命令处理器");
        self.handlers.insert(command, handler);
        self
    }

    pub fn get(&self, command: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(command).cloned()
    }

    pub fn contains(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    /// 已注册的命令名（按字典序）
    pub fn commands(&self) -> Vec<&'static str> {
        let mut commands: Vec<_> = self.handlers.keys().copied().collect();
        commands.sort_unstable();
        commands
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 分发命令
    #[instrument(skip(self, payload))]
    pub async fn dispatch(&self, command: &str, payload: Value) -> Result<Value> {
        let Some(handler) = self.get(command) else {
            warn!("Unknown command");
            return Err(RewardError::UnknownCommand(command.to_string()));
        };

        let start = Instant::now();
        let result = handler.handle(payload).await;
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(_) => metrics::record_command(command, "success", elapsed),
            Err(e) => {
                metrics::record_command(command, e.error_code(), elapsed);
                if e.is_business_error() {
                    debug!(error = %e, "Command rejected");
                } else {
                    warn!(error = %e, "Command failed");
                }
            }
        }

        result
    }

    /// 注册全部命令
    pub fn with_defaults(state: &AppState) -> Self {
        let mut router = Self::new();

        router
            .register(Arc::new(CreateEventHandler(state.events.clone())))
            .register(Arc::new(GetEventHandler(state.events.clone())))
            .register(Arc::new(UpdateEventHandler(state.events.clone())))
            .register(Arc::new(GetEventsHandler(state.events.clone())))
            .register(Arc::new(CreateRewardHandler(state.rewards.clone())))
            .register(Arc::new(GetRewardsHandler(state.rewards.clone())))
            .register(Arc::new(GetRewardsByCursorHandler(state.rewards.clone())))
            .register(Arc::new(GetRewardByIdHandler(state.rewards.clone())))
            .register(Arc::new(AddRewardToEventHandler(state.event_rewards.clone())))
            .register(Arc::new(RemoveRewardFromEventHandler(
                state.event_rewards.clone(),
            )))
            .register(Arc::new(GetRewardsByEventIdHandler(
                state.event_rewards.clone(),
            )))
            .register(Arc::new(CreateRewardRequestHandler(
                state.reward_requests.clone(),
            )))
            .register(Arc::new(GetRewardRequestByIdHandler(
                state.reward_requests.clone(),
            )))
            .register(Arc::new(GetRewardRequestsHandler(
                state.reward_requests.clone(),
            )))
            .register(Arc::new(GetRewardRequestsByCursorHandler(
                state.reward_requests.clone(),
            )))
            .register(Arc::new(UpdateRewardRequestStatusHandler(
                state.reward_requests.clone(),
            )));

        info!(command_count = router.len(), "命令路由表初始化完成");
        router
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}
