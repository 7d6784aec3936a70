//! 应用状态定义
//!
//! 按存储后端装配仓储与服务，供命令路由和 HTTP 层共享

use std::sync::Arc;

use sqlx::PgPool;

use crate::notifier::StatusChangeNotifier;
use crate::repository::{
    EventRepository, EventRepositoryTrait, EventRewardRepository, EventRewardRepositoryTrait,
    MemoryEventRepository, MemoryEventRewardRepository, MemoryRewardRepository,
    MemoryRewardRequestRepository, RewardRepository, RewardRepositoryTrait,
    RewardRequestRepository, RewardRequestRepositoryTrait,
};
use crate::service::{EventRewardService, EventService, RewardCatalog, RewardRequestService};

/// 仓储集合
#[derive(Clone)]
pub struct Repositories {
    pub events: Arc<dyn EventRepositoryTrait>,
    pub rewards: Arc<dyn RewardRepositoryTrait>,
    pub event_rewards: Arc<dyn EventRewardRepositoryTrait>,
    pub reward_requests: Arc<dyn RewardRequestRepositoryTrait>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            events: Arc::new(EventRepository::new(pool.clone())),
            rewards: Arc::new(RewardRepository::new(pool.clone())),
            event_rewards: Arc::new(EventRewardRepository::new(pool.clone())),
            reward_requests: Arc::new(RewardRequestRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            events: Arc::new(MemoryEventRepository::new()),
            rewards: Arc::new(MemoryRewardRepository::new()),
            event_rewards: Arc::new(MemoryEventRewardRepository::new()),
            reward_requests: Arc::new(MemoryRewardRequestRepository::new()),
        }
    }
}

/// 应用共享状态
///
/// 各服务通过 Arc 在命令处理器之间共享
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
    pub rewards: Arc<RewardCatalog>,
    pub event_rewards: Arc<EventRewardService>,
    pub reward_requests: Arc<RewardRequestService>,
    pub notifier: StatusChangeNotifier,
}

impl AppState {
    pub fn new(repos: Repositories, notifier: StatusChangeNotifier) -> Self {
        Self {
            events: Arc::new(EventService::new(repos.events.clone())),
            rewards: Arc::new(RewardCatalog::new(repos.rewards.clone())),
            event_rewards: Arc::new(EventRewardService::new(
                repos.events.clone(),
                repos.rewards,
                repos.event_rewards,
            )),
            reward_requests: Arc::new(RewardRequestService::new(
                repos.events,
                repos.reward_requests,
                notifier.clone(),
            )),
            notifier,
        }
    }

    /// PostgreSQL 存储
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Repositories::postgres(pool), StatusChangeNotifier::default())
    }

    /// 内存存储，进程退出后数据丢失
    pub fn in_memory() -> Self {
        Self::new(Repositories::in_memory(), StatusChangeNotifier::default())
    }
}
