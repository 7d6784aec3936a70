//! 仓储层
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 判重和状态流转依赖存储层的原子语句，不做先查后写
//! - 定义 trait 接口以支持 mock 测试和内存实现

mod event_repo;
mod event_reward_repo;
mod memory;
mod memory_store;
mod reward_repo;
mod reward_request_repo;
mod traits;

pub use event_repo::EventRepository;
pub use event_reward_repo::EventRewardRepository;
pub use memory::{
    MemoryEventRepository, MemoryEventRewardRepository, MemoryRewardRepository,
    MemoryRewardRequestRepository,
};
pub use memory_store::MemoryStore;
pub use reward_repo::RewardRepository;
pub use reward_request_repo::RewardRequestRepository;
pub use traits::*;
