//! 服务层
//!
//! 实现奖励业务逻辑，只依赖仓储 trait。
//!
//! ## 模块结构
//!
//! - `dto`: 命令载荷与返回结构
//! - `event_service`: 活动管理
//! - `reward_catalog`: 奖励创建与查询
//! - `event_reward_service`: 活动与奖励的关联
//! - `reward_request_service`: 奖励申请及审核状态机

pub mod dto;
pub mod event_reward_service;
pub mod event_service;
pub mod reward_catalog;
pub mod reward_request_service;

pub use dto::*;
pub use event_reward_service::EventRewardService;
pub use event_service::EventService;
pub use reward_catalog::RewardCatalog;
pub use reward_request_service::RewardRequestService;
