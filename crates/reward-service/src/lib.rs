//! 奖励服务
//!
//! 管理活动奖励目录与用户奖励申请的审核流程。
//!
//! ## 核心功能
//!
//! - **奖励目录**：积分、道具、优惠券、徽章四种奖励变体的创建与查询
//! - **活动关联**：活动与奖励的多对多关联
//! - **奖励申请**：用户领取申请及 PENDING → APPROVED / REJECTED 审核状态机
//! - **分页**：偏移分页与不透明游标分页
//! - **状态通知**：审核结果广播给下游发放方
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `pagination`: 分页编解码
//! - `repository`: 仓储层（PostgreSQL 与内存实现）
//! - `service`: 业务服务层
//! - `notifier`: 状态变更通知
//! - `command`: 命令路由
//! - `http`: HTTP 命令入口
//! - `state`: 依赖装配

pub mod command;
pub mod error;
pub mod http;
pub mod models;
pub mod notifier;
pub mod pagination;
pub mod repository;
pub mod service;
pub mod state;

pub use command::{CommandHandler, CommandRouter};
pub use error::{Result, RewardError};
pub use models::*;
pub use notifier::{RewardRequestStatusChanged, StatusChangeNotifier};
pub use pagination::{CursorPage, OffsetPage};
pub use service::{EventRewardService, EventService, RewardCatalog, RewardRequestService, dto};
pub use state::{AppState, Repositories};
