//! 奖励服务领域模型

pub mod enums;
pub mod event;
pub mod reward;
pub mod reward_request;

pub use enums::{EventStatus, RewardRequestStatus, RewardType};
pub use event::Event;
pub use reward::{
    BadgeReward, CouponReward, ItemReward, PointReward, Reward, RewardData, RewardRow,
};
pub use reward_request::{EventReward, RewardRequest};

/// 生成新的实体 ID
///
/// 使用 UUID v7：字典序与创建时间一致，可直接作为游标分页的排序键
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
