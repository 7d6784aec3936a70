//! 奖励服务枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 奖励类型
///
/// 决定奖励携带哪一组变体字段，见 `RewardType::parse_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardType {
    /// 积分
    Point,
    /// 道具
    Item,
    /// 优惠券
    Coupon,
    /// 徽章
    Badge,
}

impl RewardType {
    pub const ALL: [RewardType; 4] = [Self::Point, Self::Item, Self::Coupon, Self::Badge];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::Item => "ITEM",
            Self::Coupon => "COUPON",
            Self::Badge => "BADGE",
        }
    }
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 活动状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// 进行中
    #[default]
    Active,
    /// 已停用
    Inactive,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

/// 奖励申请状态
///
/// PENDING 是唯一的初始状态，APPROVED / REJECTED 为终态，终态之间不可互转
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardRequestStatus {
    /// 待审核
    #[default]
    Pending,
    /// 已通过
    Approved,
    /// 已拒绝
    Rejected,
}

impl RewardRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// 判断从当前状态能否流转到目标状态
    ///
    /// 只有 PENDING -> APPROVED 和 PENDING -> REJECTED 两条边
    pub fn can_transition_to(&self, target: RewardRequestStatus) -> bool {
        *self == Self::Pending && target.is_terminal()
    }
}

impl FromStr for RewardRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(format!("未知的奖励申请状态: {other}")),
        }
    }
}

impl fmt::Display for RewardRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_type_serialization() {
        assert_eq!(
            serde_json::to_string(&RewardType::Coupon).unwrap(),
            "\"COUPON\""
        );
        assert_eq!(
            serde_json::from_str::<RewardType>("\"BADGE\"").unwrap(),
            RewardType::Badge
        );
        assert!(serde_json::from_str::<RewardType>("\"CASH\"").is_err());
    }

    #[test]
    fn test_reward_type_as_str_matches_serde() {
        for reward_type in RewardType::ALL {
            assert_eq!(
                serde_json::to_string(&reward_type).unwrap(),
                format!("\"{}\"", reward_type.as_str())
            );
        }
    }

    #[test]
    fn test_event_status_default() {
        assert_eq!(EventStatus::default(), EventStatus::Active);
        assert_eq!(EventStatus::Inactive.as_str(), "INACTIVE");
    }

    #[test]
    fn test_request_status_transitions() {
        use RewardRequestStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));

        // 终态不可再流转
        for from in [Approved, Rejected] {
            for to in [Pending, Approved, Rejected] {
                assert!(!from.can_transition_to(to), "{from} -> {to} 不应被允许");
            }
        }
    }

    #[test]
    fn test_request_status_terminal() {
        assert!(!RewardRequestStatus::Pending.is_terminal());
        assert!(RewardRequestStatus::Approved.is_terminal());
        assert!(RewardRequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_request_status_from_str() {
        assert_eq!(
            "APPROVED".parse::<RewardRequestStatus>(),
            Ok(RewardRequestStatus::Approved)
        );
        assert!("approved".parse::<RewardRequestStatus>().is_err());
        assert!("FOO".parse::<RewardRequestStatus>().is_err());
    }
}
