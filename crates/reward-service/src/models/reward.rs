//! 奖励实体定义
//!
//! 奖励是一个按 `type` 区分的和类型：公共字段放在 `Reward`，
//! 变体字段放在 `RewardData` 的各个分支里，两者通过 serde flatten 合并成一个 JSON 对象。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::RewardType;

/// 积分奖励
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PointReward {
    pub points: i64,
}

/// 道具奖励
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemReward {
    pub item_id: String,
    pub quantity: i64,
}

/// 优惠券奖励
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CouponReward {
    pub coupon_code: String,
    pub expiry: DateTime<Utc>,
}

/// 徽章奖励
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BadgeReward {
    pub badge_id: String,
}

/// 奖励变体数据
///
/// `type` 标签与变体字段由类型系统保证一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardData {
    Point(PointReward),
    Item(ItemReward),
    Coupon(CouponReward),
    Badge(BadgeReward),
}

impl RewardData {
    pub fn reward_type(&self) -> RewardType {
        match self {
            Self::Point(_) => RewardType::Point,
            Self::Item(_) => RewardType::Item,
            Self::Coupon(_) => RewardType::Coupon,
            Self::Badge(_) => RewardType::Badge,
        }
    }

    /// 变体字段的 JSON 形式（不含 type 标签），用于落库
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Point(data) => serde_json::to_value(data),
            Self::Item(data) => serde_json::to_value(data),
            Self::Coupon(data) => serde_json::to_value(data),
            Self::Badge(data) => serde_json::to_value(data),
        }
    }

    /// 业务校验：数量类字段必须为正，标识类字段不能为空
    fn check(&self) -> Result<(), String> {
        match self {
            Self::Point(data) => {
                if data.points <= 0 {
                    return Err(format!("points 必须为正整数，实际为 {}", data.points));
                }
            }
            Self::Item(data) => {
                require_non_empty("itemId", &data.item_id)?;
                if data.quantity <= 0 {
                    return Err(format!("quantity 必须为正整数，实际为 {}", data.quantity));
                }
            }
            Self::Coupon(data) => require_non_empty("couponCode", &data.coupon_code)?,
            Self::Badge(data) => require_non_empty("badgeId", &data.badge_id)?,
        }
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} 不能为空"))
    } else {
        Ok(())
    }
}

impl RewardType {
    /// 该类型要求的变体字段
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Point => &["points"],
            Self::Item => &["itemId", "quantity"],
            Self::Coupon => &["couponCode", "expiry"],
            Self::Badge => &["badgeId"],
        }
    }

    /// 按类型解析变体数据
    ///
    /// 缺字段、类型不符、数值非正、出现其他变体的字段都会返回错误描述
    pub fn parse_data(&self, data: Value) -> Result<RewardData, String> {
        if !data.is_object() {
            return Err(format!("{} 奖励数据必须是 JSON 对象", self));
        }

        let parsed = match self {
            Self::Point => serde_json::from_value(data).map(RewardData::Point),
            Self::Item => serde_json::from_value(data).map(RewardData::Item),
            Self::Coupon => serde_json::from_value(data).map(RewardData::Coupon),
            Self::Badge => serde_json::from_value(data).map(RewardData::Badge),
        }
        .map_err(|e| {
            format!(
                "{} 奖励需要字段 {:?}: {}",
                self,
                self.required_fields(),
                e
            )
        })?;

        parsed.check()?;
        Ok(parsed)
    }
}

/// 奖励
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub data: RewardData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    pub fn reward_type(&self) -> RewardType {
        self.data.reward_type()
    }
}

/// rewards 表的行结构
///
/// 变体字段以 JSONB 存储，读出时按 reward_type 重新解析，脏数据会被拒绝而不是静默接受
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RewardRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub reward_type: RewardType,
    pub reward_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RewardRow> for Reward {
    type Error = String;

    fn try_from(row: RewardRow) -> Result<Self, Self::Error> {
        let data = row
            .reward_type
            .parse_data(row.reward_data)
            .map_err(|e| format!("reward {} 数据损坏: {}", row.id, e))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_each_variant() {
        let point = RewardType::Point.parse_data(json!({"points": 100})).unwrap();
        assert_eq!(point, RewardData::Point(PointReward { points: 100 }));

        let item = RewardType::Item
            .parse_data(json!({"itemId": "sword-1", "quantity": 2}))
            .unwrap();
        assert_eq!(
            item,
            RewardData::Item(ItemReward {
                item_id: "sword-1".to_string(),
                quantity: 2
            })
        );

        let coupon = RewardType::Coupon
            .parse_data(json!({"couponCode": "SPRING10", "expiry": "2026-12-31T00:00:00Z"}))
            .unwrap();
        assert_eq!(coupon.reward_type(), RewardType::Coupon);

        let badge = RewardType::Badge
            .parse_data(json!({"badgeId": "early-bird"}))
            .unwrap();
        assert_eq!(badge.reward_type(), RewardType::Badge);
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(RewardType::Point.parse_data(json!({})).is_err());
        assert!(RewardType::Item.parse_data(json!({"itemId": "x"})).is_err());
        assert!(RewardType::Coupon.parse_data(json!({"couponCode": "A"})).is_err());
        assert!(RewardType::Badge.parse_data(json!({"badge": "x"})).is_err());
    }

    #[test]
    fn test_parse_rejects_foreign_fields() {
        let err = RewardType::Point
            .parse_data(json!({"points": 10, "badgeId": "x"}))
            .unwrap_err();
        assert!(err.contains("POINT"));

        assert!(
            RewardType::Badge
                .parse_data(json!({"badgeId": "x", "quantity": 1}))
                .is_err()
        );
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(RewardType::Point.parse_data(json!({"points": "100"})).is_err());
        assert!(RewardType::Point.parse_data(json!({"points": 1.5})).is_err());
        assert!(RewardType::Point.parse_data(json!({"points": 0})).is_err());
        assert!(RewardType::Point.parse_data(json!({"points": -3})).is_err());
        assert!(
            RewardType::Item
                .parse_data(json!({"itemId": "x", "quantity": 0}))
                .is_err()
        );
        assert!(
            RewardType::Coupon
                .parse_data(json!({"couponCode": "A", "expiry": "tomorrow"}))
                .is_err()
        );
        assert!(RewardType::Badge.parse_data(json!({"badgeId": "  "})).is_err());
        assert!(RewardType::Badge.parse_data(json!(["badgeId"])).is_err());
        assert!(RewardType::Point.parse_data(Value::Null).is_err());
    }

    #[test]
    fn test_reward_json_shape() {
        let now = Utc::now();
        let reward = Reward {
            id: "r-1".to_string(),
            name: "新手礼包".to_string(),
            description: None,
            data: RewardData::Item(ItemReward {
                item_id: "potion".to_string(),
                quantity: 3,
            }),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&reward).unwrap();
        assert_eq!(value["type"], "ITEM");
        assert_eq!(value["itemId"], "potion");
        assert_eq!(value["quantity"], 3);
        assert!(value.get("description").is_none());

        let back: Reward = serde_json::from_value(value).unwrap();
        assert_eq!(back, reward);
    }

    #[test]
    fn test_to_value_has_no_tag() {
        let data = RewardData::Point(PointReward { points: 5 });
        let value = data.to_value().unwrap();
        assert_eq!(value, json!({"points": 5}));
        assert_eq!(RewardType::Point.parse_data(value).unwrap(), data);
    }

    #[test]
    fn test_row_with_corrupt_data_is_rejected() {
        let now = Utc::now();
        let row = RewardRow {
            id: "r-2".to_string(),
            name: "broken".to_string(),
            description: None,
            reward_type: RewardType::Coupon,
            reward_data: json!({"points": 10}),
            created_at: now,
            updated_at: now,
        };
        let err = Reward::try_from(row).unwrap_err();
        assert!(err.contains("r-2"));
    }
}
