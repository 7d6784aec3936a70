//! 命令处理器 Trait 定义

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::error::{Result, RewardError};

/// 命令处理器
///
/// 每个命令对应一个实现，由 [`CommandRouter`](super::CommandRouter) 按命令名路由。
/// 处理器负责载荷的反序列化与校验，再调用对应的服务方法，结果序列化为 JSON 返回。
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// 命令名，在路由表中唯一
    fn command(&self) -> &'static str;

    async fn handle(&self, payload: Value) -> Result<Value>;
}

/// 解析并校验命令载荷
///
/// 缺省载荷（null）按空对象处理，便于无参数的查询命令
pub fn parse_payload<T>(payload: Value) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let payload = if payload.is_null() {
        Value::Object(Default::default())
    } else {
        payload
    };

    let parsed: T = serde_json::from_value(payload)
        .map_err(|e| RewardError::Validation(format!("命令载荷格式错误: {e}")))?;
    parsed.validate()?;
    Ok(parsed)
}

pub fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
