//! 命令层
//!
//! 入站命令按名称路由到处理器，处理器解析载荷后调用服务层

mod handler;
mod handlers;
mod router;

pub use handler::{CommandHandler, parse_payload, to_json};
pub use router::CommandRouter;
