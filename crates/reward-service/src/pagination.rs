//! 分页编解码
//!
//! 两种分页策略，都只处理已经取回的数据，不涉及存储逻辑：
//!
//! - 偏移分页：页码 + 每页条数，需要独立统计的总数
//! - 游标分页：不透明游标 + 条数，按 id 升序推进，不暴露总数
//!
//! 游标格式为标准 base64 编码的 JSON 对象 `{"id": "<string>"}`。

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// 单页最大条数
pub const MAX_LIMIT: u32 = 100;

/// 游标分页默认条数
pub const DEFAULT_CURSOR_LIMIT: u32 = 10;

/// 偏移分页默认条数
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_LIMIT)
}

// ==================== 偏移分页 ====================

/// 偏移分页参数（页码从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetParams {
    pub page: u32,
    pub limit: u32,
}

impl OffsetParams {
    /// 构造分页参数，limit 超出范围时收敛到 1..=100
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit: clamp_limit(limit),
        }
    }

    /// 查询用的 OFFSET
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.limit)
    }

    pub fn window(&self) -> Window {
        Window {
            limit: i64::from(self.limit),
            offset: self.offset(),
        }
    }
}

/// 传给仓储层的 LIMIT/OFFSET 窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

impl Window {
    /// 按行偏移构造窗口，limit 收敛到 1..=100，offset 不小于 0
    pub fn new(limit: u32, offset: u64) -> Self {
        Self {
            limit: i64::from(clamp_limit(limit)),
            offset: i64::try_from(offset).unwrap_or(i64::MAX),
        }
    }
}

/// 偏移分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> OffsetPage<T> {
    pub fn new(items: Vec<T>, total_items: u64, params: OffsetParams) -> Self {
        let limit = clamp_limit(params.limit);
        let total_pages = total_items.div_ceil(u64::from(limit));
        let page = params.page;

        Self {
            items,
            total_items,
            page,
            limit,
            total_pages,
            has_next_page: u64::from(page) + 1 < total_pages,
            has_previous_page: page > 0 && total_items > 0,
        }
    }

    /// 转换条目类型，分页元数据保持不变
    pub fn map<U, F>(self, f: F) -> OffsetPage<U>
    where
        F: FnMut(T) -> U,
    {
        OffsetPage {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
        }
    }
}

// ==================== 游标分页 ====================

#[derive(Serialize, Deserialize)]
struct CursorPayload {
    id: String,
}

/// 将排序键编码为不透明游标
pub fn encode_cursor(id: &str) -> String {
    // 只含一个字符串字段的结构体序列化不会失败
    let json = serde_json::to_vec(&CursorPayload { id: id.to_string() }).unwrap_or_default();
    STANDARD.encode(json)
}

/// 解码游标
///
/// 任何格式问题（base64、UTF-8、JSON、缺少或为空的 id）都视为“没有游标”
pub fn decode_cursor(cursor: &str) -> Option<String> {
    let bytes = STANDARD.decode(cursor.trim()).ok()?;
    let text = std::str::from_utf8(&bytes).ok()?;
    let payload: CursorPayload = serde_json::from_str(text).ok()?;

    if payload.id.is_empty() {
        None
    } else {
        Some(payload.id)
    }
}

/// 可作为游标排序键的条目
pub trait CursorKey {
    fn cursor_key(&self) -> &str;
}

/// 传给仓储层的游标查询
///
/// 仓储按 id 升序返回严格大于 `after_id` 的至多 `fetch_limit` 条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorQuery {
    pub after_id: Option<String>,
    pub fetch_limit: i64,
}

/// 游标分页参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorParams {
    pub after_id: Option<String>,
    pub limit: u32,
}

impl CursorParams {
    pub fn new(cursor: Option<&str>, limit: Option<u32>) -> Self {
        Self {
            after_id: cursor.and_then(decode_cursor),
            limit: clamp_limit(limit.unwrap_or(DEFAULT_CURSOR_LIMIT)),
        }
    }

    /// 多取一条用于判断是否还有下一页
    pub fn query(&self) -> CursorQuery {
        CursorQuery {
            after_id: self.after_id.clone(),
            fetch_limit: i64::from(self.limit) + 1,
        }
    }
}

/// 游标分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T: CursorKey> CursorPage<T> {
    /// 由多取了一条的结果构造分页
    pub fn from_overfetched(mut items: Vec<T>, limit: u32) -> Self {
        let limit = clamp_limit(limit) as usize;
        let has_more = items.len() > limit;

        if has_more {
            items.truncate(limit);
        }

        let next_cursor = if has_more {
            items.last().map(|item| encode_cursor(item.cursor_key()))
        } else {
            None
        };

        Self {
            items,
            next_cursor,
            has_more,
        }
    }
}

impl<T> CursorPage<T> {
    pub fn map<U, F>(self, f: F) -> CursorPage<U>
    where
        F: FnMut(T) -> U,
    {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

impl CursorKey for crate::models::Reward {
    fn cursor_key(&self) -> &str {
        &self.id
    }
}

impl CursorKey for crate::models::RewardRequest {
    fn cursor_key(&self) -> &str {
        &self.id
    }
}
