//! 内存存储
//!
//! 使用 DashMap 实现的高并发内存存储，供内存仓储和测试使用。

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// 通用内存存储
///
/// 单个 key 上的读改写都在 DashMap 分片锁内完成，因此条件插入和条件更新是原子的
#[derive(Debug)]
pub struct MemoryStore<T> {
    data: Arc<DashMap<String, T>>,
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// 插入或覆盖
    pub fn insert(&self, id: &str, value: T) {
        self.data.insert(id.to_string(), value);
    }

    /// 仅当 key 不存在时插入，返回是否插入成功
    pub fn insert_if_absent(&self, id: &str, value: T) -> bool {
        match self.data.entry(id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// 返回数据的克隆，不持有锁
    pub fn get(&self, id: &str) -> Option<T> {
        self.data.get(id).map(|v| v.clone())
    }

    /// 仅当 key 存在时覆盖，返回是否存在
    pub fn replace(&self, id: &str, value: T) -> bool {
        match self.data.get_mut(id) {
            Some(mut entry) => {
                *entry = value;
                true
            }
            None => false,
        }
    }

    /// 条件更新
    ///
    /// `update` 在持有该 key 的写锁时执行，返回 false 表示不修改；
    /// 成功时返回更新后的克隆
    pub fn update_if<F>(&self, id: &str, update: F) -> Option<T>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let mut entry = self.data.get_mut(id)?;
        if update(entry.value_mut()) {
            Some(entry.value().clone())
        } else {
            None
        }
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        self.data.remove(id).map(|(_, v)| v)
    }

    /// 按条件筛选数据
    pub fn list_by<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.data
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl<T: Clone> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}
