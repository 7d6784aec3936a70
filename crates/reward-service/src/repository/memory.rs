//! 内存仓储实现
//!
//! 与 PostgreSQL 实现保持相同的排序和原子性语义，用于集成测试和无数据库的本地开发

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::memory_store::MemoryStore;
use super::traits::{
    EventRepositoryTrait, EventRewardRepositoryTrait, RewardFilter, RewardRepositoryTrait,
    RewardRequestFilter, RewardRequestRepositoryTrait,
};
use crate::error::Result;
use crate::models::{
    Event, EventReward, EventStatus, Reward, RewardRequest, RewardRequestStatus,
};
use crate::pagination::{CursorQuery, Window};

/// 偏移分页：created_at DESC, id DESC
fn offset_window<T, K>(mut items: Vec<T>, window: Window, key: K) -> Vec<T>
where
    K: Fn(&T) -> (DateTime<Utc>, String),
{
    items.sort_by_key(|item| Reverse(key(item)));
    items
        .into_iter()
        .skip(window.offset.max(0) as usize)
        .take(window.limit.max(0) as usize)
        .collect()
}

/// 游标分页：id ASC，严格大于 after_id
fn cursor_window<T, K>(mut items: Vec<T>, query: &CursorQuery, id: K) -> Vec<T>
where
    K: Fn(&T) -> &str,
{
    if let Some(after) = query.after_id.as_deref() {
        items.retain(|item| id(item) > after);
    }
    items.sort_by(|a, b| id(a).cmp(id(b)));
    items.truncate(query.fetch_limit.max(0) as usize);
    items
}

// ==================== 活动 ====================

#[derive(Default, Clone)]
pub struct MemoryEventRepository {
    events: MemoryStore<Event>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepositoryTrait for MemoryEventRepository {
    async fn create(&self, event: &Event) -> Result<()> {
        self.events.insert(&event.id, event.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.events.get(id))
    }

    async fn update(&self, event: &Event) -> Result<bool> {
        Ok(self.events.replace(&event.id, event.clone()))
    }

    async fn list(&self, status: Option<EventStatus>, window: Window) -> Result<Vec<Event>> {
        let events = self
            .events
            .list_by(|e| status.is_none_or(|s| e.status == s));
        Ok(offset_window(events, window, |e| (e.created_at, e.id.clone())))
    }

    async fn count(&self, status: Option<EventStatus>) -> Result<u64> {
        let events = self
            .events
            .list_by(|e| status.is_none_or(|s| e.status == s));
        Ok(events.len() as u64)
    }
}

// ==================== 奖励 ====================

#[derive(Default, Clone)]
pub struct MemoryRewardRepository {
    rewards: MemoryStore<Reward>,
}

impl MemoryRewardRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RewardRepositoryTrait for MemoryRewardRepository {
    async fn create(&self, reward: &Reward) -> Result<()> {
        self.rewards.insert(&reward.id, reward.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Reward>> {
        Ok(self.rewards.get(id))
    }

    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Reward>> {
        let mut rewards: Vec<Reward> = ids.iter().filter_map(|id| self.rewards.get(id)).collect();
        rewards.sort_by(|a, b| a.id.cmp(&b.id));
        rewards.dedup_by(|a, b| a.id == b.id);
        Ok(rewards)
    }

    async fn list(&self, filter: &RewardFilter, window: Window) -> Result<Vec<Reward>> {
        let rewards = self.rewards.list_by(|r| filter.matches(r));
        Ok(offset_window(rewards, window, |r| (r.created_at, r.id.clone())))
    }

    async fn count(&self, filter: &RewardFilter) -> Result<u64> {
        Ok(self.rewards.list_by(|r| filter.matches(r)).len() as u64)
    }

    async fn list_after(&self, filter: &RewardFilter, query: &CursorQuery) -> Result<Vec<Reward>> {
        let rewards = self.rewards.list_by(|r| filter.matches(r));
        Ok(cursor_window(rewards, query, |r| r.id.as_str()))
    }
}

// ==================== 活动奖励关联 ====================

#[derive(Default, Clone)]
pub struct MemoryEventRewardRepository {
    links: MemoryStore<EventReward>,
}

impl MemoryEventRewardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn link_key(event_id: &str, reward_id: &str) -> String {
        format!("{event_id}\u{0}{reward_id}")
    }
}

#[async_trait]
impl EventRewardRepositoryTrait for MemoryEventRewardRepository {
    async fn add_link(
        &self,
        event_id: &str,
        reward_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<bool> {
        let link = EventReward {
            event_id: event_id.to_string(),
            reward_id: reward_id.to_string(),
            created_at,
        };
        Ok(self
            .links
            .insert_if_absent(&Self::link_key(event_id, reward_id), link))
    }

    async fn remove_link(&self, event_id: &str, reward_id: &str) -> Result<bool> {
        Ok(self
            .links
            .remove(&Self::link_key(event_id, reward_id))
            .is_some())
    }

    async fn list_reward_ids(&self, event_id: &str) -> Result<Vec<String>> {
        let mut links = self.links.list_by(|l| l.event_id == event_id);
        links.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.reward_id.cmp(&b.reward_id))
        });
        Ok(links.into_iter().map(|l| l.reward_id).collect())
    }
}

// ==================== 奖励申请 ====================

/// 内存奖励申请仓储
///
/// `pending` 索引记录每个 (user_id, event_id) 当前的 PENDING 申请 id。
/// 创建和状态流转都先锁索引条目再写申请记录，锁顺序一致
#[derive(Default, Clone)]
pub struct MemoryRewardRequestRepository {
    requests: MemoryStore<RewardRequest>,
    pending: std::sync::Arc<DashMap<(String, String), String>>,
}

impl MemoryRewardRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RewardRequestRepositoryTrait for MemoryRewardRequestRepository {
    async fn create_pending(&self, request: &RewardRequest) -> Result<bool> {
        let key = (request.user_id.clone(), request.event_id.clone());
        match self.pending.entry(key) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                let mut stored = request.clone();
                stored.status = RewardRequestStatus::Pending;
                self.requests.insert(&request.id, stored);
                slot.insert(request.id.clone());
                Ok(true)
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<RewardRequest>> {
        Ok(self.requests.get(id))
    }

    async fn list(
        &self,
        filter: &RewardRequestFilter,
        window: Window,
    ) -> Result<Vec<RewardRequest>> {
        let requests = self.requests.list_by(|r| filter.matches(r));
        Ok(offset_window(requests, window, |r| (r.created_at, r.id.clone())))
    }

    async fn count(&self, filter: &RewardRequestFilter) -> Result<u64> {
        Ok(self.requests.list_by(|r| filter.matches(r)).len() as u64)
    }

    async fn list_after(
        &self,
        filter: &RewardRequestFilter,
        query: &CursorQuery,
    ) -> Result<Vec<RewardRequest>> {
        let requests = self.requests.list_by(|r| filter.matches(r));
        Ok(cursor_window(requests, query, |r| r.id.as_str()))
    }

    async fn transition_status(
        &self,
        id: &str,
        to: RewardRequestStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<RewardRequest>> {
        let Some(current) = self.requests.get(id) else {
            return Ok(None);
        };

        let slot = self
            .pending
            .entry((current.user_id.clone(), current.event_id.clone()));

        let updated = self.requests.update_if(id, |request| {
            if request.status != RewardRequestStatus::Pending {
                return false;
            }
            request.status = to;
            request.updated_at = updated_at;
            true
        });

        if updated.is_some()
            && let Entry::Occupied(entry) = slot
            && entry.get() == id
        {
            entry.remove();
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::new_id;
    use crate::pagination::{CursorPage, CursorParams, OffsetPage, OffsetParams};
    use chrono::Duration;

    fn request(user: &str, event: &str) -> RewardRequest {
        RewardRequest::new_pending(new_id(), user, event, Utc::now())
    }

    #[tokio::test]
    async fn test_create_pending_rejects_second_pending() {
        let repo = MemoryRewardRequestRepository::new();

        let first = request("u-1", "e-1");
        assert!(repo.create_pending(&first).await.unwrap());
        let stored = repo.get(&first.id).await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.status, RewardRequestStatus::Pending);
        assert!(!repo.create_pending(&request("u-1", "e-1")).await.unwrap());
        // 其他活动不受影响
        assert!(repo.create_pending(&request("u-1", "e-2")).await.unwrap());

        // 流转到终态后可以再次申请
        repo.transition_status(&first.id, RewardRequestStatus::Rejected, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert!(repo.create_pending(&request("u-1", "e-1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_transition_only_from_pending() {
        let repo = MemoryRewardRequestRepository::new();
        let req = request("u-1", "e-1");
        repo.create_pending(&req).await.unwrap();

        let approved = repo
            .transition_status(&req.id, RewardRequestStatus::Approved, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(approved.status, RewardRequestStatus::Approved);

        let again = repo
            .transition_status(&req.id, RewardRequestStatus::Rejected, Utc::now())
            .await
            .unwrap();
        assert!(again.is_none());
        assert_eq!(
            repo.get(&req.id).await.unwrap().unwrap().status,
            RewardRequestStatus::Approved
        );

        assert!(
            repo.transition_status("missing", RewardRequestStatus::Approved, Utc::now())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_offset_listing_is_newest_first() {
        let repo = MemoryRewardRequestRepository::new();
        let base = Utc::now();
        for i in 0..5 {
            let mut req = request(&format!("u-{i}"), "e-1");
            req.created_at = base + Duration::seconds(i);
            repo.create_pending(&req).await.unwrap();
        }

        let filter = RewardRequestFilter::default();
        let params = OffsetParams::new(0, 2);
        let items = repo.list(&filter, params.window()).await.unwrap();
        let page = OffsetPage::new(items, repo.count(&filter).await.unwrap(), params);

        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].user_id, "u-4");
        assert_eq!(page.items[1].user_id, "u-3");
    }

    #[tokio::test]
    async fn test_cursor_listing_walks_all_items_once() {
        let repo = MemoryRewardRequestRepository::new();
        let mut ids = Vec::new();
        for i in 0..7 {
            let req = request(&format!("u-{i}"), "e-1");
            ids.push(req.id.clone());
            repo.create_pending(&req).await.unwrap();
        }

        let filter = RewardRequestFilter::default();
        let mut cursor: Option<String> = None;
        let mut seen = Vec::new();
        loop {
            let params = CursorParams::new(cursor.as_deref(), Some(3));
            let items = repo.list_after(&filter, &params.query()).await.unwrap();
            let page = CursorPage::from_overfetched(items, params.limit);
            seen.extend(page.items.iter().map(|r| r.id.clone()));
            if !page.has_more {
                break;
            }
            cursor = page.next_cursor;
        }

        assert_eq!(seen, ids);
    }

    #[tokio::test]
    async fn test_links_are_unique_pairs() {
        let repo = MemoryEventRewardRepository::new();
        let now = Utc::now();

        assert!(repo.add_link("e-1", "r-1", now).await.unwrap());
        assert!(!repo.add_link("e-1", "r-1", now).await.unwrap());
        assert!(repo.add_link("e-1", "r-2", now).await.unwrap());
        assert!(repo.add_link("e-2", "r-1", now).await.unwrap());

        assert_eq!(
            repo.list_reward_ids("e-1").await.unwrap(),
            vec!["r-1".to_string(), "r-2".to_string()]
        );

        assert!(repo.remove_link("e-1", "r-1").await.unwrap());
        assert!(!repo.remove_link("e-1", "r-1").await.unwrap());
        assert_eq!(repo.list_reward_ids("e-1").await.unwrap(), vec!["r-2"]);
    }
}
