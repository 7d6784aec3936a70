//! 活动服务
//!
//! 活动的创建、更新与查询，同时作为奖励关联和奖励申请校验活动存在性的依据

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::error::{Result, RewardError};
use crate::models::{Event, new_id};
use crate::pagination::OffsetPage;
use crate::repository::EventRepositoryTrait;
use crate::service::dto::{CreateEventDto, EventQueryDto, UpdateEventDto};

fn check_period(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end < start {
        return Err(RewardError::Validation(format!(
            "活动结束时间 {end} 早于开始时间 {start}"
        )));
    }
    Ok(())
}

pub struct EventService {
    event_repo: Arc<dyn EventRepositoryTrait>,
}

impl EventService {
    pub fn new(event_repo: Arc<dyn EventRepositoryTrait>) -> Self {
        Self { event_repo }
    }

    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn create_event(&self, dto: CreateEventDto) -> Result<Event> {
        check_period(dto.start_date, dto.end_date)?;

        let now = Utc::now();
        let event = Event {
            id: new_id(),
            name: dto.name,
            description: dto.description,
            condition: dto.condition,
            start_date: dto.start_date,
            end_date: dto.end_date,
            status: dto.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.event_repo.create(&event).await?;

        info!(event_id = %event.id, status = %event.status.as_str(), "Event created");
        Ok(event)
    }

    pub async fn get_event_by_id(&self, id: &str) -> Result<Event> {
        self.event_repo
            .get(id)
            .await?
            .ok_or_else(|| RewardError::EventNotFound(id.to_string()))
    }

    #[instrument(skip(self, dto), fields(event_id = %dto.id))]
    pub async fn update_event(&self, dto: UpdateEventDto) -> Result<Event> {
        let mut event = self.get_event_by_id(&dto.id).await?;

        if let Some(name) = dto.name {
            event.name = name;
        }
        if let Some(description) = dto.description {
            event.description = Some(description);
        }
        if let Some(condition) = dto.condition {
            event.condition = Some(condition);
        }
        if let Some(start_date) = dto.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = dto.end_date {
            event.end_date = end_date;
        }
        if let Some(status) = dto.status {
            event.status = status;
        }
        check_period(event.start_date, event.end_date)?;
        event.updated_at = Utc::now();

        if !self.event_repo.update(&event).await? {
            return Err(RewardError::EventNotFound(dto.id));
        }

        info!(status = %event.status.as_str(), "Event updated");
        Ok(event)
    }

    pub async fn get_events(&self, query: EventQueryDto) -> Result<OffsetPage<Event>> {
        let params = query.params();
        let items = self.event_repo.list(query.status, params.window()).await?;
        let total = self.event_repo.count(query.status).await?;
        Ok(OffsetPage::new(items, total, params))
    }
}
