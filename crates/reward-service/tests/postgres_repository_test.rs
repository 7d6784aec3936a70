//! PostgreSQL 仓储集成测试
//!
//! 需要数据库连接：DATABASE_URL=... cargo test -- --ignored

use chrono::Utc;

use reward_service::models::new_id;
use reward_service::repository::{EventRepository, RewardRequestRepository};
use reward_service::{Event, EventStatus, RewardRequest, RewardRequestStatus};
use reward_shared::config::DatabaseConfig;
use reward_shared::database::Database;

async fn setup() -> Database {
    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL").unwrap_or_else(|_| DatabaseConfig::default().url),
        ..Default::default()
    };
    let db = Database::connect(&config).await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

fn sample_event() -> Event {
    let now = Utc::now();
    Event {
        id: new_id(),
        name: "集成测试活动".to_string(),
        description: None,
        condition: None,
        start_date: now,
        end_date: now + chrono::Duration::days(1),
        status: EventStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_pending_uniqueness_and_transition() {
    let db = setup().await;
    let events = EventRepository::new(db.pool().clone());
    let requests = RewardRequestRepository::new(db.pool().clone());

    let event = sample_event();
    events.create(&event).await.unwrap();

    let user_id = format!("pg-user-{}", new_id());
    let first = RewardRequest::new_pending(new_id(), &user_id, &event.id, Utc::now());
    assert!(requests.create_pending(&first).await.unwrap());

    let duplicate = RewardRequest::new_pending(new_id(), &user_id, &event.id, Utc::now());
    assert!(!requests.create_pending(&duplicate).await.unwrap());

    let approved = requests
        .transition_status(&first.id, RewardRequestStatus::Approved, Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, RewardRequestStatus::Approved);

    // 已是终态，比较并设置不再命中
    assert!(
        requests
            .transition_status(&first.id, RewardRequestStatus::Rejected, Utc::now())
            .await
            .unwrap()
            .is_none()
    );

    // 原申请终结后允许再次申请
    assert!(requests.create_pending(&duplicate).await.unwrap());

    db.close().await;
}
