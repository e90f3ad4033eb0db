use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::services::registry::UserRegistry;

/// Liveness classification counts at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LivenessCounts {
    pub total: i64,
    pub blocked: i64,
    pub active: i64,
    pub online: i64,
    pub offline: i64,
}

/// Thin policy layer over the registry: records accepted contacts and
/// classifies users as active/blocked/online/offline from their stored
/// timestamps.
pub struct ActivityTracker {
    registry: Arc<UserRegistry>,
    online_window: Duration,
}

impl ActivityTracker {
    pub fn new(registry: Arc<UserRegistry>, online_window_seconds: u64) -> Self {
        Self {
            registry,
            online_window: Duration::seconds(online_window_seconds as i64),
        }
    }

    /// Register an accepted interaction: upsert the record, then refresh
    /// `last_active`. This is the only path that touches a user, and callers
    /// only reach it after the access check passed.
    pub async fn record_contact(
        &self,
        user_id: i64,
        username: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        self.registry.upsert(user_id, username, now).await?;
        self.registry.touch(user_id, now).await
    }

    pub async fn liveness(&self, now: DateTime<Utc>) -> Result<LivenessCounts, sqlx::Error> {
        let total = self.registry.count_total().await?;
        let blocked = self.registry.count_blocked().await?;
        let online = self.registry.count_online(now, self.online_window).await?;
        let active = total - blocked;

        Ok(LivenessCounts {
            total,
            blocked,
            active,
            online,
            offline: active - online,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::run_migrations;
    use chrono::TimeZone;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn tracker_with_window(window_seconds: u64) -> (ActivityTracker, Arc<UserRegistry>) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        let registry = Arc::new(UserRegistry::new(pool));
        (ActivityTracker::new(registry.clone(), window_seconds), registry)
    }

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[tokio::test]
    async fn record_contact_creates_and_touches() {
        let (tracker, registry) = tracker_with_window(300).await;

        tracker.record_contact(42, Some("alice"), t(0)).await.unwrap();
        tracker.record_contact(42, Some("alice"), t(30)).await.unwrap();

        let record = registry.get(42).await.unwrap().unwrap();
        assert_eq!(record.last_active, t(30));
        assert_eq!(registry.count_total().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn liveness_splits_active_into_online_and_offline() {
        let (tracker, registry) = tracker_with_window(300).await;
        let now = t(1000);

        tracker.record_contact(1, None, now).await.unwrap();
        tracker.record_contact(2, None, t(0)).await.unwrap();
        tracker.record_contact(3, None, t(0)).await.unwrap();
        registry.set_blocked(3, true).await.unwrap();

        let counts = tracker.liveness(now).await.unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.blocked, 1);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.online, 1);
        assert_eq!(counts.offline, 1);
        assert_eq!(counts.total, counts.blocked + counts.active);
    }

    #[tokio::test]
    async fn blocking_a_recent_user_never_yields_negative_offline() {
        let (tracker, registry) = tracker_with_window(300).await;
        let now = t(0);

        tracker.record_contact(1, None, now).await.unwrap();
        registry.set_blocked(1, true).await.unwrap();

        let counts = tracker.liveness(now).await.unwrap();
        assert_eq!(counts.active, 0);
        assert_eq!(counts.online, 0);
        assert_eq!(counts.offline, 0);
    }
}
