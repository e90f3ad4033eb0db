use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::db::models::UserRecord;
use crate::db::queries::{report_gate, users};

/// Durable per-user store. Owns the pool; every read and write of user state
/// goes through here, shared across all request-handling tasks.
///
/// Row-level atomicity comes from single-statement upserts: concurrent
/// requests for the same user are last-write-wins on `last_active`, and
/// normal traffic never writes `blocked`.
pub struct UserRegistry {
    pool: SqlitePool,
}

impl UserRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the record if absent (unblocked, `last_active = first_seen`);
    /// otherwise refresh only the display name. Idempotent.
    pub async fn upsert(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_seen: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        users::upsert(&self.pool, user_id, username, first_seen).await
    }

    /// Refresh `last_active`; silently a no-op for unknown ids
    pub async fn touch(&self, user_id: i64, at: DateTime<Utc>) -> Result<(), sqlx::Error> {
        users::touch(&self.pool, user_id, at).await
    }

    pub async fn get(&self, user_id: i64) -> Result<Option<UserRecord>, sqlx::Error> {
        users::get(&self.pool, user_id).await
    }

    pub async fn is_blocked(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        users::is_blocked(&self.pool, user_id).await
    }

    /// Out-of-band administrative toggle; returns whether a row existed
    pub async fn set_blocked(&self, user_id: i64, blocked: bool) -> Result<bool, sqlx::Error> {
        users::set_blocked(&self.pool, user_id, blocked).await
    }

    pub async fn count_total(&self) -> Result<i64, sqlx::Error> {
        users::count_total(&self.pool).await
    }

    pub async fn count_blocked(&self) -> Result<i64, sqlx::Error> {
        users::count_blocked(&self.pool).await
    }

    pub async fn count_active(&self) -> Result<i64, sqlx::Error> {
        users::count_active(&self.pool).await
    }

    /// Unblocked users whose `last_active` falls within `window` of `now`
    pub async fn count_online(
        &self,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<i64, sqlx::Error> {
        users::count_online(&self.pool, now - window).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, sqlx::Error> {
        users::list_all(&self.pool).await
    }

    /// Claim the report-cooldown gate; see `db::queries::report_gate::claim`
    pub async fn claim_report_slot(
        &self,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> Result<bool, sqlx::Error> {
        report_gate::claim(&self.pool, now, cooldown).await
    }

    pub async fn last_report_at(&self) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        Ok(report_gate::get(&self.pool).await?.map(|g| g.last_sent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::run_migrations;
    use chrono::TimeZone;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_registry() -> UserRegistry {
        // One connection: each in-memory sqlite connection is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        UserRegistry::new(pool)
    }

    fn t(secs_past_epoch: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs_past_epoch, 0).unwrap()
    }

    #[tokio::test]
    async fn upsert_creates_unblocked_record() {
        let registry = memory_registry().await;

        registry.upsert(42, Some("alice"), t(0)).await.unwrap();

        let record = registry.get(42).await.unwrap().unwrap();
        assert_eq!(record.user_id, 42);
        assert_eq!(record.username.as_deref(), Some("alice"));
        assert!(!record.blocked);
        assert_eq!(record.last_active, t(0));
    }

    #[tokio::test]
    async fn upsert_never_resets_blocked() {
        let registry = memory_registry().await;

        registry.upsert(42, Some("alice"), t(0)).await.unwrap();
        assert!(registry.set_blocked(42, true).await.unwrap());

        registry.upsert(42, Some("alice2"), t(10)).await.unwrap();

        let record = registry.get(42).await.unwrap().unwrap();
        assert!(record.blocked);
        assert_eq!(record.username.as_deref(), Some("alice2"));
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let registry = memory_registry().await;

        registry.upsert(42, Some("alice"), t(0)).await.unwrap();
        let before = registry.get(42).await.unwrap().unwrap();

        registry.upsert(42, Some("alice"), t(99)).await.unwrap();
        let after = registry.get(42).await.unwrap().unwrap();

        assert_eq!(registry.count_total().await.unwrap(), 1);
        assert_eq!(before.username, after.username);
        assert_eq!(before.blocked, after.blocked);
        // last_active only moves via touch
        assert_eq!(before.last_active, after.last_active);
    }

    #[tokio::test]
    async fn upsert_without_username_keeps_previous_name() {
        let registry = memory_registry().await;

        registry.upsert(42, Some("alice"), t(0)).await.unwrap();
        registry.upsert(42, None, t(5)).await.unwrap();

        let record = registry.get(42).await.unwrap().unwrap();
        assert_eq!(record.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn touch_refreshes_last_active() {
        let registry = memory_registry().await;

        registry.upsert(42, None, t(0)).await.unwrap();
        registry.touch(42, t(60)).await.unwrap();

        let record = registry.get(42).await.unwrap().unwrap();
        assert_eq!(record.last_active, t(60));
    }

    #[tokio::test]
    async fn touch_unknown_user_is_a_noop() {
        let registry = memory_registry().await;

        registry.touch(7, t(0)).await.unwrap();

        assert_eq!(registry.count_total().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_user_is_not_blocked() {
        let registry = memory_registry().await;

        assert!(!registry.is_blocked(7).await.unwrap());
    }

    #[tokio::test]
    async fn set_blocked_reports_missing_rows() {
        let registry = memory_registry().await;

        assert!(!registry.set_blocked(99, true).await.unwrap());
    }

    #[tokio::test]
    async fn counts_add_up() {
        let registry = memory_registry().await;

        for id in 1..=5 {
            registry.upsert(id, None, t(0)).await.unwrap();
        }
        registry.set_blocked(1, true).await.unwrap();
        registry.set_blocked(2, true).await.unwrap();

        let total = registry.count_total().await.unwrap();
        let blocked = registry.count_blocked().await.unwrap();
        let active = registry.count_active().await.unwrap();

        assert_eq!(total, 5);
        assert_eq!(total, blocked + active);
    }

    #[tokio::test]
    async fn online_count_respects_window() {
        let registry = memory_registry().await;
        let now = t(600);

        registry.upsert(1, None, t(0)).await.unwrap();
        registry.touch(1, now).await.unwrap();
        registry.upsert(2, None, t(0)).await.unwrap(); // 10 minutes stale

        let window = Duration::seconds(300);
        let online = registry.count_online(now, window).await.unwrap();
        let active = registry.count_active().await.unwrap();
        let total = registry.count_total().await.unwrap();

        assert_eq!(online, 1);
        assert!(online <= active && active <= total);
    }

    #[tokio::test]
    async fn blocking_a_recent_user_keeps_online_within_active() {
        let registry = memory_registry().await;
        let now = t(0);

        registry.upsert(1, None, now).await.unwrap();
        registry.upsert(2, None, now).await.unwrap();
        registry.set_blocked(2, true).await.unwrap();

        let window = Duration::seconds(300);
        let online = registry.count_online(now, window).await.unwrap();
        let active = registry.count_active().await.unwrap();

        assert_eq!(online, 1);
        assert!(online <= active);
    }

    #[tokio::test]
    async fn report_slot_claims_once_per_cooldown() {
        let registry = memory_registry().await;
        let cooldown = Duration::hours(24);

        // Scenario: two invocations one second apart under a 24h cooldown
        assert!(registry.claim_report_slot(t(0), cooldown).await.unwrap());
        assert!(!registry.claim_report_slot(t(1), cooldown).await.unwrap());
        assert_eq!(registry.last_report_at().await.unwrap(), Some(t(0)));

        // After the cooldown elapses the gate opens again
        let later = t(0) + cooldown;
        assert!(registry.claim_report_slot(later, cooldown).await.unwrap());
        assert_eq!(registry.last_report_at().await.unwrap(), Some(later));
    }

    #[tokio::test]
    async fn zero_cooldown_never_throttles() {
        let registry = memory_registry().await;

        assert!(registry
            .claim_report_slot(t(0), Duration::zero())
            .await
            .unwrap());
        assert!(registry
            .claim_report_slot(t(0), Duration::zero())
            .await
            .unwrap());
    }
}
