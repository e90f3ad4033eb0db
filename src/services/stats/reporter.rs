use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::db::models::UserRecord;
use crate::services::activity::{ActivityTracker, LivenessCounts};
use crate::services::registry::UserRegistry;

/// Aggregate usage snapshot handed to the administrator
#[derive(Debug, Clone)]
pub struct UsageReport {
    pub counts: LivenessCounts,
    pub users: Vec<UserRecord>,
}

#[derive(Debug)]
pub enum ReportOutcome {
    /// Caller is not the configured administrator; no state changed
    Unauthorized,
    /// Inside the cooldown window; no state changed
    Throttled,
    Ready(UsageReport),
}

/// Administrator-only usage report behind the persisted cooldown gate
pub struct StatsReporter {
    registry: Arc<UserRegistry>,
    tracker: Arc<ActivityTracker>,
    admin_id: Option<i64>,
    cooldown: Duration,
}

impl StatsReporter {
    pub fn new(
        registry: Arc<UserRegistry>,
        tracker: Arc<ActivityTracker>,
        admin_id: Option<i64>,
        cooldown_seconds: u64,
    ) -> Self {
        Self {
            registry,
            tracker,
            admin_id,
            cooldown: Duration::seconds(cooldown_seconds as i64),
        }
    }

    pub async fn report(
        &self,
        caller_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ReportOutcome, sqlx::Error> {
        if self.admin_id != Some(caller_id) {
            return Ok(ReportOutcome::Unauthorized);
        }

        // Claim the gate before computing anything so two near-simultaneous
        // admin calls cannot both pass
        if !self.registry.claim_report_slot(now, self.cooldown).await? {
            return Ok(ReportOutcome::Throttled);
        }

        let counts = self.tracker.liveness(now).await?;
        let users = self.registry.list_users().await?;

        Ok(ReportOutcome::Ready(UsageReport { counts, users }))
    }
}
