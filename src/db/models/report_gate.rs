use chrono::{DateTime, Utc};

/// Singleton row recording when the last admin report went out
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportGate {
    pub gate_key: i64,
    pub last_sent: DateTime<Utc>,
}
