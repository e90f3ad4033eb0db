use chrono::{DateTime, Utc};

/// One row per end-user identity, created lazily on first contact and
/// never deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub user_id: i64,
    /// Advisory display name, refreshed whenever the user provides one
    pub username: Option<String>,
    /// Only flipped by the out-of-band admin path, never by normal traffic
    pub blocked: bool,
    pub last_active: DateTime<Utc>,
}
