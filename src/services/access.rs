use std::sync::Arc;

use crate::services::registry::UserRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Blocked,
}

/// Gates every inbound request before any work happens. A blocked verdict
/// means the caller replies with the fixed denial text and performs no
/// registry mutation, so the user's last legitimate activity stays intact.
pub struct AccessControl {
    registry: Arc<UserRegistry>,
}

impl AccessControl {
    pub fn new(registry: Arc<UserRegistry>) -> Self {
        Self { registry }
    }

    pub async fn check(&self, user_id: i64) -> Result<Access, sqlx::Error> {
        if self.registry.is_blocked(user_id).await? {
            Ok(Access::Blocked)
        } else {
            Ok(Access::Allowed)
        }
    }
}
