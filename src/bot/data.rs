use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::config::Settings;
use crate::constants::tuning::VIDEO_FORMAT;
use crate::services::access::AccessControl;
use crate::services::activity::ActivityTracker;
use crate::services::download::extractor::YtDlpExtractor;
use crate::services::download::{DownloadOrchestrator, Extractor};
use crate::services::registry::UserRegistry;
use crate::services::stats::reporter::StatsReporter;

/// Shared services available to all handlers
pub struct Data {
    pub settings: Settings,
    pub registry: Arc<UserRegistry>,
    pub access: AccessControl,
    pub tracker: Arc<ActivityTracker>,
    pub reporter: StatsReporter,
    pub downloads: DownloadOrchestrator,
}

impl Data {
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        let registry = Arc::new(UserRegistry::new(pool));
        let access = AccessControl::new(registry.clone());
        let tracker = Arc::new(ActivityTracker::new(
            registry.clone(),
            settings.online_window_seconds,
        ));
        let reporter = StatsReporter::new(
            registry.clone(),
            tracker.clone(),
            settings.admin_id,
            settings.report_cooldown_seconds,
        );

        let extractor: Arc<dyn Extractor> = Arc::new(YtDlpExtractor::new(
            settings.ytdlp_bin.clone(),
            VIDEO_FORMAT,
            Duration::from_secs(settings.extract_timeout_seconds),
        ));
        let downloads = DownloadOrchestrator::new(extractor, settings.download_dir.clone());

        Self {
            settings,
            registry,
            access,
            tracker,
            reporter,
            downloads,
        }
    }
}
