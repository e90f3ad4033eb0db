//! Default tunables (can be overridden via env vars)

pub const DEFAULT_DATABASE_URL: &str = "sqlite://clipfetch.db?mode=rwc";

/// Users active within this window count as online in the stats report
pub const DEFAULT_ONLINE_WINDOW_SECONDS: u64 = 5 * 60;

/// 0 means no cooldown between admin stats reports
pub const DEFAULT_REPORT_COOLDOWN_SECONDS: u64 = 0;

pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

pub const DEFAULT_YTDLP_BIN: &str = "yt-dlp";

pub const DEFAULT_EXTRACT_TIMEOUT_SECONDS: u64 = 5 * 60;

/// Format selector passed to yt-dlp
pub const VIDEO_FORMAT: &str = "mp4";
