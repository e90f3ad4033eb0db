use std::env;
use std::path::PathBuf;

use crate::constants::tuning::{
    DEFAULT_DATABASE_URL, DEFAULT_DOWNLOAD_DIR, DEFAULT_EXTRACT_TIMEOUT_SECONDS,
    DEFAULT_ONLINE_WINDOW_SECONDS, DEFAULT_REPORT_COOLDOWN_SECONDS, DEFAULT_YTDLP_BIN,
};

#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_token: String,
    pub database_url: String,
    /// Telegram user id of the single privileged administrator.
    /// When unset, the stats and block commands refuse every caller.
    pub admin_id: Option<i64>,
    /// Activity within this window classifies a user as online
    pub online_window_seconds: u64,
    /// Minimum interval between admin stats reports (0 = no cooldown)
    pub report_cooldown_seconds: u64,
    /// Root directory for per-request download artifacts
    pub download_dir: PathBuf,
    pub ytdlp_bin: String,
    /// Upper bound on a single extraction run
    pub extract_timeout_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let bot_token =
            env::var("BOT_TOKEN").map_err(|_| "BOT_TOKEN environment variable not set")?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let admin_id = env::var("ADMIN_ID")
            .ok()
            .and_then(|s| s.parse::<i64>().ok());

        let online_window_seconds = env::var("ONLINE_WINDOW_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ONLINE_WINDOW_SECONDS);

        let report_cooldown_seconds = env::var("REPORT_COOLDOWN_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_REPORT_COOLDOWN_SECONDS);

        let download_dir = env::var("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DOWNLOAD_DIR));

        let ytdlp_bin = env::var("YTDLP_BIN").unwrap_or_else(|_| DEFAULT_YTDLP_BIN.to_string());

        let extract_timeout_seconds = env::var("EXTRACT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_EXTRACT_TIMEOUT_SECONDS);

        Ok(Self {
            bot_token,
            database_url,
            admin_id,
            online_window_seconds,
            report_cooldown_seconds,
            download_dir,
            ytdlp_bin,
            extract_timeout_seconds,
        })
    }
}
