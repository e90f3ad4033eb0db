//! Fixed user-facing reply texts.
//!
//! End users only ever see these strings; detailed failure causes go to the
//! operator logs.

pub const GREETING: &str =
    "🎬 Send me any video link from TikTok, Twitter, Snapchat, Facebook and I'll fetch it for you!";

pub const DOWNLOADING: &str = "📥 Downloading your video... Please wait.";

pub const DOWNLOAD_FAILED: &str =
    "❌ Could not download the video. Please check the link and try again.";

pub const BLOCKED: &str = "🚫 You're blocked from using this bot.";

pub const ADMIN_ONLY: &str = "❌ Admin access only.";

pub const REPORT_THROTTLED: &str = "⏳ Stats were sent recently. Try again later.";

pub const GENERIC_ERROR: &str = "⚠️ Something went wrong. Please try again.";
