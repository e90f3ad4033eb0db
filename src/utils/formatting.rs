use teloxide::utils::html::escape;

use crate::services::stats::reporter::UsageReport;

/// Render the admin usage report as Telegram HTML
pub fn render_report(report: &UsageReport) -> String {
    let user_list = if report.users.is_empty() {
        "No users yet.".to_string()
    } else {
        report
            .users
            .iter()
            .map(|u| {
                format!(
                    "{} — @{}",
                    u.user_id,
                    u.username.as_deref().unwrap_or("NoUsername")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "📊 <b>User Statistics</b>\n\
         👥 Total users: <b>{}</b>\n\
         ✅ Active users: <b>{}</b>\n\
         🟢 Online now: <b>{}</b>\n\
         🔘 Offline: <b>{}</b>\n\
         🚫 Blocked: <b>{}</b>\n\n\
         🧾 <b>User List</b>:\n<code>{}</code>",
        report.counts.total,
        report.counts.active,
        report.counts.online,
        report.counts.offline,
        report.counts.blocked,
        escape(&user_list)
    )
}
