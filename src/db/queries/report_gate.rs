use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::db::models::ReportGate;

/// Atomically claim the right to emit a report.
///
/// The check-then-update runs as a single guarded upsert so two concurrent
/// administrator calls can never both pass the cooldown. Returns `true` when
/// the slot was claimed (and `last_sent` recorded), `false` when the previous
/// report is still within the cooldown.
pub async fn claim(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Result<bool, sqlx::Error> {
    let cutoff = now - cooldown;

    let result = sqlx::query(
        r#"
        INSERT INTO report_gate (gate_key, last_sent)
        VALUES (0, ?)
        ON CONFLICT(gate_key) DO UPDATE SET
            last_sent = excluded.last_sent
        WHERE report_gate.last_sent <= ?
        "#,
    )
    .bind(now)
    .bind(cutoff)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get(pool: &SqlitePool) -> Result<Option<ReportGate>, sqlx::Error> {
    sqlx::query_as::<_, ReportGate>("SELECT * FROM report_gate WHERE gate_key = 0")
        .fetch_optional(pool)
        .await
}
