use crate::models::{CampaignStatus, ProcessStatus};
use sqlx::SqliteConnection;

pub async fn find(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
) -> Result<Option<ProcessStatus>, sqlx::Error> {
    sqlx::query_as::<_, ProcessStatus>(
        "SELECT * FROM process_statuses WHERE creator = ? AND campaign_index = ?",
    )
    .bind(creator)
    .bind(campaign_index)
    .fetch_optional(conn)
    .await
}

/// Upsert the derived status, preserving any previously recorded mint.
pub async fn upsert_status(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
    status: CampaignStatus,
    updated_at: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO process_statuses (creator, campaign_index, status, mint, updated_at)
        VALUES (?, ?, ?, NULL, ?)
        ON CONFLICT(creator, campaign_index)
        DO UPDATE SET status = excluded.status, updated_at = excluded.updated_at
        "#,
    )
    .bind(creator)
    .bind(campaign_index)
    .bind(status)
    .bind(updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Terminal transition written by the CampaignTokenCreated handler only.
pub async fn set_completed(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
    mint: &str,
    updated_at: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO process_statuses (creator, campaign_index, status, mint, updated_at)
        VALUES (?, ?, 'COMPLETED', ?, ?)
        ON CONFLICT(creator, campaign_index)
        DO UPDATE SET status = 'COMPLETED', mint = excluded.mint, updated_at = excluded.updated_at
        "#,
    )
    .bind(creator)
    .bind(campaign_index)
    .bind(mint)
    .bind(updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_pending(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<ProcessStatus>, sqlx::Error> {
    sqlx::query_as::<_, ProcessStatus>(
        "SELECT * FROM process_statuses WHERE status = 'PENDING' ORDER BY updated_at ASC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(conn)
    .await
}

pub async fn delete(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM process_statuses WHERE creator = ? AND campaign_index = ?")
        .bind(creator)
        .bind(campaign_index)
        .execute(conn)
        .await?;
    Ok(())
}
