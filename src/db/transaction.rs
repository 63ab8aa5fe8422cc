use crate::models::IngestedTransaction;
use sqlx::SqliteConnection;

/// Highest-slot ingested transaction, used as the pagination watermark.
/// Slot ties break toward the most recently recorded row so the watermark
/// always lands on a signature with nothing newer behind it.
pub async fn watermark(
    conn: &mut SqliteConnection,
) -> Result<Option<IngestedTransaction>, sqlx::Error> {
    sqlx::query_as::<_, IngestedTransaction>(
        "SELECT * FROM ingested_transactions ORDER BY block_slot DESC, rowid DESC LIMIT 1",
    )
    .fetch_optional(conn)
    .await
}

pub async fn exists(conn: &mut SqliteConnection, signature: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM ingested_transactions WHERE signature = ?")
            .bind(signature)
            .fetch_optional(conn)
            .await?;
    Ok(row.is_some())
}

/// Signature uniqueness is the at-most-once guarantee: re-recording an
/// already-ingested signature is a no-op.
pub async fn record(
    conn: &mut SqliteConnection,
    signature: &str,
    block_slot: i64,
    block_time: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO ingested_transactions (signature, block_slot, block_time)
        VALUES (?, ?, ?)
        ON CONFLICT(signature) DO NOTHING
        "#,
    )
    .bind(signature)
    .bind(block_slot)
    .bind(block_time)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingested_transactions")
        .fetch_one(conn)
        .await?;
    Ok(count)
}
