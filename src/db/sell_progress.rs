use crate::models::SellProgress;
use sqlx::SqliteConnection;

pub async fn find(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
) -> Result<Option<SellProgress>, sqlx::Error> {
    sqlx::query_as::<_, SellProgress>(
        "SELECT * FROM sell_progresses WHERE creator = ? AND campaign_index = ?",
    )
    .bind(creator)
    .bind(campaign_index)
    .fetch_optional(conn)
    .await
}

pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<SellProgress>, sqlx::Error> {
    sqlx::query_as::<_, SellProgress>("SELECT * FROM sell_progresses").fetch_all(conn).await
}

/// First ClaimableAmountUpdated event creates the row; later ones refresh it.
pub async fn upsert(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
    mint: &str,
    claimable_amount: f64,
    market_cap: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO sell_progresses (creator, campaign_index, mint, claimable_amount, market_cap)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(creator, campaign_index)
        DO UPDATE SET mint = excluded.mint,
                      claimable_amount = excluded.claimable_amount,
                      market_cap = excluded.market_cap
        "#,
    )
    .bind(creator)
    .bind(campaign_index)
    .bind(mint)
    .bind(claimable_amount)
    .bind(market_cap)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn set_claimable_amount(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
    claimable_amount: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE sell_progresses SET claimable_amount = ? WHERE creator = ? AND campaign_index = ?",
    )
    .bind(claimable_amount)
    .bind(creator)
    .bind(campaign_index)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn delete(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sell_progresses WHERE creator = ? AND campaign_index = ?")
        .bind(creator)
        .bind(campaign_index)
        .execute(conn)
        .await?;
    Ok(())
}
