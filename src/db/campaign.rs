use crate::models::Campaign;
use sqlx::SqliteConnection;

pub async fn insert(conn: &mut SqliteConnection, campaign: &Campaign) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO campaigns
        (creator, campaign_index, name, symbol, metadata_uri, donation_goal,
         deposit_deadline, trade_deadline, created_at, total_fund_raised, mint,
         last_donation_timestamp)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&campaign.creator)
    .bind(campaign.campaign_index)
    .bind(&campaign.name)
    .bind(&campaign.symbol)
    .bind(&campaign.metadata_uri)
    .bind(campaign.donation_goal)
    .bind(campaign.deposit_deadline)
    .bind(campaign.trade_deadline)
    .bind(campaign.created_at)
    .bind(campaign.total_fund_raised)
    .bind(&campaign.mint)
    .bind(campaign.last_donation_timestamp)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
) -> Result<Option<Campaign>, sqlx::Error> {
    sqlx::query_as::<_, Campaign>(
        "SELECT * FROM campaigns WHERE creator = ? AND campaign_index = ?",
    )
    .bind(creator)
    .bind(campaign_index)
    .fetch_optional(conn)
    .await
}

pub async fn all(conn: &mut SqliteConnection) -> Result<Vec<Campaign>, sqlx::Error> {
    sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns ORDER BY creator, campaign_index")
        .fetch_all(conn)
        .await
}

pub async fn set_total_fund_raised(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
    total_fund_raised: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE campaigns SET total_fund_raised = ? WHERE creator = ? AND campaign_index = ?",
    )
    .bind(total_fund_raised)
    .bind(creator)
    .bind(campaign_index)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn add_donation(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
    amount: i64,
    donated_at: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE campaigns
        SET total_fund_raised = total_fund_raised + ?, last_donation_timestamp = ?
        WHERE creator = ? AND campaign_index = ?
        "#,
    )
    .bind(amount)
    .bind(donated_at)
    .bind(creator)
    .bind(campaign_index)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn set_mint(
    conn: &mut SqliteConnection,
    creator: &str,
    campaign_index: i64,
    mint: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE campaigns SET mint = ? WHERE creator = ? AND campaign_index = ?")
        .bind(mint)
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
    sqlx::query("DELETE FROM campaigns WHERE creator = ? AND campaign_index = ?")
        .bind(creator)
        .bind(campaign_index)
        .execute(conn)
        .await?;
    Ok(())
}
