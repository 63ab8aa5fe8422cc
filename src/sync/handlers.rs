// Per-event state mutation. Each handler runs inside the transactional
// scope of one source transaction; returning an error rolls back every
// effect of that transaction.

use crate::chain::events::{
    corrected_index, CampaignCreated, CampaignTokenCreated, CampaignTokenSold,
    ClaimableAmountUpdated, FundClaimed, FundDonated, TokenClaimed,
};
use crate::chain::pda;
use crate::db;
use crate::error::SyncError;
use crate::models::Campaign;
use crate::state::AppState;
use crate::sync::{claims, status};
use sqlx::SqliteConnection;
use tracing::{info, warn};

/// Insert the new campaign and seed its raised total from the on-chain
/// balance. A missing derived account is fatal for this source transaction:
/// it means the index correction disagrees with the program's encoding.
pub async fn handle_campaign_created(
    state: &AppState,
    conn: &mut SqliteConnection,
    ev: &CampaignCreated,
) -> Result<(), SyncError> {
    let campaign_index = corrected_index(ev.campaign_index);
    let campaign_pda =
        pda::campaign_pda(&state.program_id, &ev.creator, campaign_index as u64);

    let Some(account) = state.client.get_account(&campaign_pda)? else {
        return Err(SyncError::CampaignAccountMissing(campaign_pda.to_string()));
    };
    let rent_reserve = state.client.minimum_balance_for_rent_exemption(account.data.len())?;
    let total_fund_raised = account.lamports.saturating_sub(rent_reserve) as i64;

    let campaign = Campaign {
        creator: ev.creator.to_string(),
        campaign_index,
        name: ev.name.clone(),
        symbol: ev.symbol.clone(),
        metadata_uri: ev.uri.clone(),
        donation_goal: status::lamports_to_units(ev.donation_goal as i64),
        deposit_deadline: ev.deposit_deadline,
        trade_deadline: ev.trade_deadline,
        created_at: ev.timestamp,
        total_fund_raised,
        mint: None,
        last_donation_timestamp: None,
    };
    db::campaign::insert(conn, &campaign).await?;

    info!(
        "Created campaign {}/{} ({}), initial funds {} lamports",
        campaign.creator, campaign.campaign_index, campaign.symbol, total_fund_raised
    );
    Ok(())
}

/// Sole writer of the COMPLETED transition. The issuance job deliberately
/// leaves this to the ledger so two schedulers never race on the same row.
pub async fn handle_token_created(
    conn: &mut SqliteConnection,
    ev: &CampaignTokenCreated,
    now: i64,
) -> Result<(), SyncError> {
    let creator = ev.creator.to_string();
    let campaign_index = corrected_index(ev.campaign_index);

    if db::campaign::find(conn, &creator, campaign_index).await?.is_none() {
        warn!("Token created for unknown campaign {}/{}", creator, campaign_index);
        return Ok(());
    }

    let mint = ev.mint.to_string();
    db::process_status::set_completed(conn, &creator, campaign_index, &mint, now).await?;
    db::campaign::set_mint(conn, &creator, campaign_index, &mint).await?;

    info!("Campaign {}/{} COMPLETED with mint {}", creator, campaign_index, mint);
    Ok(())
}

/// A sold-out campaign leaves the live set entirely.
pub async fn handle_token_sold(
    conn: &mut SqliteConnection,
    ev: &CampaignTokenSold,
) -> Result<(), SyncError> {
    let creator = ev.creator.to_string();
    let campaign_index = corrected_index(ev.campaign_index);

    db::campaign::delete(conn, &creator, campaign_index).await?;
    db::process_status::delete(conn, &creator, campaign_index).await?;
    db::sell_progress::delete(conn, &creator, campaign_index).await?;

    info!("Deleted campaign {}/{} after token sell-out", creator, campaign_index);
    Ok(())
}

/// Recompute the claim figures and refresh (or create) the sell-progress
/// row. Oracle failures propagate: the source transaction rolls back and is
/// retried on the next ingestion pass.
pub async fn handle_claimable_updated(
    state: &AppState,
    conn: &mut SqliteConnection,
    ev: &ClaimableAmountUpdated,
) -> Result<(), SyncError> {
    let creator = ev.creator.to_string();
    let campaign_index = corrected_index(ev.campaign_index);

    let Some(campaign) = db::campaign::find(conn, &creator, campaign_index).await? else {
        warn!("Claimable update for unknown campaign {}/{}", creator, campaign_index);
        return Ok(());
    };

    let Some(outcome) = claims::compute_claim(state, &campaign).await? else {
        return Ok(());
    };

    db::sell_progress::upsert(
        conn,
        &creator,
        campaign_index,
        &ev.mint.to_string(),
        status::lamports_to_units(ev.claimable_amount as i64),
        outcome.market_cap_usd,
    )
    .await?;
    Ok(())
}

/// A claim against a campaign we are not tracking sell progress for is a
/// contract violation, not a gap to paper over.
pub async fn handle_token_claimed(
    conn: &mut SqliteConnection,
    ev: &TokenClaimed,
) -> Result<(), SyncError> {
    let creator = ev.creator.to_string();
    let campaign_index = corrected_index(ev.campaign_index);

    if db::sell_progress::find(conn, &creator, campaign_index).await?.is_none() {
        return Err(SyncError::UntrackedSellProgress { creator, campaign_index });
    }

    db::sell_progress::set_claimable_amount(
        conn,
        &creator,
        campaign_index,
        status::lamports_to_units(ev.amount as i64),
    )
    .await?;
    Ok(())
}

/// Creator withdrew the raised funds; the stored total resets to zero.
pub async fn handle_fund_claimed(
    conn: &mut SqliteConnection,
    ev: &FundClaimed,
) -> Result<(), SyncError> {
    let creator = ev.creator.to_string();
    let campaign_index = corrected_index(ev.campaign_index);
    db::campaign::set_total_fund_raised(conn, &creator, campaign_index, 0).await?;
    Ok(())
}

/// Apply a donation and immediately re-derive the campaign's status, so a
/// goal-crossing donation flips to PENDING within the same source
/// transaction.
pub async fn handle_fund_donated(
    conn: &mut SqliteConnection,
    ev: &FundDonated,
    now: i64,
) -> Result<(), SyncError> {
    let creator = ev.creator.to_string();
    let campaign_index = corrected_index(ev.campaign_index);

    if db::campaign::find(conn, &creator, campaign_index).await?.is_none() {
        warn!("Donation for unknown campaign {}/{}", creator, campaign_index);
        return Ok(());
    }

    db::campaign::add_donation(
        conn,
        &creator,
        campaign_index,
        ev.donated_amount as i64,
        ev.timestamp,
    )
    .await?;

    // Re-read to reconcile against the post-donation total
    if let Some(updated) = db::campaign::find(conn, &creator, campaign_index).await? {
        status::reconcile_campaign_status(conn, &updated, now).await?;
    }
    Ok(())
}
