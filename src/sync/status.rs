// Status derivation is evaluated by the ingest job (every pass and after
// each donation) and by issuance eligibility. It lives here, once, so the
// call sites cannot drift apart.

use crate::db;
use crate::models::{Campaign, CampaignStatus};
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use sqlx::SqliteConnection;
use tracing::debug;

pub fn lamports_to_units(lamports: i64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Derive the lifecycle status for a campaign at `now` (unix seconds).
///
/// Precedence: a prior COMPLETED is terminal; a recorded mint completes;
/// goal met before the deposit deadline is PENDING; goal missed after the
/// deadline is FAILED; everything else keeps RAISING. A funded campaign
/// whose deadline has passed also stays RAISING until the issuance pipeline
/// resolves it one way or the other.
pub fn derive_status(
    campaign: &Campaign,
    prior: Option<CampaignStatus>,
    now: i64,
) -> CampaignStatus {
    if prior == Some(CampaignStatus::Completed) {
        return CampaignStatus::Completed;
    }
    if campaign.mint.is_some() {
        return CampaignStatus::Completed;
    }

    let raised_units = lamports_to_units(campaign.total_fund_raised);
    let goal_met = raised_units >= campaign.donation_goal;
    let deadline_passed = campaign.deposit_deadline < now;

    if goal_met && !deadline_passed {
        CampaignStatus::Pending
    } else if !goal_met && deadline_passed {
        CampaignStatus::Failed
    } else {
        CampaignStatus::Raising
    }
}

/// A campaign may be taken through token issuance only while the derived
/// status is still PENDING and no mint exists.
pub fn is_eligible_for_issuance(campaign: &Campaign, now: i64) -> bool {
    campaign.mint.is_none() && derive_status(campaign, None, now) == CampaignStatus::Pending
}

/// Re-derive and upsert one campaign's status. No-ops once terminal.
pub async fn reconcile_campaign_status(
    conn: &mut SqliteConnection,
    campaign: &Campaign,
    now: i64,
) -> Result<CampaignStatus, sqlx::Error> {
    let prior = db::process_status::find(conn, &campaign.creator, campaign.campaign_index)
        .await?
        .map(|p| p.status);

    if prior == Some(CampaignStatus::Completed) {
        debug!(
            "Campaign {}/{} already COMPLETED - skipping status update",
            campaign.creator, campaign.campaign_index
        );
        return Ok(CampaignStatus::Completed);
    }

    let status = derive_status(campaign, prior, now);
    db::process_status::upsert_status(
        conn,
        &campaign.creator,
        campaign.campaign_index,
        status,
        now,
    )
    .await?;
    debug!(
        "Campaign {}/{} status -> {}",
        campaign.creator, campaign.campaign_index, status
    );
    Ok(status)
}
