// Market-cap-driven claim automation. Computes a claimable allocation from
// oracle market cap and the on-chain campaign account, and submits an
// update_claimable_amount instruction signed by the operator.

use crate::chain::accounts::CampaignAccount;
use crate::chain::{instructions, pda};
use crate::error::SyncError;
use crate::models::Campaign;
use crate::state::AppState;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    pub mint: Pubkey,
    pub market_cap_usd: f64,
    pub claim_amount: u64,
}

/// Claim percentage per market-cap tier. The tiers are evaluated
/// independently, top down; the $2M tier intentionally pays more than the
/// $5M tier per the product brief we were handed. Flagged upstream as a
/// likely defect, preserved here until the brief changes.
pub fn claim_percent(market_cap_usd: f64) -> u64 {
    if market_cap_usd >= 5_000_000.0 {
        20
    } else if market_cap_usd >= 2_000_000.0 {
        40
    } else if market_cap_usd >= 1_000_000.0 {
        30
    } else if market_cap_usd >= 500_000.0 {
        10
    } else {
        0
    }
}

/// `percent` of the bought supply, clamped so the claimable figure never
/// exceeds what remains unclaimed.
pub fn claim_amount(total_bought: u64, total_claimed: u64, percent: u64) -> u64 {
    let amount = (total_bought as u128 * percent as u128 / 100) as u64;
    let remaining = total_bought.saturating_sub(total_claimed);
    amount.min(remaining)
}

/// Read the on-chain campaign account and the oracle, and compute the claim
/// figures. Returns Ok(None) when the campaign has no live token yet; oracle
/// and RPC failures propagate so the caller can abort just this campaign's
/// update for the current pass.
pub async fn compute_claim(
    state: &AppState,
    campaign: &Campaign,
) -> Result<Option<ClaimOutcome>, SyncError> {
    let creator = Pubkey::from_str(&campaign.creator)
        .map_err(|_| SyncError::InvalidConfig(format!("bad creator key {}", campaign.creator)))?;
    let campaign_pda =
        pda::campaign_pda(&state.program_id, &creator, campaign.campaign_index as u64);

    let Some(account) = state.client.get_account(&campaign_pda)? else {
        return Err(SyncError::CampaignAccountMissing(campaign_pda.to_string()));
    };
    let chain_state = CampaignAccount::try_from_bytes(&account.data)?;

    let Some(mint) = chain_state.mint else {
        warn!(
            "Campaign {}/{} has no mint on-chain, skipping claim update",
            campaign.creator, campaign.campaign_index
        );
        return Ok(None);
    };

    let market_cap_usd = state.oracle.market_cap_usd(&mint.to_string()).await?;
    let percent = claim_percent(market_cap_usd);
    let amount = claim_amount(chain_state.total_token_bought, chain_state.total_claimed, percent);

    Ok(Some(ClaimOutcome { mint, market_cap_usd, claim_amount: amount }))
}

/// Submit the on-chain claimable-amount update. This sets a bound; the
/// creator's separate claim instruction consumes it later.
pub fn submit_claim_update(
    state: &AppState,
    campaign: &Campaign,
    outcome: &ClaimOutcome,
) -> Result<Signature, SyncError> {
    let creator = Pubkey::from_str(&campaign.creator)
        .map_err(|_| SyncError::InvalidConfig(format!("bad creator key {}", campaign.creator)))?;
    let campaign_pda =
        pda::campaign_pda(&state.program_id, &creator, campaign.campaign_index as u64);

    let instruction = instructions::update_claimable_amount(
        &state.program_id,
        &instructions::UpdateClaimableAmountAccounts {
            operator: state.operator.pubkey(),
            config: pda::config_pda(&state.program_id),
            campaign: campaign_pda,
            creator,
            mint: outcome.mint,
        },
        outcome.claim_amount,
    );

    let blockhash = state.client.latest_blockhash()?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&state.operator.pubkey()),
        &[state.operator.as_ref()],
        blockhash,
    );
    let signature = state.client.send_and_confirm(&transaction)?;

    info!(
        "Updated claimable amount for campaign {}/{}: {} (market cap ${})",
        campaign.creator, campaign.campaign_index, outcome.claim_amount, outcome.market_cap_usd
    );
    Ok(signature)
}
