// Fund reconciliation: re-check each campaign's on-chain deposit balance,
// refresh the stored total, and prune defunct campaigns. COMPLETED and
// minted campaigns are protected; the delete path re-reads state right
// before acting so it cannot race a concurrent issuance that legitimately
// drained the deposit.

use crate::chain::pda;
use crate::db;
use crate::error::SyncError;
use crate::models::CampaignStatus;
use crate::state::AppState;
use crate::sync::RunGuard;
use backon::{ExponentialBuilder, Retryable};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct FundReconcileJob {
    state: Arc<AppState>,
    running: AtomicBool,
}

impl FundReconcileJob {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, running: AtomicBool::new(false) }
    }

    pub async fn run(&self) {
        let Some(_guard) = RunGuard::try_acquire(&self.running) else {
            debug!("Fund reconcile job still running, skipping tick");
            return;
        };
        if !db::connection::is_healthy(&self.state.db_pool).await {
            warn!("Database connection not healthy, skipping fund reconcile tick");
            return;
        }

        let op = || self.reconcile_all();
        let result = op
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_secs(2))
                    .with_max_times(3),
            )
            .when(SyncError::is_write_conflict)
            .notify(|err, dur| {
                warn!("Retrying fund reconcile in {:?} after write conflict: {}", dur, err)
            })
            .await;

        if let Err(e) = result {
            error!("Fund reconcile pass failed: {}", e);
        }
    }

    /// One transactional scope over all campaigns: update every stored
    /// total to the on-chain net figure, delete campaigns whose deposit is
    /// gone and which never reached a terminal state.
    async fn reconcile_all(&self) -> Result<(), SyncError> {
        let mut tx = self.state.db_pool.begin().await?;
        let campaigns = db::campaign::all(&mut tx).await?;

        for campaign in &campaigns {
            let prior = db::process_status::find(&mut tx, &campaign.creator, campaign.campaign_index)
                .await?
                .map(|p| p.status);
            if prior == Some(CampaignStatus::Completed) || campaign.mint.is_some() {
                debug!(
                    "Campaign {}/{} terminal or minted - skipping fund reconcile",
                    campaign.creator, campaign.campaign_index
                );
                continue;
            }

            let creator = Pubkey::from_str(&campaign.creator).map_err(|_| {
                SyncError::InvalidConfig(format!("bad creator key {}", campaign.creator))
            })?;
            let campaign_pda =
                pda::campaign_pda(&self.state.program_id, &creator, campaign.campaign_index as u64);

            // Absent account counts as a fully drained deposit
            let net_funds = match self.state.client.get_account(&campaign_pda)? {
                Some(account) => {
                    let rent_reserve = self
                        .state
                        .client
                        .minimum_balance_for_rent_exemption(account.data.len())?;
                    account.lamports.saturating_sub(rent_reserve) as i64
                }
                None => {
                    debug!(
                        "Campaign account {} not found on-chain for {}/{}",
                        campaign_pda, campaign.creator, campaign.campaign_index
                    );
                    0
                }
            };

            if net_funds == 0 {
                // Re-read immediately before deletion: a concurrent
                // issuance may have zeroed the deposit on its way to
                // COMPLETED.
                let latest_status =
                    db::process_status::find(&mut tx, &campaign.creator, campaign.campaign_index)
                        .await?
                        .map(|p| p.status);
                let latest_campaign =
                    db::campaign::find(&mut tx, &campaign.creator, campaign.campaign_index).await?;
                let (exists, mint) = match &latest_campaign {
                    Some(c) => (true, c.mint.as_deref()),
                    None => (false, None),
                };

                if should_delete(net_funds, latest_status, mint, exists) {
                    info!(
                        "Deleting campaign {}/{} - zero funds and not completed",
                        campaign.creator, campaign.campaign_index
                    );
                    db::campaign::delete(&mut tx, &campaign.creator, campaign.campaign_index)
                        .await?;
                    db::process_status::delete(&mut tx, &campaign.creator, campaign.campaign_index)
                        .await?;
                    db::sell_progress::delete(&mut tx, &campaign.creator, campaign.campaign_index)
                        .await?;
                } else {
                    debug!(
                        "Preserving campaign {}/{} with zero funds - completed or has mint",
                        campaign.creator, campaign.campaign_index
                    );
                }
            } else {
                db::campaign::set_total_fund_raised(
                    &mut tx,
                    &campaign.creator,
                    campaign.campaign_index,
                    net_funds,
                )
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Deletion guard, re-evaluated against freshly read state: only a
/// still-existing, fund-less, non-terminal, mint-less campaign may go.
pub fn should_delete(
    net_funds: i64,
    status: Option<CampaignStatus>,
    mint: Option<&str>,
    exists: bool,
) -> bool {
    exists && net_funds == 0 && status != Some(CampaignStatus::Completed) && mint.is_none()
}
