// Token issuance: takes PENDING campaigns through token creation. Builds
// one composite transaction per campaign - create the token, open the
// operator's token account, buy the initial supply off the bonding curve,
// open the campaign's token account, move the supply into campaign custody.
// A failed candidate is marked FAILED and the pass moves on; a successful
// one is left PENDING until the ledger's token-created event lands.

use crate::chain::accounts::{CampaignAccount, ConfigAccount};
use crate::chain::{curve, instructions, pda};
use crate::db;
use crate::error::SyncError;
use crate::models::{Campaign, CampaignStatus};
use crate::state::AppState;
use crate::sync::{status, RunGuard};
use backon::{ConstantBuilder, Retryable};
use chrono::Utc;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Candidates taken per pass, to bound RPC and signer load.
const MAX_CANDIDATES: i64 = 5;

pub struct TokenIssuanceJob {
    state: Arc<AppState>,
    running: AtomicBool,
}

impl TokenIssuanceJob {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, running: AtomicBool::new(false) }
    }

    pub async fn run(&self) {
        let Some(_guard) = RunGuard::try_acquire(&self.running) else {
            debug!("Issuance job still running, skipping tick");
            return;
        };
        if !db::connection::is_healthy(&self.state.db_pool).await {
            warn!("Database connection not healthy, skipping issuance tick");
            return;
        }
        if let Err(e) = self.run_once().await {
            error!("Issuance pass failed: {}", e);
        }
    }

    async fn run_once(&self) -> Result<(), SyncError> {
        let pending = {
            let mut conn = self.state.db_pool.acquire().await?;
            db::process_status::find_pending(&mut conn, MAX_CANDIDATES).await?
        };
        if pending.is_empty() {
            return Ok(());
        }
        info!("Found {} pending campaigns for token creation", pending.len());

        for process in pending {
            let campaign = {
                let mut conn = self.state.db_pool.acquire().await?;
                db::campaign::find(&mut conn, &process.creator, process.campaign_index).await?
            };
            let Some(campaign) = campaign else {
                warn!(
                    "Campaign not found for pending process {}/{}",
                    process.creator, process.campaign_index
                );
                continue;
            };

            // Re-validate: funding or deadline may have moved since the
            // status was derived. Ineligible candidates are skipped, not
            // failed - the status sync will re-classify them.
            let now = Utc::now().timestamp();
            if !status::is_eligible_for_issuance(&campaign, now) {
                info!(
                    "Campaign {}/{} no longer eligible for token creation",
                    campaign.creator, campaign.campaign_index
                );
                continue;
            }

            match self.create_token_for_campaign(&campaign) {
                Ok(signature) => {
                    // COMPLETED is written by the ingestion loop when the
                    // token-created event arrives, never here.
                    info!(
                        "Token creation transaction confirmed for campaign {}/{}: {}",
                        campaign.creator, campaign.campaign_index, signature
                    );
                }
                Err(e) => {
                    error!(
                        "Token creation failed for campaign {}/{}: {}",
                        campaign.creator, campaign.campaign_index, e
                    );
                    self.mark_failed(&campaign).await;
                }
            }
        }
        Ok(())
    }

    fn create_token_for_campaign(&self, campaign: &Campaign) -> Result<Signature, SyncError> {
        let creator = Pubkey::from_str(&campaign.creator).map_err(|_| {
            SyncError::InvalidConfig(format!("bad creator key {}", campaign.creator))
        })?;
        let program_id = &self.state.program_id;
        let operator = self.state.operator.pubkey();

        let campaign_pda = pda::campaign_pda(program_id, &creator, campaign.campaign_index as u64);
        let config_pda = pda::config_pda(program_id);
        let treasury_pda = pda::treasury_pda(program_id);

        // Fresh token identity for this issuance
        let mint_keypair = Keypair::new();
        let mint = mint_keypair.pubkey();
        info!(
            "Generated mint {} for campaign {}/{}",
            mint, campaign.creator, campaign.campaign_index
        );

        let bonding_curve = pda::bonding_curve_pda(&mint);
        let associated_bonding_curve = get_associated_token_address(&bonding_curve, &mint);
        let associated_operator = get_associated_token_address(&operator, &mint);
        let associated_campaign = get_associated_token_address(&campaign_pda, &mint);
        let metadata = pda::metadata_pda(&mint);

        // Spendable deposit: on-chain balance minus rent reserve minus the
        // protocol fee taken by the program.
        let Some(campaign_account) = self.state.client.get_account(&campaign_pda)? else {
            return Err(SyncError::CampaignAccountMissing(campaign_pda.to_string()));
        };
        let rent_reserve = self
            .state
            .client
            .minimum_balance_for_rent_exemption(campaign_account.data.len())?;
        let available = campaign_account.lamports.saturating_sub(rent_reserve);

        let Some(config_account) = self.state.client.get_account(&config_pda)? else {
            return Err(SyncError::CampaignAccountMissing(config_pda.to_string()));
        };
        let config_state = ConfigAccount::try_from_bytes(&config_account.data)?;
        let fee = curve::protocol_fee(available, config_state.protocol_fee_bps);
        let max_sol_cost = available.saturating_sub(fee);

        let slippage_bps = self.state.config.slippage_bps;
        let token_amount = curve::tokens_out_for_sol(max_sol_cost, slippage_bps);
        debug!(
            "Issuance buy for {}/{}: max {} lamports, {} tokens",
            campaign.creator, campaign.campaign_index, max_sol_cost, token_amount
        );

        // Sanity check the chain state still describes this campaign
        let chain_state = CampaignAccount::try_from_bytes(&campaign_account.data)?;
        if chain_state.mint.is_some() {
            return Err(SyncError::InvalidConfig(format!(
                "campaign {}/{} already has a mint on-chain",
                campaign.creator, campaign.campaign_index
            )));
        }

        let instructions = vec![
            instructions::create_token(
                program_id,
                &instructions::CreateTokenAccounts {
                    operator,
                    config: config_pda,
                    treasury: treasury_pda,
                    creator,
                    campaign: campaign_pda,
                    mint,
                    bonding_curve,
                    associated_bonding_curve,
                    metadata,
                },
                slippage_bps,
            ),
            create_associated_token_account(&operator, &operator, &mint, &spl_token::id()),
            instructions::pump_fun_buy(
                &instructions::PumpFunBuyAccounts {
                    fee_recipient: pda::fee_recipient(self.state.config.devnet),
                    mint,
                    bonding_curve,
                    associated_bonding_curve,
                    associated_user: associated_operator,
                    user: operator,
                },
                token_amount,
                max_sol_cost,
            ),
            create_associated_token_account(&operator, &campaign_pda, &mint, &spl_token::id()),
            spl_token::instruction::transfer(
                &spl_token::id(),
                &associated_operator,
                &associated_campaign,
                &operator,
                &[],
                token_amount,
            )?,
        ];

        let blockhash = self.state.client.latest_blockhash()?;
        let transaction = Transaction::new_signed_with_payer(
            &instructions,
            Some(&operator),
            &[self.state.operator.as_ref(), &mint_keypair],
            blockhash,
        );
        let signature = self.state.client.send_and_confirm(&transaction)?;
        Ok(signature)
    }

    /// FAILED marking is best-effort with conflict retry; an unrelated
    /// candidate must still get its turn this pass.
    async fn mark_failed(&self, campaign: &Campaign) {
        let now = Utc::now().timestamp();
        let op = || async {
            let mut conn = self.state.db_pool.acquire().await?;
            db::process_status::upsert_status(
                &mut conn,
                &campaign.creator,
                campaign.campaign_index,
                CampaignStatus::Failed,
                now,
            )
            .await?;
            Ok::<(), SyncError>(())
        };
        let result = op
            .retry(ConstantBuilder::default().with_delay(Duration::from_secs(1)).with_max_times(3))
            .when(SyncError::is_write_conflict)
            .await;
        if let Err(e) = result {
            error!(
                "Failed to mark campaign {}/{} FAILED: {}",
                campaign.creator, campaign.campaign_index, e
            );
        }
    }
}
