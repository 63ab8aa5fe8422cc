// Ingestion job: tails the monitored program's transaction history behind a
// slot watermark, replays decoded events through the handlers exactly once,
// reconciles campaign statuses, and drives the scheduled claim-automation
// pass.

use crate::chain::events::{decode_events, CampaignEvent};
use crate::db;
use crate::error::SyncError;
use crate::state::AppState;
use crate::sync::{claims, handlers, status, RunGuard};
use backon::{ConstantBuilder, Retryable};
use chrono::Utc;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::EncodedConfirmedTransactionWithStatusMeta;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Signature-listing page size; the provider caps at 1000.
const PAGE_LIMIT: usize = 1000;
/// Transaction bodies are fetched in chunks of this size, one at a time.
const FETCH_CHUNK_SIZE: usize = 20;

pub struct IngestJob {
    state: Arc<AppState>,
    running: AtomicBool,
}

impl IngestJob {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, running: AtomicBool::new(false) }
    }

    /// Per-tick entry point with the job's error boundary: nothing escapes
    /// to crash the process, the next tick retries naturally.
    pub async fn run(&self) {
        let Some(_guard) = RunGuard::try_acquire(&self.running) else {
            debug!("Ingest job still running, skipping tick");
            return;
        };
        if !db::connection::is_healthy(&self.state.db_pool).await {
            warn!("Database connection not healthy, skipping ingest tick");
            return;
        }
        if let Err(e) = self.run_once().await {
            error!("Ingest pass failed: {}", e);
        }
    }

    async fn run_once(&self) -> Result<(), SyncError> {
        self.sync_all_statuses().await?;
        self.run_claim_automation().await?;
        self.sync_new_transactions().await?;
        Ok(())
    }

    /// Re-derive every campaign's status in one transactional scope,
    /// retried on write conflict.
    async fn sync_all_statuses(&self) -> Result<(), SyncError> {
        let op = || async {
            let mut tx = self.state.db_pool.begin().await?;
            let campaigns = db::campaign::all(&mut tx).await?;
            let now = Utc::now().timestamp();
            for campaign in &campaigns {
                status::reconcile_campaign_status(&mut tx, campaign, now).await?;
            }
            tx.commit().await?;
            Ok::<(), SyncError>(())
        };

        op.retry(write_conflict_backoff())
            .when(SyncError::is_write_conflict)
            .notify(|err, dur| warn!("Retrying status sync in {:?} after write conflict: {}", dur, err))
            .await
    }

    /// Scheduled half of claim automation: recompute and submit the
    /// claimable figure for every tracked sell progress. Failures abort
    /// only that campaign's update for this pass.
    async fn run_claim_automation(&self) -> Result<(), SyncError> {
        let progresses = {
            let mut conn = self.state.db_pool.acquire().await?;
            db::sell_progress::all(&mut conn).await?
        };

        for progress in progresses {
            let campaign = {
                let mut conn = self.state.db_pool.acquire().await?;
                db::campaign::find(&mut conn, &progress.creator, progress.campaign_index).await?
            };
            let Some(campaign) = campaign else {
                continue;
            };

            match claims::compute_claim(&self.state, &campaign).await {
                Ok(Some(outcome)) => {
                    if let Err(e) = claims::submit_claim_update(&self.state, &campaign, &outcome) {
                        warn!(
                            "Claim update submission failed for {}/{}: {}",
                            campaign.creator, campaign.campaign_index, e
                        );
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(
                    "Claim automation skipped for {}/{} this pass: {}",
                    campaign.creator, campaign.campaign_index, e
                ),
            }
        }
        Ok(())
    }

    /// Whole-loop passes until a pass discovers zero new signatures or a
    /// replay lands zero new ledger rows. The second condition guarantees
    /// termination: a pass that only re-encounters already-ingested
    /// signatures would otherwise repeat with identical state forever.
    async fn sync_new_transactions(&self) -> Result<(), SyncError> {
        loop {
            let watermark = {
                let mut conn = self.state.db_pool.acquire().await?;
                db::transaction::watermark(&mut conn).await?
            };
            debug!("Ingest watermark: {:?}", watermark.as_ref().map(|w| w.block_slot));

            let newest_first = self.collect_new_signatures(
                watermark.as_ref().map(|w| w.signature.as_str()),
            )?;
            if newest_first.is_empty() {
                info!("No new transactions");
                return Ok(());
            }

            let replay = plan_replay(newest_first, self.state.config.signature_trim_window);
            if replay.is_empty() {
                return Ok(());
            }
            info!("Replaying {} signatures", replay.len());
            let ingested = self.ingest_signatures(&replay).await?;
            if ingested == 0 {
                debug!("Replay recorded nothing new, ending ingest pass");
                return Ok(());
            }
        }
    }

    /// Page backwards from now. The provider's `until` cursor already
    /// excludes the watermark signature and everything older, so pagination
    /// ends on an empty filtered page or a short page. Without a watermark
    /// the first page bounds the bootstrap. Failed transactions are dropped
    /// up front.
    fn collect_new_signatures(&self, until: Option<&str>) -> Result<Vec<String>, SyncError> {
        let mut collected: Vec<String> = Vec::new();
        let mut before: Option<String> = None;

        loop {
            let page = self.state.client.get_signatures_for_address(
                &self.state.program_id,
                before.as_deref(),
                until,
                Some(PAGE_LIMIT),
            )?;
            let page_len = page.len();

            let successful: Vec<String> = page
                .into_iter()
                .filter(|entry| entry.err.is_none())
                .map(|entry| entry.signature)
                .collect();
            if successful.is_empty() {
                break;
            }
            collected.extend(successful);

            if until.is_none() || page_len < PAGE_LIMIT {
                break;
            }
            debug!("Watermark not reached yet, continuing pagination");
            before = collected.last().cloned();
        }

        Ok(collected)
    }

    /// Fetch transaction bodies in bounded chunks with pacing, then apply
    /// them in chronological order. Any fetch error aborts the whole pass.
    /// Returns the number of newly recorded ledger rows.
    async fn ingest_signatures(&self, signatures: &[String]) -> Result<usize, SyncError> {
        let mut bodies: Vec<(String, EncodedConfirmedTransactionWithStatusMeta)> =
            Vec::with_capacity(signatures.len());

        for (i, chunk) in signatures.chunks(FETCH_CHUNK_SIZE).enumerate() {
            if i > 0 {
                sleep(self.state.config.fetch_chunk_delay).await;
            }
            for signature in chunk {
                let body = self.state.client.get_transaction(signature)?;
                bodies.push((signature.clone(), body));
            }
            debug!(
                "Fetched transaction bodies {}..{}",
                i * FETCH_CHUNK_SIZE,
                i * FETCH_CHUNK_SIZE + chunk.len()
            );
        }

        let mut ingested = 0;
        for (signature, body) in &bodies {
            match self.handle_transaction(signature, body).await {
                Ok(true) => ingested += 1,
                Ok(false) => {}
                Err(e) => {
                    // One bad source transaction must not block its unrelated
                    // successors; its own effects were rolled back.
                    error!("Failed to process transaction {}: {}", signature, e);
                }
            }
        }
        Ok(ingested)
    }

    /// One source transaction, one transactional scope: all handler effects
    /// plus the idempotency row commit together or not at all. Returns
    /// whether a new ledger row was recorded.
    async fn handle_transaction(
        &self,
        signature: &str,
        body: &EncodedConfirmedTransactionWithStatusMeta,
    ) -> Result<bool, SyncError> {
        {
            let mut conn = self.state.db_pool.acquire().await?;
            if db::transaction::exists(&mut conn, signature).await? {
                debug!("Transaction {} already ingested, skipping", signature);
                return Ok(false);
            }
        }

        let log_messages = match &body.transaction.meta {
            Some(meta) => match &meta.log_messages {
                OptionSerializer::Some(logs) => logs.clone(),
                _ => Vec::new(),
            },
            None => Vec::new(),
        };
        let events = decode_events(&log_messages);
        let block_slot = body.slot as i64;
        let block_time = body.block_time.unwrap_or_default();

        let op = || async {
            let mut tx = self.state.db_pool.begin().await?;
            for event in &events {
                debug!("Processing event {} from {}", event.name(), signature);
                self.apply_event(&mut tx, event).await?;
            }
            db::transaction::record(&mut tx, signature, block_slot, block_time).await?;
            tx.commit().await?;
            Ok::<(), SyncError>(())
        };

        op.retry(write_conflict_backoff())
            .when(SyncError::is_write_conflict)
            .notify(|err, dur| {
                warn!("Retrying transaction {} in {:?} after write conflict: {}", signature, dur, err)
            })
            .await?;
        Ok(true)
    }

    async fn apply_event(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        event: &CampaignEvent,
    ) -> Result<(), SyncError> {
        let now = Utc::now().timestamp();
        match event {
            CampaignEvent::Created(ev) => {
                handlers::handle_campaign_created(&self.state, tx, ev).await
            }
            CampaignEvent::TokenCreated(ev) => handlers::handle_token_created(tx, ev, now).await,
            CampaignEvent::TokenSold(ev) => handlers::handle_token_sold(tx, ev).await,
            CampaignEvent::ClaimableAmountUpdated(ev) => {
                handlers::handle_claimable_updated(&self.state, tx, ev).await
            }
            CampaignEvent::TokenClaimed(ev) => handlers::handle_token_claimed(tx, ev).await,
            CampaignEvent::FundClaimed(ev) => handlers::handle_fund_claimed(tx, ev).await,
            CampaignEvent::FundDonated(ev) => handlers::handle_fund_donated(tx, ev, now).await,
        }
    }
}

/// Order the accumulated newest-first signatures for replay: reverse into
/// chronological order and drop the `trim_window` most recent ones as a
/// margin against provider cache lag. They reappear next pass once the
/// provider has settled; a batch no larger than the window is replayed
/// whole so a lone transaction is never starved.
pub fn plan_replay(mut newest_first: Vec<String>, trim_window: usize) -> Vec<String> {
    newest_first.reverse();
    if trim_window > 0 && newest_first.len() > trim_window {
        let keep = newest_first.len() - trim_window;
        newest_first.truncate(keep);
    }
    newest_first
}

fn write_conflict_backoff() -> ConstantBuilder {
    ConstantBuilder::default().with_delay(Duration::from_secs(1)).with_max_times(3)
}
