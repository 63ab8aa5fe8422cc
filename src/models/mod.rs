// Persisted entities mirrored from the on-chain fundraising program.
// Lamport amounts are stored as i64; goals and claim figures are whole
// units (value / 1e9).

use serde::{Deserialize, Serialize};

/// Lifecycle status derived for every campaign. COMPLETED is terminal:
/// once written it is never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
pub enum CampaignStatus {
    Raising,
    Pending,
    Failed,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Raising => "RAISING",
            CampaignStatus::Pending => "PENDING",
            CampaignStatus::Failed => "FAILED",
            CampaignStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    pub creator: String,
    /// Program-assigned ordinal, stored 0-based after index correction.
    pub campaign_index: i64,
    pub name: String,
    pub symbol: String,
    pub metadata_uri: String,
    /// Funding goal in whole units.
    pub donation_goal: f64,
    pub deposit_deadline: i64,
    pub trade_deadline: i64,
    pub created_at: i64,
    /// Raised balance in lamports, reconciled against the on-chain account.
    pub total_fund_raised: i64,
    pub mint: Option<String>,
    pub last_donation_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProcessStatus {
    pub creator: String,
    pub campaign_index: i64,
    pub status: CampaignStatus,
    pub mint: Option<String>,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SellProgress {
    pub creator: String,
    pub campaign_index: i64,
    pub mint: String,
    /// Claimable allocation in whole units.
    pub claimable_amount: f64,
    pub market_cap: f64,
}

/// Idempotency ledger row. One per successfully processed source
/// transaction; the max block_slot acts as the pagination watermark.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngestedTransaction {
    pub signature: String,
    pub block_slot: i64,
    pub block_time: i64,
}
