use crate::chain::client::ClientError;
use thiserror::Error;

/// Crate-wide error for the synchronization jobs.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("RPC client error: {0}")]
    Client(#[from] ClientError),

    #[error("Price oracle error: {0}")]
    Oracle(#[from] reqwest::Error),

    #[error("Price oracle returned no market cap for {0}")]
    OracleMissingData(String),

    #[error("Derived campaign account {0} does not exist on-chain")]
    CampaignAccountMissing(String),

    #[error("On-chain account data too short for {0}")]
    AccountLayout(&'static str),

    #[error("Token claim reported for untracked sell progress {creator}/{campaign_index}")]
    UntrackedSellProgress { creator: String, campaign_index: i64 },

    #[error("Invalid operator key: {0}")]
    InvalidOperatorKey(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Instruction build error: {0}")]
    Instruction(#[from] solana_sdk::program_error::ProgramError),
}

impl SyncError {
    /// Write conflicts are retried with backoff at the job scope; everything
    /// else propagates to the per-job error boundary.
    pub fn is_write_conflict(&self) -> bool {
        match self {
            SyncError::Database(e) => crate::db::is_write_conflict(e),
            _ => false,
        }
    }
}
