pub mod campaign;
pub mod connection;
pub mod process_status;
pub mod sell_progress;
pub mod transaction;

pub const INIT_SCHEMA: &str = r#"
-- Campaigns mirrored from the on-chain program
CREATE TABLE IF NOT EXISTS campaigns (
    creator TEXT NOT NULL,
    campaign_index INTEGER NOT NULL,
    name TEXT NOT NULL,
    symbol TEXT NOT NULL,
    metadata_uri TEXT NOT NULL,
    donation_goal REAL NOT NULL,
    deposit_deadline INTEGER NOT NULL,
    trade_deadline INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    total_fund_raised INTEGER NOT NULL DEFAULT 0,
    mint TEXT,
    last_donation_timestamp INTEGER,
    PRIMARY KEY (creator, campaign_index)
);

-- Derived lifecycle status, one row per campaign
CREATE TABLE IF NOT EXISTS process_statuses (
    creator TEXT NOT NULL,
    campaign_index INTEGER NOT NULL,
    status TEXT NOT NULL,
    mint TEXT,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (creator, campaign_index)
);

-- Claim progress for campaigns whose token is live
CREATE TABLE IF NOT EXISTS sell_progresses (
    creator TEXT NOT NULL,
    campaign_index INTEGER NOT NULL,
    mint TEXT NOT NULL,
    claimable_amount REAL NOT NULL,
    market_cap REAL NOT NULL DEFAULT 0,
    PRIMARY KEY (creator, campaign_index)
);

-- Idempotency ledger: one row per ingested source transaction
CREATE TABLE IF NOT EXISTS ingested_transactions (
    signature TEXT PRIMARY KEY,
    block_slot INTEGER NOT NULL,
    block_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ingested_transactions_slot ON ingested_transactions(block_slot);
CREATE INDEX IF NOT EXISTS idx_process_statuses_status ON process_statuses(status);
"#;

/// Whether a persistence error is a transient write conflict worth retrying.
/// Keyed off SQLite's BUSY/LOCKED codes rather than matching error text, so
/// the retry policy survives a driver swap.
pub fn is_write_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some("5") | Some("6") | Some("261") | Some("262")
        ),
        _ => false,
    }
}
