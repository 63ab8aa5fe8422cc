// Configuration for:
// - RPC endpoint URL and commitment level
// - Database connection string
// - Monitored program id and operator key
// - Job intervals and ingestion pacing
// - Price oracle endpoint

use dotenv::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub solana_rpc_url: String,
    pub solana_commitment_level: String,
    pub rpc_timeout_secs: u64,
    /// Base58 address of the monitored fundraising program.
    pub program_id: String,
    /// Base58-encoded operator secret key. Signs claim updates and issuance
    /// transactions.
    pub operator_private_key: String,
    pub oracle_base_url: String,
    pub ingest_interval: Duration,
    pub fund_interval: Duration,
    pub issuance_interval: Duration,
    /// Offset before the fund-reconcile loop first fires, to reduce initial
    /// contention with the ingest loop.
    pub fund_start_delay: Duration,
    /// Number of most-recently-seen signatures dropped each pagination pass
    /// as a safety margin against provider cache lag.
    pub signature_trim_window: usize,
    /// Pause between transaction-body fetch chunks.
    pub fetch_chunk_delay: Duration,
    /// Slippage allowance for the issuance buy, in basis points.
    pub slippage_bps: u64,
    pub devnet: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data.db".to_string());
        let solana_rpc_url = env::var("SOLANA_RPC_URL")
            .unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string());
        let solana_commitment_level =
            env::var("SOLANA_COMMITMENT_LEVEL").unwrap_or_else(|_| "finalized".to_string());
        let rpc_timeout_secs = env::var("RPC_TIMEOUT_SECS")
            .map(|v| v.parse().unwrap_or(30))
            .unwrap_or(30);
        let program_id = env::var("PROGRAM_ID")
            .unwrap_or_else(|_| "GwAWdhc8NuRVCRn4guyXz7UGaQHCwnnVppBKMtZmxVM2".to_string());
        let operator_private_key = env::var("OPERATOR_PRIV_KEY").unwrap_or_default();
        let oracle_base_url = env::var("ORACLE_BASE_URL")
            .unwrap_or_else(|_| "https://api.geckoterminal.com".to_string());
        let ingest_interval = env_duration_secs("INGEST_INTERVAL_SECS", 15);
        let fund_interval = env_duration_secs("FUND_INTERVAL_SECS", 15);
        let issuance_interval = env_duration_secs("ISSUANCE_INTERVAL_SECS", 15);
        let fund_start_delay = env_duration_secs("FUND_START_DELAY_SECS", 5);
        let signature_trim_window = env::var("SIGNATURE_TRIM_WINDOW")
            .map(|v| v.parse().unwrap_or(1))
            .unwrap_or(1);
        let fetch_chunk_delay = env_duration_secs("FETCH_CHUNK_DELAY_SECS", 10);
        let slippage_bps = env::var("SLIPPAGE_BPS")
            .map(|v| v.parse().unwrap_or(200))
            .unwrap_or(200);
        let devnet = env::var("NODE_ENV").map(|v| v != "production").unwrap_or(true);

        Self {
            database_url,
            solana_rpc_url,
            solana_commitment_level,
            rpc_timeout_secs,
            program_id,
            operator_private_key,
            oracle_base_url,
            ingest_interval,
            fund_interval,
            issuance_interval,
            fund_start_delay,
            signature_trim_window,
            fetch_chunk_delay,
            slippage_bps,
            devnet,
        }
    }
}

fn env_duration_secs(key: &str, default_secs: u64) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(default_secs))
}
