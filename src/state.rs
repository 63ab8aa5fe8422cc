use crate::chain::SolanaClient;
use crate::config::Config;
use crate::error::SyncError;
use crate::oracle::MarketCapOracle;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

/// Shared dependency bundle handed to each job. One instance per process,
/// passed explicitly; no global singletons.
pub struct AppState {
    pub config: Config,
    pub db_pool: SqlitePool,
    pub client: Arc<SolanaClient>,
    pub oracle: MarketCapOracle,
    pub program_id: Pubkey,
    pub operator: Arc<Keypair>,
}

impl AppState {
    pub fn new(config: Config, db_pool: SqlitePool) -> Result<Self, SyncError> {
        let program_id = Pubkey::from_str(&config.program_id)
            .map_err(|_| SyncError::InvalidConfig(format!("bad program id {}", config.program_id)))?;
        let secret = bs58::decode(&config.operator_private_key)
            .into_vec()
            .map_err(|e| SyncError::InvalidOperatorKey(e.to_string()))?;
        let operator = Keypair::from_bytes(&secret)
            .map_err(|e| SyncError::InvalidOperatorKey(e.to_string()))?;
        let client = Arc::new(SolanaClient::new(&config));
        let oracle = MarketCapOracle::new(&config.oracle_base_url);

        Ok(Self { config, db_pool, client, oracle, program_id, operator: Arc::new(operator) })
    }
}
