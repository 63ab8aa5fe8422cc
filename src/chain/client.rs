use crate::config::Config;
use solana_client::rpc_client::{GetConfirmedSignaturesForAddress2Config, RpcClient};
use solana_client::rpc_config::RpcTransactionConfig;
use solana_client::rpc_response::RpcConfirmedTransactionStatusWithSignature;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use solana_transaction_status::EncodedConfirmedTransactionWithStatusMeta;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("RPC error: {0}")]
    RpcError(#[from] solana_client::client_error::ClientError),

    #[error("Invalid signature: {0}")]
    SignatureError(String),

    #[error("Invalid public key: {0}")]
    PubkeyError(String),
}

pub struct SolanaClient {
    rpc_client: RpcClient,
    commitment: CommitmentConfig,
}

impl SolanaClient {
    pub fn new(config: &Config) -> Self {
        let rpc_url = &config.solana_rpc_url;
        let timeout = Duration::from_secs(config.rpc_timeout_secs);

        let commitment = match config.solana_commitment_level.as_str() {
            "processed" => CommitmentConfig::processed(),
            "confirmed" => CommitmentConfig::confirmed(),
            "finalized" => CommitmentConfig::finalized(),
            _ => CommitmentConfig::finalized(),
        };

        info!(
            "Initializing Solana client with RPC endpoint: {}, commitment: {:?}",
            rpc_url, commitment
        );

        let rpc_client =
            RpcClient::new_with_timeout_and_commitment(rpc_url.clone(), timeout, commitment);

        Self { rpc_client, commitment }
    }

    /// List signatures touching `address`, newest first, bounded by the
    /// optional before/until cursors.
    pub fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        before: Option<&str>,
        until: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<RpcConfirmedTransactionStatusWithSignature>, ClientError> {
        let before_sig = before
            .map(|sig| {
                Signature::from_str(sig).map_err(|_| ClientError::SignatureError(sig.to_string()))
            })
            .transpose()?;
        let until_sig = until
            .map(|sig| {
                Signature::from_str(sig).map_err(|_| ClientError::SignatureError(sig.to_string()))
            })
            .transpose()?;

        let signatures = self.rpc_client.get_signatures_for_address_with_config(
            address,
            GetConfirmedSignaturesForAddress2Config {
                before: before_sig,
                until: until_sig,
                limit,
                commitment: Some(self.commitment),
            },
        )?;

        Ok(signatures)
    }

    /// Get transaction details by signature
    pub fn get_transaction(
        &self,
        signature_str: &str,
    ) -> Result<EncodedConfirmedTransactionWithStatusMeta, ClientError> {
        let signature = Signature::from_str(signature_str)
            .map_err(|_| ClientError::SignatureError(signature_str.to_string()))?;

        let config = RpcTransactionConfig {
            encoding: Some(solana_transaction_status::UiTransactionEncoding::JsonParsed),
            commitment: Some(self.commitment),
            max_supported_transaction_version: Some(0),
        };

        let tx = self.rpc_client.get_transaction_with_config(&signature, config)?;
        Ok(tx)
    }

    /// Fetch account data and balance. A missing account is `None`, not an
    /// error: the cleanup pass treats absence as a zero balance.
    pub fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, ClientError> {
        match self.rpc_client.get_account(address) {
            Ok(account) => Ok(Some(account)),
            Err(e) => {
                if e.to_string().contains("AccountNotFound")
                    || e.to_string().contains("account not found")
                {
                    Ok(None)
                } else {
                    Err(ClientError::RpcError(e))
                }
            }
        }
    }

    pub fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, ClientError> {
        let balance = self.rpc_client.get_minimum_balance_for_rent_exemption(data_len)?;
        Ok(balance)
    }

    pub fn latest_blockhash(&self) -> Result<Hash, ClientError> {
        let blockhash = self.rpc_client.get_latest_blockhash()?;
        Ok(blockhash)
    }

    pub fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        let signature = self.rpc_client.send_and_confirm_transaction(transaction)?;
        Ok(signature)
    }
}
