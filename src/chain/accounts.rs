// On-chain account layouts for the monitored program. Both accounts are
// anchor-shaped: an 8-byte discriminator followed by little-endian fields.

use crate::chain::ByteReader;
use crate::error::SyncError;
use solana_sdk::pubkey::Pubkey;

/// Campaign sub-account state read back for claim automation and issuance.
#[derive(Debug, Clone)]
pub struct CampaignAccount {
    pub creator: Pubkey,
    pub campaign_index: u64,
    pub donation_goal: u64,
    pub deposit_deadline: i64,
    pub trade_deadline: i64,
    pub total_token_bought: u64,
    pub total_claimed: u64,
    pub mint: Option<Pubkey>,
}

impl CampaignAccount {
    pub fn try_from_bytes(data: &[u8]) -> Result<Self, SyncError> {
        let mut reader = ByteReader::new(data);
        let mut parse = || -> Option<CampaignAccount> {
            reader.skip(8)?; // discriminator
            Some(CampaignAccount {
                creator: reader.read_pubkey()?,
                campaign_index: reader.read_u64()?,
                donation_goal: reader.read_u64()?,
                deposit_deadline: reader.read_i64()?,
                trade_deadline: reader.read_i64()?,
                total_token_bought: reader.read_u64()?,
                total_claimed: reader.read_u64()?,
                mint: reader.read_option_pubkey()?,
            })
        };
        parse().ok_or(SyncError::AccountLayout("campaign"))
    }
}

/// Global program config; only the protocol fee matters to issuance.
#[derive(Debug, Clone)]
pub struct ConfigAccount {
    pub operator: Pubkey,
    /// Fee taken from the deposit balance before the initial buy, in bps.
    pub protocol_fee_bps: u64,
}

impl ConfigAccount {
    pub fn try_from_bytes(data: &[u8]) -> Result<Self, SyncError> {
        let mut reader = ByteReader::new(data);
        let mut parse = || -> Option<ConfigAccount> {
            reader.skip(8)?; // discriminator
            Some(ConfigAccount {
                operator: reader.read_pubkey()?,
                protocol_fee_bps: reader.read_u64()?,
            })
        };
        parse().ok_or(SyncError::AccountLayout("config"))
    }
}
