// Program-derived addresses for the fundraising program and its
// collaborators (pump.fun liquidity pool, Metaplex token metadata).

use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

pub const PUMP_FUN_PROGRAM: Pubkey = pubkey!("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P");
pub const PUMP_FUN_GLOBAL: Pubkey = pubkey!("4wTV1YmiEkRvAtNtsSGPtUrqRYQMe5SKy2uB4Jjaxnjf");
pub const PUMP_FUN_MINT_AUTHORITY: Pubkey = pubkey!("TSLvdd1pWpHVjahSpsvCXUbgwsL3JAcvokwaKt1eokM");
pub const PUMP_FUN_EVENT_AUTHORITY: Pubkey =
    pubkey!("Ce6TQqeHC9p8KetsN6JsjHK7UTZk7nasjjnr7XxXp9F1");
pub const PUMP_FUN_FEE_RECIPIENT_MAINNET: Pubkey =
    pubkey!("CebN5WGQ4jvEPvsVU4EoHEpgzq1VV7AbicfhtW4xC9iM");
pub const PUMP_FUN_FEE_RECIPIENT_DEVNET: Pubkey =
    pubkey!("68yFSZxzLWJXkxxRGydZ63C6mHx1NLEDWmwN9Lb5yySg");
pub const MPL_TOKEN_METADATA_PROGRAM: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Campaign sub-account: seeded by the creator and the 0-based, corrected
/// campaign ordinal.
pub fn campaign_pda(program_id: &Pubkey, creator: &Pubkey, campaign_index: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[b"campaign", creator.as_ref(), &campaign_index.to_le_bytes()],
        program_id,
    )
    .0
}

pub fn config_pda(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[b"config"], program_id).0
}

pub fn treasury_pda(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[b"treasury"], program_id).0
}

pub fn bonding_curve_pda(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[b"bonding-curve", mint.as_ref()], &PUMP_FUN_PROGRAM).0
}

pub fn metadata_pda(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[b"metadata", MPL_TOKEN_METADATA_PROGRAM.as_ref(), mint.as_ref()],
        &MPL_TOKEN_METADATA_PROGRAM,
    )
    .0
}

pub fn fee_recipient(devnet: bool) -> Pubkey {
    if devnet {
        PUMP_FUN_FEE_RECIPIENT_DEVNET
    } else {
        PUMP_FUN_FEE_RECIPIENT_MAINNET
    }
}
