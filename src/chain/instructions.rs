// Instruction builders for the fundraising program and the pump.fun buy.
// Anchor method discriminator: sha256("global:<method>")[..8].

use crate::chain::pda;
use solana_sdk::hash::hash;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;
use solana_sdk::sysvar::rent;

fn method_discriminator(name: &str) -> [u8; 8] {
    let digest = hash(format!("global:{name}").as_bytes()).to_bytes();
    digest[..8].try_into().unwrap()
}

fn anchor_data(method: &str, args: &[u64]) -> Vec<u8> {
    let mut data = method_discriminator(method).to_vec();
    for arg in args {
        data.extend_from_slice(&arg.to_le_bytes());
    }
    data
}

pub struct CreateTokenAccounts {
    pub operator: Pubkey,
    pub config: Pubkey,
    pub treasury: Pubkey,
    pub creator: Pubkey,
    pub campaign: Pubkey,
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
    pub metadata: Pubkey,
}

/// Token-creation instruction on the fundraising program. Delegates the
/// actual mint to pump.fun, so its authority set rides along.
pub fn create_token(
    program_id: &Pubkey,
    accounts: &CreateTokenAccounts,
    slippage_bps: u64,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.operator, true),
            AccountMeta::new_readonly(accounts.config, false),
            AccountMeta::new(accounts.treasury, false),
            AccountMeta::new_readonly(accounts.creator, false),
            AccountMeta::new(accounts.campaign, false),
            AccountMeta::new(accounts.mint, true),
            AccountMeta::new_readonly(pda::PUMP_FUN_MINT_AUTHORITY, false),
            AccountMeta::new(accounts.bonding_curve, false),
            AccountMeta::new(accounts.associated_bonding_curve, false),
            AccountMeta::new_readonly(pda::PUMP_FUN_GLOBAL, false),
            AccountMeta::new_readonly(pda::PUMP_FUN_EVENT_AUTHORITY, false),
            AccountMeta::new_readonly(pda::PUMP_FUN_PROGRAM, false),
            AccountMeta::new(accounts.metadata, false),
            AccountMeta::new_readonly(pda::MPL_TOKEN_METADATA_PROGRAM, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(rent::id(), false),
        ],
        data: anchor_data("create_token", &[slippage_bps]),
    }
}

pub struct UpdateClaimableAmountAccounts {
    pub operator: Pubkey,
    pub config: Pubkey,
    pub campaign: Pubkey,
    pub creator: Pubkey,
    pub mint: Pubkey,
}

/// Sets the on-chain claimable figure; does not move funds.
pub fn update_claimable_amount(
    program_id: &Pubkey,
    accounts: &UpdateClaimableAmountAccounts,
    amount: u64,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.operator, true),
            AccountMeta::new_readonly(accounts.config, false),
            AccountMeta::new(accounts.campaign, false),
            AccountMeta::new_readonly(accounts.creator, false),
            AccountMeta::new_readonly(accounts.mint, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(rent::id(), false),
        ],
        data: anchor_data("update_claimable_amount", &[amount]),
    }
}

pub struct PumpFunBuyAccounts {
    pub fee_recipient: Pubkey,
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
    pub associated_user: Pubkey,
    pub user: Pubkey,
}

/// pump.fun `buy`: spends up to `max_sol_cost` lamports for `token_amount`
/// tokens from the bonding curve.
pub fn pump_fun_buy(
    accounts: &PumpFunBuyAccounts,
    token_amount: u64,
    max_sol_cost: u64,
) -> Instruction {
    Instruction {
        program_id: pda::PUMP_FUN_PROGRAM,
        accounts: vec![
            AccountMeta::new_readonly(pda::PUMP_FUN_GLOBAL, false),
            AccountMeta::new(accounts.fee_recipient, false),
            AccountMeta::new_readonly(accounts.mint, false),
            AccountMeta::new(accounts.bonding_curve, false),
            AccountMeta::new(accounts.associated_bonding_curve, false),
            AccountMeta::new(accounts.associated_user, false),
            AccountMeta::new(accounts.user, true),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(rent::id(), false),
            AccountMeta::new_readonly(pda::PUMP_FUN_EVENT_AUTHORITY, false),
            AccountMeta::new_readonly(pda::PUMP_FUN_PROGRAM, false),
        ],
        data: anchor_data("buy", &[token_amount, max_sol_cost]),
    }
}
