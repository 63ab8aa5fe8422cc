// Constant-product bonding-curve math for the initial liquidity-pool buy.
// Reserve constants match pump.fun's initial virtual reserves.

pub const INITIAL_VIRTUAL_TOKEN_RESERVES: u64 = 1_073_000_000_000_000;
pub const INITIAL_VIRTUAL_SOL_RESERVES: u64 = 30_000_000_000;

/// Token output for `sol_amount` lamports against the initial curve,
/// reduced by `slippage_bps` basis points. The quotient is rounded up by
/// one base unit so the pool is never under-asked.
pub fn tokens_out_for_sol(sol_amount: u64, slippage_bps: u64) -> u64 {
    if sol_amount == 0 {
        return 0;
    }

    let sol_reserves = INITIAL_VIRTUAL_SOL_RESERVES as u128;
    let token_reserves = INITIAL_VIRTUAL_TOKEN_RESERVES as u128;

    let product = sol_reserves * token_reserves;
    let new_sol_reserves = sol_reserves + sol_amount as u128;
    let new_token_reserves = product / new_sol_reserves + 1;
    let tokens_out = token_reserves - new_token_reserves;

    let slippage_cut = tokens_out * slippage_bps as u128 / 10_000;
    (tokens_out - slippage_cut) as u64
}

/// Protocol fee carved out of the available deposit balance, in bps.
pub fn protocol_fee(available_balance: u64, fee_bps: u64) -> u64 {
    (available_balance as u128 * fee_bps as u128 / 10_000) as u64
}
