use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod math;
pub mod invariants;
pub mod state;
pub mod ledger;
pub mod reentrancy;
pub mod accounts_ledger;
pub mod instructions;

#[cfg(not(target_os = "solana"))]
pub mod runtime;
#[cfg(not(target_os = "solana"))]
pub mod client;

use instructions::*;

declare_id!("2n3q95doUv6RrCMGr5bL49BSkRD7xpDZDc9PPZDg7bfU");

#[program]
pub mod wrapped_token {
    use super::*;

    pub fn initialize(
        ctx: Context<Initialize>,
        name: String,
        symbol: String,
        reentrancy_guard: bool,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, name, symbol, reentrancy_guard)
    }

    /// Deposit lamports and mint the same number of units
    pub fn wrap(
        ctx: Context<Wrap>,
        amount: u64,
    ) -> Result<()> {
        instructions::wrap::handler(ctx, amount)
    }

    /// Burn units and receive the same number of lamports
    pub fn unwrap(
        ctx: Context<Unwrap>,
        amount: u64,
    ) -> Result<()> {
        instructions::unwrap::handler(ctx, amount)
    }

    pub fn transfer(
        ctx: Context<TransferTokens>,
        to: Pubkey,
        amount: u64,
    ) -> Result<()> {
        instructions::transfer::handler(ctx, to, amount)
    }

    pub fn transfer_from(
        ctx: Context<TransferTokensFrom>,
        owner: Pubkey,
        to: Pubkey,
        amount: u64,
    ) -> Result<()> {
        instructions::transfer_from::handler(ctx, owner, to, amount)
    }

    pub fn approve(
        ctx: Context<Approve>,
        spender: Pubkey,
        amount: u64,
    ) -> Result<()> {
        instructions::approve::handler(ctx, spender, amount)
    }
}
