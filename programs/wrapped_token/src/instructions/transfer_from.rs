//! Transfer-from instruction - spender moves an owner's units within its allowance
//! A transfer addressed to the TokenState PDA pays the owner, not the spender

use anchor_lang::prelude::*;
use crate::accounts_ledger::AccountsLedger;
use crate::ledger;
use crate::state::*;

pub fn handler(
  ctx: Context<TransferTokensFrom>,
  owner: Pubkey,
  to: Pubkey,
  amount: u64,
) -> Result<()> {
  let spender = ctx.accounts.spender.key();
  let address = ctx.accounts.token_state.key();
  let reserve_info = ctx.accounts.token_state.to_account_info();
  let payee = ctx.accounts.owner_account.to_account_info();

  ctx.accounts.to_balance.bind(to, ctx.bumps.to_balance);

  let mut host = AccountsLedger::new(address, &mut ctx.accounts.token_state, reserve_info)?
    .with_balance(&mut ctx.accounts.owner_balance)
    .with_balance(&mut ctx.accounts.to_balance)
    .with_allowance(&mut ctx.accounts.allowance)
    .with_payee(payee);

  ledger::transfer_from(&mut host, spender, owner, to, amount)?;
  host.check_backing()?;

  Ok(())
}

#[derive(Accounts)]
#[instruction(owner: Pubkey, to: Pubkey)]
pub struct TransferTokensFrom<'info> {
  #[account(mut)]
  pub spender: Signer<'info>,

  /// CHECK: Address-constrained to `owner`; only receives lamports
  #[account(mut, address = owner)]
  pub owner_account: UncheckedAccount<'info>,

  #[account(
    mut,
    seeds = [TOKEN_STATE_SEED],
    bump = token_state.bump,
  )]
  pub token_state: Account<'info, TokenState>,

  #[account(
    mut,
    seeds = [BALANCE_SEED, owner.as_ref()],
    bump = owner_balance.bump,
  )]
  pub owner_balance: Account<'info, HolderBalance>,

  #[account(
    init_if_needed,
    payer = spender,
    space = HolderBalance::LEN,
    seeds = [BALANCE_SEED, to.as_ref()],
    bump
  )]
  pub to_balance: Account<'info, HolderBalance>,

  #[account(
    mut,
    seeds = [ALLOWANCE_SEED, owner.as_ref(), spender.key().as_ref()],
    bump = allowance.bump,
  )]
  pub allowance: Account<'info, Allowance>,

  pub system_program: Program<'info, System>,
}
