use anchor_lang::prelude::*;
use wrapped_token::program::WrappedToken;

#[cfg(not(target_os = "solana"))]
pub mod drain;

declare_id!("DGHN4kQq9JGWV8AagBWvuw8Uh55xj1F9pmL5HMAEiYKM");

pub const VAULT_SEED: &[u8] = b"attacker";

#[program]
pub mod reentrancy_attacker {
    use super::*;

    /// Create the vault PDA that holds attack proceeds for `owner`.
    pub fn initialize_vault(ctx: Context<InitializeVault>) -> Result<()> {
        let vault = &mut ctx.accounts.vault;
        vault.owner = ctx.accounts.owner.key();
        vault.recorded = 0;
        vault.bump = ctx.bumps.vault;

        msg!("Attacker vault created for {}", vault.owner);
        Ok(())
    }

    /// Unwrap `amount` units held by the vault through CPI.
    ///
    /// Expected result in tests:
    /// the vault receives exactly `amount` lamports, since the deployed
    /// ledger settles balances before it pays out.
    pub fn pwnd_unwrap(ctx: Context<PwndUnwrap>, amount: u64) -> Result<()> {
        let before = ctx.accounts.vault.to_account_info().lamports();

        forward_unwrap_cpi(&ctx, amount)?;

        let received = ctx
            .accounts
            .vault
            .to_account_info()
            .lamports()
            .checked_sub(before)
            .ok_or(AttackerError::Overflow)?;

        let vault = &mut ctx.accounts.vault;
        vault.recorded = vault
            .recorded
            .checked_add(received)
            .ok_or(AttackerError::Overflow)?;

        msg!("Recorded {} lamports (total {})", received, vault.recorded);
        Ok(())
    }

    /// Release everything recorded so far to the owner.
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        let recorded = ctx.accounts.vault.recorded;
        require!(recorded > 0, AttackerError::NothingToWithdraw);

        let vault_info = ctx.accounts.vault.to_account_info();
        let owner_info = ctx.accounts.owner.to_account_info();
        let rent_floor = Rent::get()?.minimum_balance(vault_info.data_len());
        let available = vault_info.lamports().saturating_sub(rent_floor);
        let payout = recorded.min(available);

        let vault_lamports = vault_info
            .lamports()
            .checked_sub(payout)
            .ok_or(AttackerError::Overflow)?;
        let owner_lamports = owner_info
            .lamports()
            .checked_add(payout)
            .ok_or(AttackerError::Overflow)?;

        **vault_info.try_borrow_mut_lamports()? = vault_lamports;
        **owner_info.try_borrow_mut_lamports()? = owner_lamports;

        ctx.accounts.vault.recorded = 0;
        msg!("Withdrew {} lamports to {}", payout, owner_info.key());
        Ok(())
    }
}

/// Forwards CPI into the ledger's unwrap entrypoint, signing as the vault PDA.
fn forward_unwrap_cpi(ctx: &Context<PwndUnwrap>, amount: u64) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let seeds = &[VAULT_SEED, owner.as_ref(), &[ctx.accounts.vault.bump]];
    let signer = &[&seeds[..]];

    let cpi_accounts = wrapped_token::cpi::accounts::Unwrap {
        user: ctx.accounts.vault.to_account_info(),
        token_state: ctx.accounts.token_state.to_account_info(),
        user_balance: ctx.accounts.vault_balance.to_account_info(),
    };

    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.wrapped_token_program.to_account_info(),
        cpi_accounts,
        signer,
    );
    wrapped_token::cpi::unwrap(cpi_ctx, amount)
}

#[account]
pub struct AttackerVault {
    pub owner: Pubkey,
    pub recorded: u64,
    pub bump: u8,
}

impl AttackerVault {
    pub const LEN: usize = 8 + 32 + 8 + 1;
}

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = AttackerVault::LEN,
        seeds = [VAULT_SEED, owner.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, AttackerVault>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct PwndUnwrap<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, owner.key().as_ref()],
        bump = vault.bump,
        has_one = owner @ AttackerError::Unauthorized,
    )]
    pub vault: Account<'info, AttackerVault>,

    /// Ledger TokenState.
    /// CHECK: Validated by the ledger program during CPI.
    #[account(mut)]
    pub token_state: UncheckedAccount<'info>,

    /// Vault's balance account on the ledger.
    /// CHECK: Validated by the ledger program during CPI.
    #[account(mut)]
    pub vault_balance: UncheckedAccount<'info>,

    pub wrapped_token_program: Program<'info, WrappedToken>,
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, owner.key().as_ref()],
        bump = vault.bump,
        has_one = owner @ AttackerError::Unauthorized,
    )]
    pub vault: Account<'info, AttackerVault>,
}

#[error_code(offset = 7000)]
#[derive(PartialEq, Eq)]
pub enum AttackerError {
    #[msg("Only the attacker's owner may do this")]
    Unauthorized,

    #[msg("Nothing recorded to withdraw")]
    NothingToWithdraw,

    #[msg("Arithmetic overflow while recording proceeds")]
    Overflow,
}
