//! Ledger state machine shared by the on-chain program and the in-process runtime
//! Every operation reaches storage and value transfer only through `LedgerHost`
//! `LedgerHost::pay` is the single point where control can leave the ledger

use anchor_lang::prelude::*;

use crate::error::WrappedTokenError;
use crate::events::*;
use crate::math::{credit, debit};
use crate::reentrancy::{ensure_unlocked, ReentrancyGuard};
use crate::state::{LedgerSettings, PayoutOrdering};

/// Storage and value-transfer surface the ledger runs against
pub trait LedgerHost {
  /// Address of the ledger itself. Transfers here burn and pay out
  fn ledger_address(&self) -> Pubkey;

  fn settings(&self) -> Result<LedgerSettings>;

  fn balance_of(&self, holder: Pubkey) -> Result<u64>;

  fn set_balance(&mut self, holder: Pubkey, amount: u64) -> Result<()>;

  fn total_supply(&self) -> Result<u64>;

  fn set_total_supply(&mut self, amount: u64) -> Result<()>;

  fn allowance(&self, owner: Pubkey, spender: Pubkey) -> Result<u64>;

  fn set_allowance(&mut self, owner: Pubkey, spender: Pubkey, amount: u64) -> Result<()>;

  fn is_locked(&self) -> Result<bool>;

  fn set_locked(&mut self, locked: bool) -> Result<()>;

  /// Move `amount` native units out of the reserve to `to`
  /// The recipient may run arbitrary logic, including calls back into the ledger
  fn pay(&mut self, to: Pubkey, amount: u64) -> Result<()>;
}

/// Mint `amount` units to `caller` against value already received by the ledger
pub fn wrap<H: LedgerHost + ?Sized>(host: &mut H, caller: Pubkey, amount: u64) -> Result<()> {
  require!(amount > 0, WrappedTokenError::InvalidAmount);
  ensure_unlocked(host)?;

  let new_balance = credit(host.balance_of(caller)?, amount)
    .ok_or(WrappedTokenError::MathOverflow)?;
  let new_total_supply = credit(host.total_supply()?, amount)
    .ok_or(WrappedTokenError::MathOverflow)?;

  host.set_balance(caller, new_balance)?;
  host.set_total_supply(new_total_supply)?;

  msg!("Wrapped {} for {}", amount, caller);
  msg!("New total supply: {}", new_total_supply);

  emit!(Wrapped {
    holder: caller,
    amount,
    new_balance,
    new_total_supply,
  });

  Ok(())
}

/// Burn `amount` units from `caller` and pay the same native amount back
pub fn unwrap<H: LedgerHost + ?Sized>(host: &mut H, caller: Pubkey, amount: u64) -> Result<()> {
  release(host, caller, amount)
}

/// Move `amount` units from `from` to `to`
///
/// A destination equal to the ledger address burns the units and pays
/// `from` instead of crediting the ledger
pub fn transfer<H: LedgerHost + ?Sized>(
  host: &mut H,
  from: Pubkey,
  to: Pubkey,
  amount: u64,
) -> Result<()> {
  require!(to != Pubkey::default(), WrappedTokenError::InvalidRecipient);
  ensure_unlocked(host)?;

  if to == host.ledger_address() {
    msg!("Transfer to ledger - unwrapping {} for {}", amount, from);
    return release(host, from, amount);
  }

  move_balance(host, from, to, amount)
}

/// Move `amount` units from `owner` to `to` using the allowance granted to `spender`
///
/// The allowance is checked before the balance. A destination equal to the
/// ledger address pays the owner, never the spender
pub fn transfer_from<H: LedgerHost + ?Sized>(
  host: &mut H,
  spender: Pubkey,
  owner: Pubkey,
  to: Pubkey,
  amount: u64,
) -> Result<()> {
  require!(to != Pubkey::default(), WrappedTokenError::InvalidRecipient);
  ensure_unlocked(host)?;

  let allowed = host.allowance(owner, spender)?;
  require!(allowed >= amount, WrappedTokenError::InsufficientAllowance);

  let held = host.balance_of(owner)?;
  require!(held >= amount, WrappedTokenError::InsufficientBalance);

  let remaining = debit(allowed, amount).ok_or(WrappedTokenError::InsufficientAllowance)?;
  host.set_allowance(owner, spender, remaining)?;
  msg!("Allowance {} -> {}: {} remaining", owner, spender, remaining);

  if to == host.ledger_address() {
    msg!("Transfer to ledger - unwrapping {} for owner {}", amount, owner);
    return release(host, owner, amount);
  }

  move_balance(host, owner, to, amount)
}

/// Overwrite the allowance of `spender` over `owner`'s units
pub fn approve<H: LedgerHost + ?Sized>(
  host: &mut H,
  owner: Pubkey,
  spender: Pubkey,
  amount: u64,
) -> Result<()> {
  require!(spender != Pubkey::default(), WrappedTokenError::InvalidSpender);
  ensure_unlocked(host)?;

  host.set_allowance(owner, spender, amount)?;
  msg!("Approved {} to spend {} of {}", spender, amount, owner);

  emit!(Approved {
    owner,
    spender,
    amount,
  });

  Ok(())
}

fn move_balance<H: LedgerHost + ?Sized>(
  host: &mut H,
  from: Pubkey,
  to: Pubkey,
  amount: u64,
) -> Result<()> {
  let held = host.balance_of(from)?;
  require!(held >= amount, WrappedTokenError::InsufficientBalance);

  host.set_balance(from, held - amount)?;

  // read after the debit so a self-transfer nets to zero
  let received = credit(host.balance_of(to)?, amount)
    .ok_or(WrappedTokenError::MathOverflow)?;
  host.set_balance(to, received)?;

  msg!("Transferred {} from {} to {}", amount, from, to);

  emit!(Transferred {
    from,
    to,
    amount,
  });

  Ok(())
}

/// Burn `amount` from `holder` and pay `holder` the same native amount
///
/// Holds the reentrancy lock for the whole operation when the ledger has
/// one enabled. The configured ordering decides whether bookkeeping lands
/// before or after control passes to the recipient
fn release<H: LedgerHost + ?Sized>(host: &mut H, holder: Pubkey, amount: u64) -> Result<()> {
  let mut guard = ReentrancyGuard::acquire(host)?;
  let ordering = guard.host.settings()?.payout_ordering;

  let held = guard.host.balance_of(holder)?;
  require!(held >= amount, WrappedTokenError::InsufficientBalance);
  let supply = guard.host.total_supply()?;

  let (new_balance, new_total_supply) = match ordering {
    PayoutOrdering::EffectsFirst => {
      let new_balance = debit(held, amount).ok_or(WrappedTokenError::InsufficientBalance)?;
      let new_total_supply = debit(supply, amount).ok_or(WrappedTokenError::MathOverflow)?;

      guard.host.set_balance(holder, new_balance)?;
      guard.host.set_total_supply(new_total_supply)?;

      pay_out(&mut *guard.host, holder, amount)?;
      (new_balance, new_total_supply)
    }
    PayoutOrdering::PayoutFirst => {
      pay_out(&mut *guard.host, holder, amount)?;

      // `held` and `supply` were observed before the payout
      let new_balance = debit(held, amount).ok_or(WrappedTokenError::InsufficientBalance)?;
      let new_total_supply = debit(supply, amount).ok_or(WrappedTokenError::MathOverflow)?;

      guard.host.set_balance(holder, new_balance)?;
      guard.host.set_total_supply(new_total_supply)?;
      (new_balance, new_total_supply)
    }
  };

  msg!("Unwrapped {} for {}", amount, holder);
  msg!("New total supply: {}", new_total_supply);

  emit!(Unwrapped {
    holder,
    amount,
    new_balance,
    new_total_supply,
  });

  Ok(())
}

fn pay_out<H: LedgerHost + ?Sized>(host: &mut H, to: Pubkey, amount: u64) -> Result<()> {
  host.pay(to, amount).map_err(|err| {
    msg!("Payout of {} to {} failed: {}", amount, to, err);
    error!(WrappedTokenError::PayoutFailed)
  })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Host with plain maps; payouts are recorded and can be made to fail
    struct MemoryLedger {
        address: Pubkey,
        settings: LedgerSettings,
        balances: BTreeMap<Pubkey, u64>,
        allowances: BTreeMap<(Pubkey, Pubkey), u64>,
        total_supply: u64,
        reserve: u64,
        locked: bool,
        payouts: Vec<(Pubkey, u64)>,
        reject_payouts: bool,
    }

    impl MemoryLedger {
        fn new(settings: LedgerSettings) -> Self {
            Self {
                address: Pubkey::new_from_array([9; 32]),
                settings,
                balances: BTreeMap::new(),
                allowances: BTreeMap::new(),
                total_supply: 0,
                reserve: 0,
                locked: false,
                payouts: Vec::new(),
                reject_payouts: false,
            }
        }

        fn deposit(&mut self, holder: Pubkey, amount: u64) {
            self.reserve += amount;
            wrap(self, holder, amount).unwrap();
        }
    }

    impl LedgerHost for MemoryLedger {
        fn ledger_address(&self) -> Pubkey {
            self.address
        }

        fn settings(&self) -> Result<LedgerSettings> {
            Ok(self.settings)
        }

        fn balance_of(&self, holder: Pubkey) -> Result<u64> {
            Ok(self.balances.get(&holder).copied().unwrap_or(0))
        }

        fn set_balance(&mut self, holder: Pubkey, amount: u64) -> Result<()> {
            self.balances.insert(holder, amount);
            Ok(())
        }

        fn total_supply(&self) -> Result<u64> {
            Ok(self.total_supply)
        }

        fn set_total_supply(&mut self, amount: u64) -> Result<()> {
            self.total_supply = amount;
            Ok(())
        }

        fn allowance(&self, owner: Pubkey, spender: Pubkey) -> Result<u64> {
            Ok(self.allowances.get(&(owner, spender)).copied().unwrap_or(0))
        }

        fn set_allowance(&mut self, owner: Pubkey, spender: Pubkey, amount: u64) -> Result<()> {
            self.allowances.insert((owner, spender), amount);
            Ok(())
        }

        fn is_locked(&self) -> Result<bool> {
            Ok(self.locked)
        }

        fn set_locked(&mut self, locked: bool) -> Result<()> {
            self.locked = locked;
            Ok(())
        }

        fn pay(&mut self, to: Pubkey, amount: u64) -> Result<()> {
            require!(!self.reject_payouts, WrappedTokenError::InsufficientLamports);
            self.reserve = self
                .reserve
                .checked_sub(amount)
                .ok_or(WrappedTokenError::InsufficientLamports)?;
            self.payouts.push((to, amount));
            Ok(())
        }
    }

    fn holder(seed: u8) -> Pubkey {
        Pubkey::new_from_array([seed; 32])
    }

    #[test]
    fn test_wrap_credits_balance_and_supply() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 5);
        ledger.deposit(holder(1), 3);

        assert_eq!(ledger.balance_of(holder(1)).unwrap(), 8);
        assert_eq!(ledger.total_supply, 8);
    }

    #[test]
    fn test_wrap_zero_rejected() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        let err = wrap(&mut ledger, holder(1), 0).unwrap_err();
        assert_eq!(err, WrappedTokenError::InvalidAmount.into());
        assert_eq!(ledger.total_supply, 0);
    }

    #[test]
    fn test_wrap_overflow_rejected() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.total_supply = u64::MAX;
        let err = wrap(&mut ledger, holder(1), 1).unwrap_err();
        assert_eq!(err, WrappedTokenError::MathOverflow.into());
    }

    #[test]
    fn test_unwrap_pays_holder() {
        for ordering in [PayoutOrdering::EffectsFirst, PayoutOrdering::PayoutFirst] {
            let mut ledger = MemoryLedger::new(LedgerSettings::unguarded(ordering));
            ledger.deposit(holder(1), 10);

            unwrap(&mut ledger, holder(1), 4).unwrap();

            assert_eq!(ledger.balance_of(holder(1)).unwrap(), 6);
            assert_eq!(ledger.total_supply, 6);
            assert_eq!(ledger.reserve, 6);
            assert_eq!(ledger.payouts, vec![(holder(1), 4)]);
        }
    }

    #[test]
    fn test_unwrap_more_than_balance() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 2);

        let err = unwrap(&mut ledger, holder(1), 3).unwrap_err();
        assert_eq!(err, WrappedTokenError::InsufficientBalance.into());
        assert!(ledger.payouts.is_empty());
    }

    #[test]
    fn test_unwrap_zero_is_a_no_op() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 2);

        unwrap(&mut ledger, holder(1), 0).unwrap();
        assert_eq!(ledger.balance_of(holder(1)).unwrap(), 2);
        assert_eq!(ledger.total_supply, 2);
    }

    #[test]
    fn test_failed_payout_maps_to_payout_failed() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 2);
        ledger.reject_payouts = true;

        let err = unwrap(&mut ledger, holder(1), 1).unwrap_err();
        assert_eq!(err, WrappedTokenError::PayoutFailed.into());
        // guard released even though the operation failed
        assert!(!ledger.locked);
    }

    #[test]
    fn test_transfer_moves_units() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 5);

        transfer(&mut ledger, holder(1), holder(2), 2).unwrap();

        assert_eq!(ledger.balance_of(holder(1)).unwrap(), 3);
        assert_eq!(ledger.balance_of(holder(2)).unwrap(), 2);
        assert_eq!(ledger.total_supply, 5);
        assert!(ledger.payouts.is_empty());
    }

    #[test]
    fn test_self_transfer_leaves_balance_unchanged() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 5);

        transfer(&mut ledger, holder(1), holder(1), 5).unwrap();
        assert_eq!(ledger.balance_of(holder(1)).unwrap(), 5);
    }

    #[test]
    fn test_transfer_to_zero_address_rejected() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 5);

        let err = transfer(&mut ledger, holder(1), Pubkey::default(), 1).unwrap_err();
        assert_eq!(err, WrappedTokenError::InvalidRecipient.into());
    }

    #[test]
    fn test_transfer_to_ledger_burns_and_pays() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 1);
        let address = ledger.address;

        transfer(&mut ledger, holder(1), address, 1).unwrap();

        assert_eq!(ledger.balance_of(holder(1)).unwrap(), 0);
        assert_eq!(ledger.balance_of(address).unwrap(), 0);
        assert_eq!(ledger.total_supply, 0);
        assert_eq!(ledger.payouts, vec![(holder(1), 1)]);
    }

    #[test]
    fn test_zero_allowance_rejected() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 5);
        approve(&mut ledger, holder(1), holder(2), 0).unwrap();

        let err = transfer_from(&mut ledger, holder(2), holder(1), holder(3), 1).unwrap_err();
        assert_eq!(err, WrappedTokenError::InsufficientAllowance.into());
    }

    #[test]
    fn test_allowance_checked_before_balance() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        // owner holds nothing and spender is not approved
        let err = transfer_from(&mut ledger, holder(2), holder(1), holder(3), 1).unwrap_err();
        assert_eq!(err, WrappedTokenError::InsufficientAllowance.into());
    }

    #[test]
    fn test_transfer_from_decrements_allowance() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 5);
        approve(&mut ledger, holder(1), holder(2), 4).unwrap();

        transfer_from(&mut ledger, holder(2), holder(1), holder(3), 3).unwrap();

        assert_eq!(ledger.allowance(holder(1), holder(2)).unwrap(), 1);
        assert_eq!(ledger.balance_of(holder(1)).unwrap(), 2);
        assert_eq!(ledger.balance_of(holder(3)).unwrap(), 3);
        assert_eq!(ledger.balance_of(holder(2)).unwrap(), 0);
    }

    #[test]
    fn test_transfer_from_to_ledger_pays_owner() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        ledger.deposit(holder(1), 5);
        approve(&mut ledger, holder(1), holder(2), 5).unwrap();
        let address = ledger.address;

        transfer_from(&mut ledger, holder(2), holder(1), address, 5).unwrap();

        assert_eq!(ledger.payouts, vec![(holder(1), 5)]);
        assert_eq!(ledger.total_supply, 0);
        assert_eq!(ledger.allowance(holder(1), holder(2)).unwrap(), 0);
    }

    #[test]
    fn test_approve_overwrites() {
        let mut ledger = MemoryLedger::new(LedgerSettings::default());
        approve(&mut ledger, holder(1), holder(2), 10).unwrap();
        approve(&mut ledger, holder(1), holder(2), 3).unwrap();
        assert_eq!(ledger.allowance(holder(1), holder(2)).unwrap(), 3);

        let err = approve(&mut ledger, holder(1), Pubkey::default(), 1).unwrap_err();
        assert_eq!(err, WrappedTokenError::InvalidSpender.into());
    }

    #[test]
    fn test_guard_rejects_while_locked() {
        let mut ledger = MemoryLedger::new(LedgerSettings::guarded(PayoutOrdering::PayoutFirst));
        ledger.deposit(holder(1), 5);
        ledger.locked = true;

        let err = unwrap(&mut ledger, holder(1), 1).unwrap_err();
        assert_eq!(err, WrappedTokenError::Reentrancy.into());
        assert_eq!(ledger.balance_of(holder(1)).unwrap(), 5);
    }

    #[test]
    fn test_locked_ledger_rejects_every_mutation() {
        let mut ledger = MemoryLedger::new(LedgerSettings::guarded(PayoutOrdering::PayoutFirst));
        ledger.deposit(holder(1), 5);
        approve(&mut ledger, holder(1), holder(2), 5).unwrap();
        ledger.locked = true;

        let attempts = [
            wrap(&mut ledger, holder(1), 1),
            transfer(&mut ledger, holder(1), holder(3), 5),
            transfer_from(&mut ledger, holder(2), holder(1), holder(3), 5),
            approve(&mut ledger, holder(1), holder(3), 5),
        ];
        for err in attempts.into_iter().map(|attempt| attempt.unwrap_err()) {
            assert_eq!(err, WrappedTokenError::Reentrancy.into());
        }

        assert_eq!(ledger.balance_of(holder(1)).unwrap(), 5);
        assert_eq!(ledger.balance_of(holder(3)).unwrap(), 0);
        assert_eq!(ledger.allowance(holder(1), holder(2)).unwrap(), 5);
        assert_eq!(ledger.allowance(holder(1), holder(3)).unwrap(), 0);
        assert_eq!(ledger.total_supply, 5);
    }
}
