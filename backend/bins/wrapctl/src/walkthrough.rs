//! Token lifecycle replay: wrap, implicit wrap, transfers to the ledger, unwrap

use anyhow::{ensure, Result};
use serde::Serialize;
use tracing::info;
use wrapped_config::Config;
use wrapped_report::{AccountReport, TokenReport};
use wrapped_token::constants::LAMPORTS_PER_TOKEN;
use wrapped_token::state::LedgerSettings;

use crate::session::Session;

pub const WALKTHROUGH_HOLDERS: usize = 3;

#[derive(Debug, Serialize)]
pub struct Step {
    pub title: String,
    pub token: TokenReport,
}

#[derive(Debug, Serialize)]
pub struct Walkthrough {
    pub steps: Vec<Step>,
    pub holders: Vec<AccountReport>,
    pub backed: bool,
}

/// Run the lifecycle on a default ledger. Returns the finished session for
/// callers that want to inspect it further
pub fn run(config: &Config) -> Result<(Session, Walkthrough)> {
    // a quarter of each holder's funds, capped at one whole token
    let unit = (config.holder_lamports / 4).min(LAMPORTS_PER_TOKEN);
    ensure!(unit >= 2, "holder lamports too small for the walkthrough: {}", config.holder_lamports);
    let half = unit / 2;

    let mut session = Session::new(config, LedgerSettings::default(), WALKTHROUGH_HOLDERS)?;
    let (h0, h1, h2) = (session.holders[0], session.holders[1], session.holders[2]);
    let ledger = session.token.address();
    let token = session.token;
    let mut steps = Vec::new();

    for holder in [h0, h1, h2] {
        token.wrap(&mut session.rt, holder, unit)?;
    }
    record(&session, &mut steps, format!("Holders 0-2 wrap {unit} each"))?;

    session.rt.transfer(h0, ledger, half)?;
    record(&session, &mut steps, format!("Holder 0 sends {half} straight to the ledger"))?;

    token.transfer(&mut session.rt, h1, ledger, unit)?;
    record(&session, &mut steps, format!("Holder 1 transfers {unit} to the ledger"))?;

    token.approve(&mut session.rt, h0, h2, half)?;
    token.transfer_from(&mut session.rt, h2, h0, ledger, half)?;
    record(
        &session,
        &mut steps,
        format!("Holder 2 moves {half} of holder 0's units to the ledger"),
    )?;

    let remaining = token.balance_of(&session.rt, h2)?;
    token.unwrap(&mut session.rt, h2, remaining)?;
    record(&session, &mut steps, format!("Holder 2 unwraps {remaining}"))?;

    let backed = token.check_backing(&session.rt).is_ok();
    let holders = session.holder_reports()?;
    Ok((session, Walkthrough { steps, holders, backed }))
}

fn record(session: &Session, steps: &mut Vec<Step>, title: String) -> Result<()> {
    let token = session.token_report()?;
    info!(step = steps.len() + 1, supply = token.total_supply.raw, reserve = token.reserve.raw, "{title}");
    steps.push(Step { title, token });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkthrough_ends_backed() {
        let (session, walkthrough) = run(&Config::default()).unwrap();

        assert_eq!(walkthrough.steps.len(), 5);
        assert!(walkthrough.backed);
        assert!(walkthrough.steps.iter().all(|step| step.token.fully_backed()));

        // holder 0 keeps one unit, everyone else is fully unwrapped
        let balances: Vec<u64> = walkthrough.holders.iter().map(|h| h.token.raw).collect();
        assert_eq!(balances, vec![LAMPORTS_PER_TOKEN, 0, 0]);
        assert_eq!(session.token.total_supply(&session.rt).unwrap(), LAMPORTS_PER_TOKEN);
    }

    #[test]
    fn test_walkthrough_scales_to_small_holders() {
        let config = Config {
            holder_lamports: 1_000,
            ..Config::default()
        };
        let (_, walkthrough) = run(&config).unwrap();

        let first = &walkthrough.steps[0].token;
        assert_eq!(first.total_supply.raw, 3 * 250);
        assert!(walkthrough.backed);
    }

    #[test]
    fn test_walkthrough_rejects_dust_holders() {
        let config = Config {
            holder_lamports: 4,
            ..Config::default()
        };
        assert!(run(&config).is_err());
    }
}
